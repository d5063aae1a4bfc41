use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Deserializer};

use super::domain::{default_weight, Disease, DiseaseId, DiseaseSymptomWeight, Symptom, SymptomId};
use super::knowledge::{KnowledgeBase, KnowledgeBaseError};
use super::repository::{KnowledgeRepository, RepositoryError};

pub const SYMPTOMS_FILE: &str = "symptoms.csv";
pub const DISEASES_FILE: &str = "diseases.csv";
pub const LINKS_FILE: &str = "disease_symptoms.csv";

const SAMPLE_SYMPTOMS: &str = include_str!("../../../data/symptoms.csv");
const SAMPLE_DISEASES: &str = include_str!("../../../data/diseases.csv");
const SAMPLE_LINKS: &str = include_str!("../../../data/disease_symptoms.csv");

#[derive(Debug)]
pub enum CatalogImportError {
    Io {
        file: String,
        source: std::io::Error,
    },
    Csv {
        file: String,
        source: csv::Error,
    },
    Knowledge(KnowledgeBaseError),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io { file, source } => {
                write!(f, "failed to read catalog file {}: {}", file, source)
            }
            CatalogImportError::Csv { file, source } => {
                write!(f, "invalid catalog CSV data in {}: {}", file, source)
            }
            CatalogImportError::Knowledge(err) => write!(f, "inconsistent catalog: {}", err),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io { source, .. } => Some(source),
            CatalogImportError::Csv { source, .. } => Some(source),
            CatalogImportError::Knowledge(err) => Some(err),
        }
    }
}

impl From<KnowledgeBaseError> for CatalogImportError {
    fn from(err: KnowledgeBaseError) -> Self {
        Self::Knowledge(err)
    }
}

/// Materialised catalog rows, as the persistence layer would hand them over.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub symptoms: Vec<Symptom>,
    pub diseases: Vec<Disease>,
    pub links: Vec<DiseaseSymptomWeight>,
}

impl Catalog {
    /// Load `symptoms.csv`, `diseases.csv` and `disease_symptoms.csv` from a directory.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, CatalogImportError> {
        let dir = dir.as_ref();
        let open = |name: &str| {
            File::open(dir.join(name)).map_err(|source| CatalogImportError::Io {
                file: name.to_string(),
                source,
            })
        };

        Self::from_readers(open(SYMPTOMS_FILE)?, open(DISEASES_FILE)?, open(LINKS_FILE)?)
    }

    /// Parse the three catalog tables and check they form a consistent snapshot.
    pub fn from_readers<S: Read, D: Read, L: Read>(
        symptoms: S,
        diseases: D,
        links: L,
    ) -> Result<Self, CatalogImportError> {
        let symptoms = parse_rows::<_, SymptomRow>(symptoms, SYMPTOMS_FILE)?
            .into_iter()
            .map(SymptomRow::into_symptom)
            .collect();
        let diseases = parse_rows::<_, DiseaseRow>(diseases, DISEASES_FILE)?
            .into_iter()
            .map(DiseaseRow::into_disease)
            .collect();
        let links = parse_rows::<_, LinkRow>(links, LINKS_FILE)?
            .into_iter()
            .map(LinkRow::into_link)
            .collect();

        let catalog = Self {
            symptoms,
            diseases,
            links,
        };
        catalog.knowledge_base()?;
        Ok(catalog)
    }

    /// Bundled demonstration catalog of common dog and cat conditions.
    pub fn sample() -> Result<Self, CatalogImportError> {
        Self::from_readers(
            SAMPLE_SYMPTOMS.as_bytes(),
            SAMPLE_DISEASES.as_bytes(),
            SAMPLE_LINKS.as_bytes(),
        )
    }

    pub fn knowledge_base(&self) -> Result<KnowledgeBase, KnowledgeBaseError> {
        KnowledgeBase::new(
            self.symptoms.clone(),
            self.diseases.clone(),
            self.links.clone(),
        )
    }
}

fn parse_rows<R, T>(reader: R, file: &str) -> Result<Vec<T>, CatalogImportError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<T>() {
        let row = record.map_err(|source| CatalogImportError::Csv {
            file: file.to_string(),
            source,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct SymptomRow {
    id: i64,
    name: String,
    category: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
}

impl SymptomRow {
    fn into_symptom(self) -> Symptom {
        Symptom {
            id: SymptomId(self.id),
            name: self.name,
            category: self.category,
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiseaseRow {
    id: i64,
    name: String,
    organ_system: String,
    #[serde(default)]
    description: String,
}

impl DiseaseRow {
    fn into_disease(self) -> Disease {
        Disease {
            id: DiseaseId(self.id),
            name: self.name,
            organ_system: self.organ_system,
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LinkRow {
    disease_id: i64,
    symptom_id: i64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    weight: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    is_required: bool,
    #[serde(default, deserialize_with = "flag")]
    is_exclusive: bool,
}

impl LinkRow {
    fn into_link(self) -> DiseaseSymptomWeight {
        // unparseable weights become NaN so snapshot validation reports them
        let weight = self
            .weight
            .as_deref()
            .map(|raw| raw.parse::<f64>().unwrap_or(f64::NAN))
            .unwrap_or_else(default_weight);

        DiseaseSymptomWeight {
            disease_id: DiseaseId(self.disease_id),
            symptom_id: SymptomId(self.symptom_id),
            weight,
            is_required: self.is_required,
            is_exclusive: self.is_exclusive,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "n" | "no" => Ok(false),
        "1" | "true" | "y" | "yes" => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean flag, found '{other}'"
        ))),
    }
}

/// Catalog held in memory, swappable at runtime.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKnowledgeRepository {
    catalog: Arc<Mutex<Catalog>>,
}

impl InMemoryKnowledgeRepository {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
        }
    }

    pub fn replace(&self, catalog: Catalog) -> Result<(), RepositoryError> {
        let mut guard = self
            .catalog
            .lock()
            .map_err(|_| RepositoryError::Unavailable("catalog lock poisoned".to_string()))?;
        *guard = catalog;
        Ok(())
    }

    fn read<T>(&self, select: impl FnOnce(&Catalog) -> T) -> Result<T, RepositoryError> {
        let guard = self
            .catalog
            .lock()
            .map_err(|_| RepositoryError::Unavailable("catalog lock poisoned".to_string()))?;
        Ok(select(&guard))
    }
}

impl KnowledgeRepository for InMemoryKnowledgeRepository {
    fn list_diseases(&self) -> Result<Vec<Disease>, RepositoryError> {
        self.read(|catalog| catalog.diseases.clone())
    }

    fn list_symptoms(&self) -> Result<Vec<Symptom>, RepositoryError> {
        self.read(|catalog| catalog.symptoms.clone())
    }

    fn list_disease_symptom_weights(&self) -> Result<Vec<DiseaseSymptomWeight>, RepositoryError> {
        self.read(|catalog| catalog.links.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SYMPTOMS: &str = "id,name,category,description\n1,itching,skin,\n2,sneezing,respiratory,Does your pet sneeze?\n";
    const DISEASES: &str = "id,name,organ_system,description\n10,Mange,skin,Mite infestation\n";

    #[test]
    fn parses_rows_with_defaults() {
        let links = "disease_id,symptom_id,weight,is_required,is_exclusive\n10,1,,yes,\n10,2,0.5,0,1\n";
        let catalog = Catalog::from_readers(
            Cursor::new(SYMPTOMS),
            Cursor::new(DISEASES),
            Cursor::new(links),
        )
        .expect("catalog parses");

        assert_eq!(catalog.symptoms.len(), 2);
        assert_eq!(catalog.symptoms[0].description, None);
        assert_eq!(
            catalog.symptoms[1].description.as_deref(),
            Some("Does your pet sneeze?")
        );
        assert_eq!(catalog.links[0].weight, 1.0);
        assert!(catalog.links[0].is_required);
        assert_eq!(catalog.links[1].weight, 0.5);
        assert!(catalog.links[1].is_exclusive);
    }

    #[test]
    fn rejects_unparseable_weight_through_validation() {
        let links = "disease_id,symptom_id,weight,is_required,is_exclusive\n10,1,heavy,,\n";
        let result = Catalog::from_readers(
            Cursor::new(SYMPTOMS),
            Cursor::new(DISEASES),
            Cursor::new(links),
        );

        match result {
            Err(CatalogImportError::Knowledge(KnowledgeBaseError::InvalidWeight {
                weight, ..
            })) => assert!(weight.is_nan()),
            other => panic!("expected invalid weight, got {other:?}"),
        }
    }

    #[test]
    fn reports_bad_flags_as_csv_errors() {
        let links = "disease_id,symptom_id,weight,is_required,is_exclusive\n10,1,1.0,maybe,\n";
        let result = Catalog::from_readers(
            Cursor::new(SYMPTOMS),
            Cursor::new(DISEASES),
            Cursor::new(links),
        );

        match result {
            Err(CatalogImportError::Csv { file, .. }) => assert_eq!(file, LINKS_FILE),
            other => panic!("expected csv error, got {other:?}"),
        }
    }

    #[test]
    fn sample_catalog_is_consistent() {
        let catalog = Catalog::sample().expect("bundled catalog loads");
        let knowledge = catalog.knowledge_base().expect("snapshot builds");
        assert_eq!(knowledge.disease_count(), 7);
        assert!(knowledge.symptom(SymptomId(16)).is_some());
    }

    #[test]
    fn from_dir_reports_missing_files() {
        let missing = std::env::temp_dir().join("petblog-catalog-does-not-exist");
        match Catalog::from_dir(&missing) {
            Err(CatalogImportError::Io { file, .. }) => assert_eq!(file, SYMPTOMS_FILE),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn repository_serves_replaced_catalog() {
        let repository = InMemoryKnowledgeRepository::default();
        assert!(repository.list_diseases().expect("readable").is_empty());

        repository
            .replace(Catalog::sample().expect("sample loads"))
            .expect("replace succeeds");
        assert_eq!(repository.list_diseases().expect("readable").len(), 7);
        assert!(!repository
            .list_disease_symptom_weights()
            .expect("readable")
            .is_empty());
    }
}
