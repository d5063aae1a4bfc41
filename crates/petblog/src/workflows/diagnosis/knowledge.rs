use std::collections::{BTreeMap, BTreeSet};

use super::domain::{Disease, DiseaseId, DiseaseSymptomWeight, Symptom, SymptomId};

/// Validation failures raised while indexing a catalog snapshot.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KnowledgeBaseError {
    #[error("symptom {0} appears more than once in the catalog")]
    DuplicateSymptom(SymptomId),
    #[error("disease {0} appears more than once in the catalog")]
    DuplicateDisease(DiseaseId),
    #[error("link references unknown disease {0}")]
    UnknownDisease(DiseaseId),
    #[error("link for disease {disease} references unknown symptom {symptom}")]
    UnknownSymptom {
        disease: DiseaseId,
        symptom: SymptomId,
    },
    #[error("disease {disease} links symptom {symptom} more than once")]
    DuplicateLink {
        disease: DiseaseId,
        symptom: SymptomId,
    },
    #[error("link {disease}->{symptom} has invalid weight {weight} (must be finite and > 0)")]
    InvalidWeight {
        disease: DiseaseId,
        symptom: SymptomId,
        weight: f64,
    },
}

/// Immutable, validated snapshot of the symptom/disease catalog used for one call.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    symptoms: BTreeMap<SymptomId, Symptom>,
    diseases: BTreeMap<DiseaseId, Disease>,
    links: BTreeMap<DiseaseId, Vec<DiseaseSymptomWeight>>,
}

impl KnowledgeBase {
    pub fn new(
        symptoms: Vec<Symptom>,
        diseases: Vec<Disease>,
        links: Vec<DiseaseSymptomWeight>,
    ) -> Result<Self, KnowledgeBaseError> {
        let mut symptom_index = BTreeMap::new();
        for symptom in symptoms {
            let id = symptom.id;
            if symptom_index.insert(id, symptom).is_some() {
                return Err(KnowledgeBaseError::DuplicateSymptom(id));
            }
        }

        let mut disease_index = BTreeMap::new();
        for disease in diseases {
            let id = disease.id;
            if disease_index.insert(id, disease).is_some() {
                return Err(KnowledgeBaseError::DuplicateDisease(id));
            }
        }

        let mut grouped: BTreeMap<DiseaseId, Vec<DiseaseSymptomWeight>> = BTreeMap::new();
        let mut seen: BTreeSet<(DiseaseId, SymptomId)> = BTreeSet::new();
        for link in links {
            if !disease_index.contains_key(&link.disease_id) {
                return Err(KnowledgeBaseError::UnknownDisease(link.disease_id));
            }
            if !symptom_index.contains_key(&link.symptom_id) {
                return Err(KnowledgeBaseError::UnknownSymptom {
                    disease: link.disease_id,
                    symptom: link.symptom_id,
                });
            }
            if !link.weight.is_finite() || link.weight <= 0.0 {
                return Err(KnowledgeBaseError::InvalidWeight {
                    disease: link.disease_id,
                    symptom: link.symptom_id,
                    weight: link.weight,
                });
            }
            if !seen.insert((link.disease_id, link.symptom_id)) {
                return Err(KnowledgeBaseError::DuplicateLink {
                    disease: link.disease_id,
                    symptom: link.symptom_id,
                });
            }

            grouped.entry(link.disease_id).or_default().push(link);
        }

        for disease_links in grouped.values_mut() {
            disease_links.sort_by_key(|link| link.symptom_id);
        }

        Ok(Self {
            symptoms: symptom_index,
            diseases: disease_index,
            links: grouped,
        })
    }

    pub fn symptom(&self, id: SymptomId) -> Option<&Symptom> {
        self.symptoms.get(&id)
    }

    pub fn disease(&self, id: DiseaseId) -> Option<&Disease> {
        self.diseases.get(&id)
    }

    /// Symptoms in ascending id order.
    pub fn symptoms(&self) -> impl Iterator<Item = &Symptom> {
        self.symptoms.values()
    }

    /// Diseases in ascending id order.
    pub fn diseases(&self) -> impl Iterator<Item = &Disease> {
        self.diseases.values()
    }

    /// Weighted links of a disease, sorted by symptom id. Empty when the disease has none.
    pub fn links_for(&self, disease_id: DiseaseId) -> &[DiseaseSymptomWeight] {
        self.links
            .get(&disease_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn disease_count(&self) -> usize {
        self.diseases.len()
    }
}
