use std::collections::BTreeSet;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::workflows::diagnosis::catalog::{Catalog, InMemoryKnowledgeRepository};
use crate::workflows::diagnosis::domain::{
    Disease, DiseaseId, DiseaseSymptomWeight, Symptom, SymptomId,
};
use crate::workflows::diagnosis::engine::{DiagnosisEngine, EngineConfig, RequiredSymptomPolicy};
use crate::workflows::diagnosis::knowledge::KnowledgeBase;
use crate::workflows::diagnosis::repository::{KnowledgeRepository, RepositoryError};
use crate::workflows::diagnosis::service::DiagnosisService;

pub(crate) const DISEASE_A: DiseaseId = DiseaseId(1);
pub(crate) const DISEASE_B: DiseaseId = DiseaseId(2);

pub(crate) fn symptom(id: i64, name: &str) -> Symptom {
    Symptom {
        id: SymptomId(id),
        name: name.to_string(),
        category: "general".to_string(),
        description: None,
    }
}

pub(crate) fn disease(id: i64, name: &str) -> Disease {
    Disease {
        id: DiseaseId(id),
        name: name.to_string(),
        organ_system: "general".to_string(),
        description: format!("{name} description"),
    }
}

pub(crate) fn link(disease_id: i64, symptom_id: i64, weight: f64) -> DiseaseSymptomWeight {
    DiseaseSymptomWeight {
        disease_id: DiseaseId(disease_id),
        symptom_id: SymptomId(symptom_id),
        weight,
        is_required: false,
        is_exclusive: false,
    }
}

pub(crate) fn required(disease_id: i64, symptom_id: i64, weight: f64) -> DiseaseSymptomWeight {
    DiseaseSymptomWeight {
        is_required: true,
        ..link(disease_id, symptom_id, weight)
    }
}

pub(super) fn ids(values: &[i64]) -> BTreeSet<SymptomId> {
    values.iter().copied().map(SymptomId).collect()
}

/// Disease A = {1: 2.0, 2: 1.0}, disease B = {2: 1.5, 3: 3.0}.
pub(super) fn example_catalog() -> Catalog {
    Catalog {
        symptoms: vec![
            symptom(1, "vomiting"),
            symptom(2, "lethargy"),
            symptom(3, "coughing"),
        ],
        diseases: vec![disease(1, "Disease A"), disease(2, "Disease B")],
        links: vec![
            link(1, 1, 2.0),
            link(1, 2, 1.0),
            link(2, 2, 1.5),
            link(2, 3, 3.0),
        ],
    }
}

pub(super) fn example_knowledge() -> KnowledgeBase {
    example_catalog()
        .knowledge_base()
        .expect("example catalog is consistent")
}

/// Same as the example catalog, with symptom 1 required for disease A.
pub(super) fn required_knowledge() -> KnowledgeBase {
    let mut catalog = example_catalog();
    catalog.links[0] = required(1, 1, 2.0);
    catalog
        .knowledge_base()
        .expect("required catalog is consistent")
}

pub(super) fn sample_knowledge() -> KnowledgeBase {
    Catalog::sample()
        .expect("bundled catalog loads")
        .knowledge_base()
        .expect("bundled catalog is consistent")
}

pub(super) fn engine() -> DiagnosisEngine {
    DiagnosisEngine::default()
}

pub(super) fn engine_with(config: EngineConfig) -> DiagnosisEngine {
    DiagnosisEngine::new(config).expect("valid engine config")
}

pub(super) fn enforcing_engine() -> DiagnosisEngine {
    engine_with(EngineConfig {
        required_symptoms: RequiredSymptomPolicy::Enforce,
        ..EngineConfig::default()
    })
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn build_service() -> DiagnosisService<InMemoryKnowledgeRepository> {
    let repository = Arc::new(InMemoryKnowledgeRepository::new(example_catalog()));
    DiagnosisService::new(repository, EngineConfig::default()).expect("valid service config")
}

pub(super) struct UnavailableRepository;

impl KnowledgeRepository for UnavailableRepository {
    fn list_diseases(&self) -> Result<Vec<Disease>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_symptoms(&self) -> Result<Vec<Symptom>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_disease_symptom_weights(&self) -> Result<Vec<DiseaseSymptomWeight>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Repository whose rows are individually valid but reference a missing symptom.
pub(super) struct DanglingLinkRepository;

impl KnowledgeRepository for DanglingLinkRepository {
    fn list_diseases(&self) -> Result<Vec<Disease>, RepositoryError> {
        Ok(vec![disease(1, "Disease A")])
    }

    fn list_symptoms(&self) -> Result<Vec<Symptom>, RepositoryError> {
        Ok(vec![symptom(1, "vomiting")])
    }

    fn list_disease_symptom_weights(&self) -> Result<Vec<DiseaseSymptomWeight>, RepositoryError> {
        Ok(vec![link(1, 1, 1.0), link(1, 42, 1.0)])
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
