use super::domain::{Disease, DiseaseSymptomWeight, Symptom};

/// Read-only access to the symptom/disease catalog owned by the persistence layer.
pub trait KnowledgeRepository: Send + Sync {
    fn list_diseases(&self) -> Result<Vec<Disease>, RepositoryError>;
    fn list_symptoms(&self) -> Result<Vec<Symptom>, RepositoryError>;
    fn list_disease_symptom_weights(&self) -> Result<Vec<DiseaseSymptomWeight>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
