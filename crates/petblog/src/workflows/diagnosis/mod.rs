//! Pet symptom questionnaire and differential diagnosis.
//!
//! The engine scores diseases by summing the weights of confirmed symptoms, picks the
//! next question by how evenly it splits the remaining candidates, and stops once the
//! leading disease is confident enough after a minimum number of questions. Interview
//! state is owned by the caller and passed in on every turn.

pub mod catalog;
pub mod domain;
mod engine;
pub mod knowledge;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use catalog::{Catalog, CatalogImportError, InMemoryKnowledgeRepository};
pub use domain::{
    DiagnosisResult, Disease, DiseaseId, DiseaseSymptomWeight, SessionState, Symptom, SymptomId,
};
pub use engine::{
    DiagnosisEngine, EngineConfig, EngineConfigError, RequiredSymptomPolicy,
    DEFAULT_MIN_QUESTIONS, DEFAULT_RESULT_LIMIT, DEFAULT_STOP_THRESHOLD,
};
pub use knowledge::{KnowledgeBase, KnowledgeBaseError};
pub use repository::{KnowledgeRepository, RepositoryError};
pub use router::{diagnosis_router, DiagnoseRequest};
pub use service::{DiagnosisService, DiagnosisServiceError};
pub use session::{FinishReason, SessionStep, SessionStepView};
