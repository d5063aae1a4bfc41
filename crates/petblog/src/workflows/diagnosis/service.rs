use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{DiagnosisResult, SessionState, Symptom, SymptomId};
use super::engine::{DiagnosisEngine, EngineConfig, EngineConfigError};
use super::knowledge::{KnowledgeBase, KnowledgeBaseError};
use super::repository::{KnowledgeRepository, RepositoryError};
use super::session::SessionStep;

/// Service composing the catalog repository and the diagnosis engine.
///
/// Every call reads a fresh snapshot from the repository; the engine itself holds no
/// interview state, which stays with the caller in [`SessionState`].
pub struct DiagnosisService<R> {
    repository: Arc<R>,
    engine: Arc<DiagnosisEngine>,
}

impl<R> DiagnosisService<R>
where
    R: KnowledgeRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: EngineConfig) -> Result<Self, DiagnosisServiceError> {
        let engine = DiagnosisEngine::new(config)?;
        Ok(Self::with_engine(repository, engine))
    }

    pub fn with_engine(repository: Arc<R>, engine: DiagnosisEngine) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &DiagnosisEngine {
        &self.engine
    }

    /// Read and validate the current catalog snapshot.
    pub fn snapshot(&self) -> Result<KnowledgeBase, DiagnosisServiceError> {
        let symptoms = self.repository.list_symptoms()?;
        let diseases = self.repository.list_diseases()?;
        let links = self.repository.list_disease_symptom_weights()?;
        let knowledge = KnowledgeBase::new(symptoms, diseases, links)?;
        Ok(knowledge)
    }

    /// Advance an interview by one turn: either the next question or the final ranking.
    pub fn next_question(&self, state: &SessionState) -> Result<SessionStep, DiagnosisServiceError> {
        let knowledge = self.snapshot()?;
        let step = self.engine.advance(state, &knowledge);

        match &step {
            SessionStep::Question { symptom_id, .. } => debug!(
                question_count = state.question_count,
                confirmed = state.confirmed_symptom_ids.len(),
                next_symptom = %symptom_id,
                "diagnosis interview continues"
            ),
            SessionStep::Finished { reason, diseases } => info!(
                question_count = state.question_count,
                ?reason,
                candidates = diseases.len(),
                top = diseases.first().map(|result| result.disease_name.as_str()),
                "diagnosis interview finished"
            ),
        }

        Ok(step)
    }

    /// Single most probable disease, or `None` when the symptoms carry no evidence.
    pub fn diagnose(
        &self,
        selected: &[SymptomId],
    ) -> Result<Option<DiagnosisResult>, DiagnosisServiceError> {
        let knowledge = self.snapshot()?;
        let confirmed = to_set(selected);
        Ok(self.engine.diagnose(&confirmed, &knowledge))
    }

    pub fn diagnose_multiple(
        &self,
        selected: &[SymptomId],
        limit: usize,
    ) -> Result<Vec<DiagnosisResult>, DiagnosisServiceError> {
        if limit == 0 {
            return Err(DiagnosisServiceError::InvalidLimit(limit));
        }

        let knowledge = self.snapshot()?;
        let confirmed = to_set(selected);
        Ok(self.engine.diagnose_multiple(&confirmed, &knowledge, limit))
    }

    /// Catalog symptoms in ascending id order, for the initial symptom picker.
    pub fn symptoms(&self) -> Result<Vec<Symptom>, DiagnosisServiceError> {
        let knowledge = self.snapshot()?;
        Ok(knowledge.symptoms().cloned().collect())
    }
}

fn to_set(selected: &[SymptomId]) -> BTreeSet<SymptomId> {
    selected.iter().copied().collect()
}

/// Error raised by the diagnosis service.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisServiceError {
    #[error("result limit must be positive (got {0})")]
    InvalidLimit(usize),
    #[error(transparent)]
    Config(#[from] EngineConfigError),
    #[error(transparent)]
    Knowledge(#[from] KnowledgeBaseError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
