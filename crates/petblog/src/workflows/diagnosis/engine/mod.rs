mod config;
mod scorer;
mod selector;
mod stopping;

pub use config::{
    EngineConfig, EngineConfigError, RequiredSymptomPolicy, DEFAULT_MIN_QUESTIONS,
    DEFAULT_RESULT_LIMIT, DEFAULT_STOP_THRESHOLD,
};

use std::collections::BTreeSet;

use super::domain::{DiagnosisResult, SessionState, SymptomId};
use super::knowledge::KnowledgeBase;
use super::session::{self, SessionStep};

/// Stateless engine applying the scoring, question and stopping rules to a snapshot.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisEngine {
    config: EngineConfig,
}

impl DiagnosisEngine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Full normalised ranking; empty when the confirmed symptoms carry no evidence.
    pub fn score(
        &self,
        confirmed: &BTreeSet<SymptomId>,
        knowledge: &KnowledgeBase,
    ) -> Vec<DiagnosisResult> {
        scorer::rank(confirmed, knowledge, self.config.required_symptoms)
    }

    pub fn diagnose(
        &self,
        confirmed: &BTreeSet<SymptomId>,
        knowledge: &KnowledgeBase,
    ) -> Option<DiagnosisResult> {
        self.score(confirmed, knowledge).into_iter().next()
    }

    /// Top `limit` entries of [`score`](Self::score). Callers validate `limit > 0`.
    pub fn diagnose_multiple(
        &self,
        confirmed: &BTreeSet<SymptomId>,
        knowledge: &KnowledgeBase,
        limit: usize,
    ) -> Vec<DiagnosisResult> {
        let mut ranked = self.score(confirmed, knowledge);
        ranked.truncate(limit);
        ranked
    }

    pub fn next_question(
        &self,
        confirmed: &BTreeSet<SymptomId>,
        asked: &BTreeSet<SymptomId>,
        knowledge: &KnowledgeBase,
    ) -> Option<SymptomId> {
        selector::next_question(confirmed, asked, knowledge)
    }

    pub fn should_stop(&self, confirmed: &BTreeSet<SymptomId>, knowledge: &KnowledgeBase) -> bool {
        stopping::should_stop(
            confirmed,
            knowledge,
            self.config.required_symptoms,
            self.config.stop_threshold,
        )
    }

    /// Run one turn of the interview protocol against the caller's session state.
    pub fn advance(&self, state: &SessionState, knowledge: &KnowledgeBase) -> SessionStep {
        session::advance(self, state, knowledge)
    }
}
