use serde::Serialize;

use super::domain::{DiagnosisResult, SessionState, SymptomId};
use super::engine::DiagnosisEngine;
use super::knowledge::KnowledgeBase;

/// Why an interview ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The leading disease cleared the stop threshold after the question floor.
    ConfidenceReached,
    /// No unasked symptom remained among the plausible diseases.
    QuestionsExhausted,
}

/// Output of one interview turn.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStep {
    Question {
        symptom_id: SymptomId,
        name: String,
        description: String,
    },
    Finished {
        reason: FinishReason,
        diseases: Vec<DiagnosisResult>,
    },
}

impl SessionStep {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionStep::Finished { .. })
    }

    pub fn view(&self) -> SessionStepView {
        match self {
            SessionStep::Question {
                symptom_id,
                name,
                description,
            } => SessionStepView {
                finished: false,
                next_symptom_id: Some(*symptom_id),
                name: Some(name.clone()),
                description: Some(description.clone()),
                reason: None,
                diseases: None,
            },
            SessionStep::Finished { reason, diseases } => SessionStepView {
                finished: true,
                next_symptom_id: None,
                name: None,
                description: None,
                reason: Some(*reason),
                diseases: Some(diseases.clone()),
            },
        }
    }
}

/// Wire representation of a [`SessionStep`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStepView {
    pub finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_symptom_id: Option<SymptomId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FinishReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diseases: Option<Vec<DiagnosisResult>>,
}

pub(crate) fn advance(
    engine: &DiagnosisEngine,
    state: &SessionState,
    knowledge: &KnowledgeBase,
) -> SessionStep {
    let config = engine.config();
    let confirmed = &state.confirmed_symptom_ids;

    if state.question_count >= config.min_questions && engine.should_stop(confirmed, knowledge) {
        return finish(engine, state, knowledge, FinishReason::ConfidenceReached);
    }

    let next = engine
        .next_question(confirmed, &state.asked_symptom_ids, knowledge)
        .and_then(|symptom_id| knowledge.symptom(symptom_id));

    match next {
        Some(symptom) => SessionStep::Question {
            symptom_id: symptom.id,
            name: symptom.name.clone(),
            description: symptom.question_prompt(),
        },
        None => finish(engine, state, knowledge, FinishReason::QuestionsExhausted),
    }
}

fn finish(
    engine: &DiagnosisEngine,
    state: &SessionState,
    knowledge: &KnowledgeBase,
    reason: FinishReason,
) -> SessionStep {
    let diseases = engine.diagnose_multiple(
        &state.confirmed_symptom_ids,
        knowledge,
        engine.config().result_limit,
    );
    SessionStep::Finished { reason, diseases }
}
