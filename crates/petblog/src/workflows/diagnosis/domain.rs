use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for symptoms in the reference catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomId(pub i64);

impl fmt::Display for SymptomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for diseases in the reference catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiseaseId(pub i64);

impl fmt::Display for DiseaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable sign a pet owner can confirm or deny.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    pub id: SymptomId,
    pub name: String,
    pub category: String,
    /// Question prompt shown to the owner when this symptom is asked about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Symptom {
    pub fn question_prompt(&self) -> String {
        match &self.description {
            Some(description) if !description.trim().is_empty() => description.clone(),
            _ => format!("Does your pet show {}?", self.name),
        }
    }
}

/// Candidate diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disease {
    pub id: DiseaseId,
    pub name: String,
    pub organ_system: String,
    pub description: String,
}

/// Weighted evidence link between a disease and one of its symptoms.
///
/// `is_required` and `is_exclusive` are carried through from the catalog; whether
/// scoring honours `is_required` depends on the engine's
/// [`RequiredSymptomPolicy`](super::RequiredSymptomPolicy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseSymptomWeight {
    pub disease_id: DiseaseId,
    pub symptom_id: SymptomId,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_exclusive: bool,
}

pub(crate) fn default_weight() -> f64 {
    1.0
}

/// Ranked entry of a differential diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisResult {
    pub disease_id: DiseaseId,
    #[serde(rename = "disease")]
    pub disease_name: String,
    pub probability: f64,
}

/// Interview state owned by the caller and passed back in on every turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(rename = "selectedSymptoms", default)]
    pub confirmed_symptom_ids: BTreeSet<SymptomId>,
    #[serde(rename = "askedSymptoms", default)]
    pub asked_symptom_ids: BTreeSet<SymptomId>,
    #[serde(default)]
    pub question_count: u32,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the owner's answer to a presented question.
    pub fn record_answer(&mut self, symptom_id: SymptomId, affirmed: bool) {
        self.asked_symptom_ids.insert(symptom_id);
        if affirmed {
            self.confirmed_symptom_ids.insert(symptom_id);
        }
        self.question_count = self.question_count.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_answer_tracks_asked_and_confirmed() {
        let mut state = SessionState::new();
        state.record_answer(SymptomId(4), true);
        state.record_answer(SymptomId(9), false);

        assert_eq!(state.question_count, 2);
        assert!(state.confirmed_symptom_ids.contains(&SymptomId(4)));
        assert!(!state.confirmed_symptom_ids.contains(&SymptomId(9)));
        assert_eq!(state.asked_symptom_ids.len(), 2);
    }

    #[test]
    fn question_prompt_falls_back_to_name() {
        let symptom = Symptom {
            id: SymptomId(1),
            name: "vomiting".to_string(),
            category: "digestive".to_string(),
            description: None,
        };
        assert_eq!(symptom.question_prompt(), "Does your pet show vomiting?");
    }

    #[test]
    fn session_state_uses_wire_field_names() {
        let state: SessionState = serde_json::from_str(
            r#"{"selectedSymptoms":[2,3],"askedSymptoms":[1,2,3],"questionCount":3}"#,
        )
        .expect("session state parses");

        assert_eq!(state.question_count, 3);
        assert!(state.confirmed_symptom_ids.contains(&SymptomId(3)));
        assert_eq!(state.asked_symptom_ids.len(), 3);
    }
}
