use std::collections::BTreeSet;

use super::super::domain::{DiagnosisResult, DiseaseId, SymptomId};
use super::super::knowledge::KnowledgeBase;
use super::config::RequiredSymptomPolicy;

/// Raw additive evidence a disease accumulated from the confirmed symptoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DiseaseEvidence {
    pub(crate) disease_id: DiseaseId,
    pub(crate) raw_score: f64,
}

/// Sum the link weights of confirmed symptoms per disease, keeping only diseases with
/// positive evidence. Output is in ascending disease id order.
pub(crate) fn evidence(
    confirmed: &BTreeSet<SymptomId>,
    knowledge: &KnowledgeBase,
    policy: RequiredSymptomPolicy,
) -> Vec<DiseaseEvidence> {
    if confirmed.is_empty() {
        return Vec::new();
    }

    let mut scored = Vec::new();
    for disease in knowledge.diseases() {
        let links = knowledge.links_for(disease.id);

        if policy == RequiredSymptomPolicy::Enforce
            && links
                .iter()
                .any(|link| link.is_required && !confirmed.contains(&link.symptom_id))
        {
            continue;
        }

        let raw_score: f64 = links
            .iter()
            .filter(|link| confirmed.contains(&link.symptom_id))
            .map(|link| link.weight)
            .sum();

        if raw_score > 0.0 {
            scored.push(DiseaseEvidence {
                disease_id: disease.id,
                raw_score,
            });
        }
    }

    scored
}

/// Normalised differential diagnosis, most probable first. Ties keep ascending disease id.
pub(crate) fn rank(
    confirmed: &BTreeSet<SymptomId>,
    knowledge: &KnowledgeBase,
    policy: RequiredSymptomPolicy,
) -> Vec<DiagnosisResult> {
    let mut scored = evidence(confirmed, knowledge, policy);
    let total: f64 = scored.iter().map(|entry| entry.raw_score).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    // stable sort over id-ordered input keeps the id tie-break
    scored.sort_by(|a, b| b.raw_score.total_cmp(&a.raw_score));

    let mut ranked: Vec<DiagnosisResult> = scored
        .into_iter()
        .filter_map(|entry| {
            knowledge
                .disease(entry.disease_id)
                .map(|disease| DiagnosisResult {
                    disease_id: disease.id,
                    disease_name: disease.name.clone(),
                    probability: entry.raw_score / total,
                })
        })
        .collect();

    // the least likely entry takes the remainder so the ranking never sums above 1
    if let Some((last, rest)) = ranked.split_last_mut() {
        let assigned: f64 = rest.iter().map(|result| result.probability).sum();
        let ceiling = rest.last().map_or(1.0, |previous| previous.probability);
        last.probability = (1.0 - assigned).min(ceiling).max(0.0);
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::diagnosis::catalog::Catalog;

    fn raw_score(evidence: &[DiseaseEvidence], disease_id: DiseaseId) -> f64 {
        evidence
            .iter()
            .find(|entry| entry.disease_id == disease_id)
            .map(|entry| entry.raw_score)
            .unwrap_or(0.0)
    }

    #[test]
    fn raw_evidence_never_decreases_as_symptoms_accumulate() {
        let knowledge = Catalog::sample()
            .expect("bundled catalog loads")
            .knowledge_base()
            .expect("bundled catalog is consistent");
        let order = [3, 1, 16, 7, 5, 12, 9];

        let mut confirmed = BTreeSet::new();
        let mut previous = evidence(&confirmed, &knowledge, RequiredSymptomPolicy::Informational);
        for symptom in order {
            confirmed.insert(SymptomId(symptom));
            let current = evidence(&confirmed, &knowledge, RequiredSymptomPolicy::Informational);
            for disease in knowledge.diseases() {
                assert!(raw_score(&current, disease.id) >= raw_score(&previous, disease.id));
            }
            previous = current;
        }
    }
}
