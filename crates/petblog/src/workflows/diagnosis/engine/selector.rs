use std::collections::{BTreeMap, BTreeSet};

use super::super::domain::{DiseaseId, SymptomId};
use super::super::knowledge::KnowledgeBase;
use super::config::RequiredSymptomPolicy;
use super::scorer;

const SCORE_EPSILON: f64 = 1e-9;

/// How asking about a symptom would split the remaining candidate mass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct SymptomSplit {
    /// Probability mass of candidate diseases that reference the symptom.
    pub(crate) mass: f64,
    /// Expected evidence the symptom contributes, `Σ p(d)·w(d,s)`.
    pub(crate) expected_weight: f64,
}

impl SymptomSplit {
    pub(crate) fn information(&self) -> f64 {
        binary_entropy(self.mass)
    }
}

/// Plausible diseases with their current probability mass.
///
/// Uniform over every disease until something is confirmed. Required-symptom flags are
/// ignored here so a required symptom stays askable.
pub(crate) fn candidate_mass(
    confirmed: &BTreeSet<SymptomId>,
    knowledge: &KnowledgeBase,
) -> Vec<(DiseaseId, f64)> {
    if confirmed.is_empty() {
        let count = knowledge.disease_count();
        if count == 0 {
            return Vec::new();
        }
        let share = 1.0 / count as f64;
        return knowledge
            .diseases()
            .map(|disease| (disease.id, share))
            .collect();
    }

    let scored = scorer::evidence(confirmed, knowledge, RequiredSymptomPolicy::Informational);
    let total: f64 = scored.iter().map(|entry| entry.raw_score).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    scored
        .into_iter()
        .map(|entry| (entry.disease_id, entry.raw_score / total))
        .collect()
}

/// Unasked, unconfirmed symptoms linked to at least one candidate, keyed by id.
pub(crate) fn candidate_splits(
    confirmed: &BTreeSet<SymptomId>,
    asked: &BTreeSet<SymptomId>,
    knowledge: &KnowledgeBase,
) -> BTreeMap<SymptomId, SymptomSplit> {
    let mut splits: BTreeMap<SymptomId, SymptomSplit> = BTreeMap::new();

    for (disease_id, probability) in candidate_mass(confirmed, knowledge) {
        for link in knowledge.links_for(disease_id) {
            if asked.contains(&link.symptom_id) || confirmed.contains(&link.symptom_id) {
                continue;
            }
            let split = splits.entry(link.symptom_id).or_default();
            split.mass += probability;
            split.expected_weight += probability * link.weight;
        }
    }

    splits
}

/// Pick the most informative symptom to ask next, or `None` when nothing is left to ask.
///
/// Order: highest split entropy, then highest expected weight, then lowest symptom id.
pub(crate) fn next_question(
    confirmed: &BTreeSet<SymptomId>,
    asked: &BTreeSet<SymptomId>,
    knowledge: &KnowledgeBase,
) -> Option<SymptomId> {
    let mut best: Option<(SymptomId, f64, f64)> = None;

    for (symptom_id, split) in candidate_splits(confirmed, asked, knowledge) {
        let information = split.information();
        let replace = match best {
            None => true,
            Some((_, best_information, best_weight)) => {
                if information > best_information + SCORE_EPSILON {
                    true
                } else if (information - best_information).abs() <= SCORE_EPSILON {
                    split.expected_weight > best_weight + SCORE_EPSILON
                } else {
                    false
                }
            }
        };

        if replace {
            best = Some((symptom_id, information, split.expected_weight));
        }
    }

    best.map(|(symptom_id, _, _)| symptom_id)
}

fn binary_entropy(p: f64) -> f64 {
    if p <= SCORE_EPSILON || p >= 1.0 - SCORE_EPSILON {
        return 0.0;
    }
    let q = 1.0 - p;
    -(p * p.log2()) - (q * q.log2())
}
