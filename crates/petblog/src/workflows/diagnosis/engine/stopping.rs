use std::collections::BTreeSet;

use super::super::domain::SymptomId;
use super::super::knowledge::KnowledgeBase;
use super::config::RequiredSymptomPolicy;
use super::scorer;

/// True once the leading disease's probability clears `threshold`. No evidence never stops.
pub(crate) fn should_stop(
    confirmed: &BTreeSet<SymptomId>,
    knowledge: &KnowledgeBase,
    policy: RequiredSymptomPolicy,
    threshold: f64,
) -> bool {
    scorer::rank(confirmed, knowledge, policy)
        .first()
        .map(|top| top.probability >= threshold)
        .unwrap_or(false)
}
