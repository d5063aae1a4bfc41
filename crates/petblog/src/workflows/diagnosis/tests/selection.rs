use super::common::*;
use crate::workflows::diagnosis::domain::SymptomId;
use crate::workflows::diagnosis::knowledge::KnowledgeBase;

#[test]
fn first_question_comes_from_linked_symptoms() {
    let knowledge = example_knowledge();
    let engine = engine();

    let first = engine
        .next_question(&ids(&[]), &ids(&[]), &knowledge)
        .expect("a question is available");

    assert!(ids(&[1, 2, 3]).contains(&first));
    // 1 and 3 split A/B evenly; 3 carries more expected weight
    assert_eq!(first, SymptomId(3));
    assert_eq!(
        engine.next_question(&ids(&[]), &ids(&[]), &knowledge),
        Some(first)
    );
}

#[test]
fn asked_symptoms_are_never_repeated() {
    let knowledge = example_knowledge();
    let engine = engine();

    assert_eq!(
        engine.next_question(&ids(&[]), &ids(&[3]), &knowledge),
        Some(SymptomId(1))
    );
    assert_eq!(
        engine.next_question(&ids(&[]), &ids(&[1, 3]), &knowledge),
        Some(SymptomId(2))
    );
    assert_eq!(
        engine.next_question(&ids(&[]), &ids(&[1, 2, 3]), &knowledge),
        None
    );
}

#[test]
fn confirmed_symptoms_narrow_the_candidates() {
    let knowledge = example_knowledge();

    // only disease A carries evidence, so symptom 3 (disease B) is off the table
    assert_eq!(
        engine().next_question(&ids(&[1]), &ids(&[1]), &knowledge),
        Some(SymptomId(2))
    );
    assert_eq!(
        engine().next_question(&ids(&[1]), &ids(&[1, 2]), &knowledge),
        None
    );
}

#[test]
fn confirmed_symptoms_are_not_asked_again_even_if_unrecorded() {
    let knowledge = example_knowledge();

    let next = engine().next_question(&ids(&[2, 3]), &ids(&[]), &knowledge);
    assert_eq!(next, Some(SymptomId(1)));
}

#[test]
fn balanced_split_beats_universal_symptom() {
    let knowledge = KnowledgeBase::new(
        vec![symptom(10, "lethargy"), symptom(11, "coughing")],
        vec![disease(1, "One"), disease(2, "Two"), disease(3, "Three")],
        vec![
            link(1, 10, 5.0),
            link(2, 10, 5.0),
            link(3, 10, 5.0),
            link(3, 11, 0.5),
        ],
    )
    .expect("snapshot builds");

    assert_eq!(
        engine().next_question(&ids(&[]), &ids(&[]), &knowledge),
        Some(SymptomId(11))
    );
}

#[test]
fn single_candidate_still_asks_its_remaining_symptoms() {
    let knowledge = KnowledgeBase::new(
        vec![symptom(4, "itching"), symptom(5, "hair loss"), symptom(6, "redness")],
        vec![disease(1, "Dermatitis")],
        vec![link(1, 4, 1.0), link(1, 5, 2.0), link(1, 6, 2.0)],
    )
    .expect("snapshot builds");

    // every split is uninformative, so expected weight then id decide
    assert_eq!(
        engine().next_question(&ids(&[4]), &ids(&[4]), &knowledge),
        Some(SymptomId(5))
    );
}

#[test]
fn empty_catalog_has_no_questions() {
    let knowledge = KnowledgeBase::default();
    assert_eq!(
        engine().next_question(&ids(&[]), &ids(&[]), &knowledge),
        None
    );
}

#[test]
fn enforce_policy_keeps_required_symptoms_askable() {
    let knowledge = required_knowledge();

    // disease A is excluded from rankings until symptom 1 is confirmed, yet it stays a
    // candidate for questioning
    assert_eq!(
        enforcing_engine().next_question(&ids(&[2]), &ids(&[2, 3]), &knowledge),
        Some(SymptomId(1))
    );
}

#[test]
fn never_returns_an_asked_symptom_on_the_sample_catalog() {
    let knowledge = sample_knowledge();
    let engine = engine();
    let mut asked = ids(&[]);

    while let Some(next) = engine.next_question(&ids(&[]), &asked, &knowledge) {
        assert!(!asked.contains(&next), "symptom {next} asked twice");
        asked.insert(next);
    }

    let linked: usize = knowledge
        .symptoms()
        .filter(|symptom| {
            knowledge.diseases().any(|disease| {
                knowledge
                    .links_for(disease.id)
                    .iter()
                    .any(|link| link.symptom_id == symptom.id)
            })
        })
        .count();
    assert_eq!(asked.len(), linked);
}
