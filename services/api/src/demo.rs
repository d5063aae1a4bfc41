use crate::infra::{build_service, CatalogService};
use clap::Args;
use petblog::config::{AppConfig, DiagnosisConfig};
use petblog::error::AppError;
use petblog::workflows::diagnosis::{
    DiagnosisResult, FinishReason, SessionState, SessionStep, SymptomId,
};
use std::collections::BTreeSet;

/// Symptoms reported by the demo pet when no `--present` list is given.
const DEFAULT_PRESENT: [i64; 4] = [1, 16, 3, 4];

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    /// Observed symptom ids, comma separated (e.g. 1,16,3)
    #[arg(long, value_delimiter = ',', required = true)]
    pub(crate) symptoms: Vec<i64>,
    /// Maximum number of diseases to list (defaults to DIAGNOSIS_RESULT_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Symptom ids the simulated pet actually shows; every other question is answered "no"
    #[arg(long, value_delimiter = ',')]
    pub(crate) present: Vec<i64>,
}

pub(crate) fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let config = diagnosis_config()?;
    let service = build_service(&config)?;
    let limit = args.limit.unwrap_or(config.engine.result_limit);
    let selected: Vec<SymptomId> = args.symptoms.into_iter().map(SymptomId).collect();

    let results = service.diagnose_multiple(&selected, limit)?;
    println!(
        "Differential for symptoms {}",
        format_ids(selected.iter().copied())
    );
    render_results(&results);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = diagnosis_config()?;
    let service = build_service(&config)?;
    let present: BTreeSet<SymptomId> = if args.present.is_empty() {
        DEFAULT_PRESENT.iter().copied().map(SymptomId).collect()
    } else {
        args.present.into_iter().map(SymptomId).collect()
    };

    println!("Pet symptom interview demo");
    println!("Simulated pet shows symptoms {}", format_ids(present.iter().copied()));

    let transcript = run_interview(&service, &present)?;
    for (number, turn) in transcript.turns.iter().enumerate() {
        println!(
            "  Q{} [{}] {} -> {}",
            number + 1,
            turn.symptom_id,
            turn.prompt,
            if turn.affirmed { "yes" } else { "no" }
        );
    }

    match transcript.reason {
        FinishReason::ConfidenceReached => println!(
            "\nStopped after {} questions: leading diagnosis is confident enough",
            transcript.turns.len()
        ),
        FinishReason::QuestionsExhausted => println!(
            "\nStopped after {} questions: no informative questions remain",
            transcript.turns.len()
        ),
    }
    render_results(&transcript.diseases);
    Ok(())
}

pub(crate) struct InterviewTurn {
    pub(crate) symptom_id: SymptomId,
    pub(crate) prompt: String,
    pub(crate) affirmed: bool,
}

pub(crate) struct InterviewTranscript {
    pub(crate) turns: Vec<InterviewTurn>,
    pub(crate) reason: FinishReason,
    pub(crate) diseases: Vec<DiagnosisResult>,
}

/// Drive the stateless protocol to completion, answering from the `present` set.
pub(crate) fn run_interview(
    service: &CatalogService,
    present: &BTreeSet<SymptomId>,
) -> Result<InterviewTranscript, AppError> {
    let mut session = SessionState::new();
    let mut turns = Vec::new();

    loop {
        match service.next_question(&session)? {
            SessionStep::Question {
                symptom_id,
                description,
                ..
            } => {
                let affirmed = present.contains(&symptom_id);
                session.record_answer(symptom_id, affirmed);
                turns.push(InterviewTurn {
                    symptom_id,
                    prompt: description,
                    affirmed,
                });
            }
            SessionStep::Finished { reason, diseases } => {
                return Ok(InterviewTranscript {
                    turns,
                    reason,
                    diseases,
                });
            }
        }
    }
}

fn diagnosis_config() -> Result<DiagnosisConfig, AppError> {
    Ok(AppConfig::load()?.diagnosis)
}

fn render_results(results: &[DiagnosisResult]) {
    if results.is_empty() {
        println!("No disease matches the reported symptoms");
        return;
    }

    for (rank, result) in results.iter().enumerate() {
        println!(
            "  {}. {} ({:.1}%)",
            rank + 1,
            result.disease_name,
            result.probability * 100.0
        );
    }
}

fn format_ids(ids: impl Iterator<Item = SymptomId>) -> String {
    let rendered: Vec<String> = ids.map(|id| id.to_string()).collect();
    if rendered.is_empty() {
        "(none)".to_string()
    } else {
        rendered.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_service() -> std::sync::Arc<CatalogService> {
        build_service(&DiagnosisConfig::default()).expect("sample service builds")
    }

    #[test]
    fn scripted_parvo_interview_stops_at_the_question_floor() {
        let present: BTreeSet<SymptomId> = DEFAULT_PRESENT.iter().copied().map(SymptomId).collect();

        let transcript = run_interview(&sample_service(), &present).expect("interview runs");

        assert_eq!(transcript.reason, FinishReason::ConfidenceReached);
        assert_eq!(transcript.turns.len(), 5);
        assert_eq!(transcript.diseases[0].disease_name, "Canine parvovirus");
    }

    #[test]
    fn interview_without_symptoms_exhausts_questions() {
        let transcript =
            run_interview(&sample_service(), &BTreeSet::new()).expect("interview runs");

        assert_eq!(transcript.reason, FinishReason::QuestionsExhausted);
        assert!(transcript.diseases.is_empty());
        assert!(transcript.turns.iter().all(|turn| !turn.affirmed));
    }

    #[test]
    fn format_ids_handles_empty_lists() {
        assert_eq!(format_ids(std::iter::empty()), "(none)");
        assert_eq!(format_ids([SymptomId(3), SymptomId(9)].into_iter()), "3, 9");
    }
}
