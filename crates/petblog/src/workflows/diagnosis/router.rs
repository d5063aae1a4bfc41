use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{SessionState, SymptomId};
use super::repository::KnowledgeRepository;
use super::service::{DiagnosisService, DiagnosisServiceError};

/// Body of the one-shot diagnosis endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnoseRequest {
    #[serde(default)]
    pub selected_symptoms: Vec<SymptomId>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Router builder exposing the symptom questionnaire and diagnosis endpoints.
pub fn diagnosis_router<R>(service: Arc<DiagnosisService<R>>) -> Router
where
    R: KnowledgeRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/diagnosis/next-question",
            post(next_question_handler::<R>),
        )
        .route("/api/v1/diagnosis/diagnose", post(diagnose_handler::<R>))
        .route(
            "/api/v1/diagnosis/diagnose-multiple",
            post(diagnose_multiple_handler::<R>),
        )
        .route("/api/v1/diagnosis/symptoms", get(symptoms_handler::<R>))
        .with_state(service)
}

pub(crate) async fn next_question_handler<R>(
    State(service): State<Arc<DiagnosisService<R>>>,
    axum::Json(state): axum::Json<SessionState>,
) -> Response
where
    R: KnowledgeRepository + 'static,
{
    match service.next_question(&state) {
        Ok(step) => (StatusCode::OK, axum::Json(step.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn diagnose_handler<R>(
    State(service): State<Arc<DiagnosisService<R>>>,
    axum::Json(request): axum::Json<DiagnoseRequest>,
) -> Response
where
    R: KnowledgeRepository + 'static,
{
    match service.diagnose(&request.selected_symptoms) {
        Ok(Some(result)) => (StatusCode::OK, axum::Json(result)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": "no disease matches the selected symptoms",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn diagnose_multiple_handler<R>(
    State(service): State<Arc<DiagnosisService<R>>>,
    axum::Json(request): axum::Json<DiagnoseRequest>,
) -> Response
where
    R: KnowledgeRepository + 'static,
{
    let limit = request
        .limit
        .unwrap_or(service.engine().config().result_limit);

    match service.diagnose_multiple(&request.selected_symptoms, limit) {
        Ok(results) => (StatusCode::OK, axum::Json(results)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn symptoms_handler<R>(State(service): State<Arc<DiagnosisService<R>>>) -> Response
where
    R: KnowledgeRepository + 'static,
{
    match service.symptoms() {
        Ok(symptoms) => (StatusCode::OK, axum::Json(symptoms)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: DiagnosisServiceError) -> Response {
    let status = match &err {
        DiagnosisServiceError::InvalidLimit(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DiagnosisServiceError::Config(_)
        | DiagnosisServiceError::Knowledge(_)
        | DiagnosisServiceError::Repository(_) => {
            error!(error = %err, "diagnosis request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
