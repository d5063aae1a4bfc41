use crate::infra::{AppState, CatalogService, CatalogSummary};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use petblog::error::AppError;
use petblog::workflows::diagnosis::diagnosis_router;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_diagnosis_routes(service: Arc<CatalogService>) -> axum::Router {
    diagnosis_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/diagnosis/catalog/reload",
            axum::routing::post(reload_catalog_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn reload_catalog_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<CatalogSummary>, AppError> {
    let summary = state.catalog.reload()?;
    Ok(Json(summary))
}
