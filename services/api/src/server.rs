use crate::cli::ServeArgs;
use crate::infra::{AppState, CatalogSource};
use crate::routes::with_diagnosis_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use petblog::config::AppConfig;
use petblog::error::AppError;
use petblog::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let catalog = Arc::new(CatalogSource::open(&config.diagnosis)?);
    let diagnosis_service = catalog.service()?;
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        catalog,
    };

    let app = with_diagnosis_routes(diagnosis_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        min_questions = config.diagnosis.engine.min_questions,
        stop_threshold = config.diagnosis.engine.stop_threshold,
        "pet symptom checker ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
