use metrics_exporter_prometheus::PrometheusHandle;
use petblog::config::DiagnosisConfig;
use petblog::error::AppError;
use petblog::workflows::diagnosis::{
    Catalog, DiagnosisService, DiagnosisServiceError, InMemoryKnowledgeRepository,
};
use serde::Serialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Arc<CatalogSource>,
}

pub(crate) type CatalogService = DiagnosisService<InMemoryKnowledgeRepository>;

/// Row counts of a loaded catalog, reported after startup and reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct CatalogSummary {
    pub(crate) symptoms: usize,
    pub(crate) diseases: usize,
    pub(crate) links: usize,
}

impl CatalogSummary {
    fn of(catalog: &Catalog) -> Self {
        Self {
            symptoms: catalog.symptoms.len(),
            diseases: catalog.diseases.len(),
            links: catalog.links.len(),
        }
    }
}

/// The live catalog repository together with the settings it was loaded from.
pub(crate) struct CatalogSource {
    config: DiagnosisConfig,
    repository: Arc<InMemoryKnowledgeRepository>,
}

impl CatalogSource {
    pub(crate) fn open(config: &DiagnosisConfig) -> Result<Self, AppError> {
        let catalog = load_catalog(config)?;
        let summary = CatalogSummary::of(&catalog);
        info!(
            symptoms = summary.symptoms,
            diseases = summary.diseases,
            links = summary.links,
            "diagnosis catalog ready"
        );

        Ok(Self {
            config: config.clone(),
            repository: Arc::new(InMemoryKnowledgeRepository::new(catalog)),
        })
    }

    pub(crate) fn service(&self) -> Result<Arc<CatalogService>, AppError> {
        let service = DiagnosisService::new(self.repository.clone(), self.config.engine.clone())?;
        Ok(Arc::new(service))
    }

    /// Re-read the catalog files and swap them in. The running catalog is kept on failure.
    pub(crate) fn reload(&self) -> Result<CatalogSummary, AppError> {
        let catalog = load_catalog(&self.config)?;
        let summary = CatalogSummary::of(&catalog);
        self.repository
            .replace(catalog)
            .map_err(DiagnosisServiceError::from)?;

        info!(
            symptoms = summary.symptoms,
            diseases = summary.diseases,
            links = summary.links,
            "diagnosis catalog reloaded"
        );
        Ok(summary)
    }
}

/// Load the catalog from `DIAGNOSIS_CATALOG_DIR`, or the bundled sample when unset.
pub(crate) fn load_catalog(config: &DiagnosisConfig) -> Result<Catalog, AppError> {
    let catalog = match &config.catalog_dir {
        Some(dir) => {
            info!(catalog_dir = %dir.display(), "loading diagnosis catalog");
            Catalog::from_dir(dir)?
        }
        None => Catalog::sample()?,
    };
    Ok(catalog)
}

pub(crate) fn build_service(config: &DiagnosisConfig) -> Result<Arc<CatalogService>, AppError> {
    CatalogSource::open(config)?.service()
}
