use haitaton::config::HankeConfig;
use haitaton::disruption::{ClassificationConfig, CsvLayerSource, DisruptionAssessor};
use haitaton::error::AppError;
use haitaton::hanke::{HankeService, InMemoryHankeRepository, SequenceTunnusGenerator};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type HankeApi = HankeService<InMemoryHankeRepository, SequenceTunnusGenerator>;
pub(crate) type Assessor = DisruptionAssessor<CsvLayerSource>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn hanke_service(config: &HankeConfig) -> Arc<HankeApi> {
    Arc::new(HankeService::new(
        Arc::new(InMemoryHankeRepository::default()),
        Arc::new(SequenceTunnusGenerator::new(config.tunnus_prefix.clone())),
    ))
}

/// Loads overlap rows from `path`; without a path the source is empty and
/// every geometry set classifies to the lowest profile.
pub(crate) fn layer_source(path: Option<&Path>) -> Result<CsvLayerSource, AppError> {
    match path {
        Some(path) => {
            let source = CsvLayerSource::from_path(path)?;
            info!(path = %path.display(), rows = source.len(), "loaded spatial layer rows");
            Ok(source)
        }
        None => Ok(CsvLayerSource::default()),
    }
}

pub(crate) fn assessor(source: CsvLayerSource, config: ClassificationConfig) -> Arc<Assessor> {
    Arc::new(DisruptionAssessor::new(Arc::new(source), config))
}
