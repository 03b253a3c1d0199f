use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_match::config::{AppConfig, MatchConfig};
use talent_match::engine::VariableCatalog;
use talent_match::error::AppError;
use talent_match::service::{CsvDirectorySource, MatchDefaults, TalentMatchService};
use talent_match::telemetry;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load configuration for a one-shot CLI command and install telemetry, so
/// service warnings reach stderr. Returns the match settings with an optional
/// snapshot directory override applied.
pub(crate) fn load_match_config(data_dir: Option<PathBuf>) -> Result<MatchConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let mut matching = config.matching;
    if let Some(dir) = data_dir {
        matching.data_dir = dir;
    }
    Ok(matching)
}

pub(crate) fn csv_match_service(config: &MatchConfig) -> TalentMatchService<CsvDirectorySource> {
    let catalog = VariableCatalog::default();
    let source = CsvDirectorySource::new(config.data_dir.clone(), catalog.clone());
    TalentMatchService::new(Arc::new(source), catalog, MatchDefaults::from(config))
}
