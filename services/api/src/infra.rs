use finpro_contact::config::AppConfig;
use finpro_contact::delivery::{ReqwestTransport, TracingMailGateway};
use finpro_contact::error::AppError;
use finpro_contact::service::ContactIntakeService;
use finpro_contact::storage::{InMemoryKv, JsonFileKv, KvStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the intake service against the configured store and the real
/// outbound transports.
pub(crate) fn build_intake_service(
    config: &AppConfig,
) -> Result<Arc<ContactIntakeService>, AppError> {
    let kv: Arc<dyn KvStore> = match config.storage.store_path() {
        Some(path) => {
            info!(path = %path.display(), "using file-backed store");
            Arc::new(JsonFileKv::open(path)?)
        }
        None => {
            info!("no data directory configured, using in-memory store");
            Arc::new(InMemoryKv::default())
        }
    };

    Ok(Arc::new(ContactIntakeService::new(
        kv,
        Arc::new(ReqwestTransport::default()),
        Arc::new(TracingMailGateway),
    )))
}
