use std::sync::Arc;

use bizdesk_application::{AuthGateway, DashboardMetricRepository, MenuSource, PermissionSource};
use bizdesk_core::AppError;
use bizdesk_infrastructure::{HttpBackendClient, HttpBackendConfig, InMemoryBackend};
use tracing::info;

use crate::api_config::BackendMode;
use crate::dev_seed::seed_demo_backend;

/// Backend port implementations shared by the services.
#[derive(Clone)]
pub struct BackendPorts {
    pub kind: &'static str,
    pub auth_gateway: Arc<dyn AuthGateway>,
    pub menu_source: Arc<dyn MenuSource>,
    pub permission_source: Arc<dyn PermissionSource>,
    pub metric_repository: Arc<dyn DashboardMetricRepository>,
}

impl BackendPorts {
    fn from_backend<B>(kind: &'static str, backend: Arc<B>) -> Self
    where
        B: AuthGateway + MenuSource + PermissionSource + DashboardMetricRepository + 'static,
    {
        Self {
            kind,
            auth_gateway: backend.clone(),
            menu_source: backend.clone(),
            permission_source: backend.clone(),
            metric_repository: backend,
        }
    }
}

pub async fn build_backend_ports(mode: &BackendMode) -> Result<BackendPorts, AppError> {
    match mode {
        BackendMode::Memory => {
            let backend = Arc::new(InMemoryBackend::new());
            seed_demo_backend(&backend).await?;
            info!("using seeded in-memory backend");
            Ok(BackendPorts::from_backend("memory", backend))
        }
        BackendMode::Http { base_url, timeout } => {
            let client = HttpBackendClient::new(HttpBackendConfig {
                base_url: base_url.clone(),
                timeout: *timeout,
            })?;
            info!(base_url = %base_url, "using upstream http backend");
            Ok(BackendPorts::from_backend("http", Arc::new(client)))
        }
    }
}
