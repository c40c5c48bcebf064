use std::sync::Arc;

use bizdesk_application::{
    AuthService, DashboardMetricService, NavigationService, PermissionGuard,
    standard_route_table,
};
use bizdesk_core::AppError;

use crate::state::AppState;

use super::BackendPorts;

pub fn build_app_state(ports: BackendPorts, frontend_url: &str) -> Result<AppState, AppError> {
    let navigation_service = NavigationService::new(ports.menu_source);

    Ok(AppState {
        auth_service: AuthService::new(ports.auth_gateway),
        permission_guard: PermissionGuard::new(
            ports.permission_source,
            navigation_service.clone(),
        ),
        navigation_service,
        dashboard_metric_service: DashboardMetricService::new(ports.metric_repository),
        route_table: Arc::new(standard_route_table()?),
        frontend_url: frontend_url.to_owned(),
        backend_kind: ports.kind,
    })
}
