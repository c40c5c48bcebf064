use std::sync::Arc;

use bizdesk_application::{
    AuthService, DashboardMetricService, NavigationService, PermissionGuard,
};
use bizdesk_domain::RouteTable;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub navigation_service: NavigationService,
    pub permission_guard: PermissionGuard,
    pub dashboard_metric_service: DashboardMetricService,
    pub route_table: Arc<RouteTable>,
    pub frontend_url: String,
    pub backend_kind: &'static str,
}
