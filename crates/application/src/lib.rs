//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_context;
mod auth_service;
mod backend_ports;
mod dashboard_metric_service;
mod navigation_service;
mod page_routes;
mod permission_guard;

pub use auth_context::AuthContext;
pub use auth_service::AuthService;
pub use backend_ports::{
    AuthGateway, AuthenticatedSession, DashboardMetricRepository, LoginCredentials, MenuSource,
    PermissionSource,
};
pub use dashboard_metric_service::DashboardMetricService;
pub use navigation_service::{NavigationService, NavigationTree};
pub use page_routes::{
    SETTINGS_METRICS_VIEW, SETTINGS_PERMISSIONS_VIEW, settings_metrics_guard,
    settings_permissions_guard, settings_users_guard, standard_route_table,
};
pub use permission_guard::{GuardOutcome, PermissionGuard};
