use serde::Serialize;
use ts_rs::TS;

mod access;
mod auth;
mod metrics;
mod navigation;

pub use access::{GuardDeniedResponse, PageAccessResponse, PermissionSetResponse};
pub use auth::{LoginRequest, UserIdentityResponse};
pub use metrics::{
    CreateDashboardMetricRequest, DashboardMetricResponse, DashboardMetricsListQuery,
    UpdateDashboardMetricRequest,
};
pub use navigation::MenuItemResponse;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    /// `memory` or `http`.
    pub backend: &'static str,
}
