use std::fmt::{Debug, Formatter};

use async_trait::async_trait;
use bizdesk_core::{AccessToken, AppError, AppResult, UserIdentity};
use bizdesk_domain::{
    CreateDashboardMetricInput, DashboardMetricRecord, DashboardMetricsListParams, MenuItemDto,
    PermissionSet, UpdateDashboardMetricInput,
};
use serde::{Deserialize, Serialize};

/// Credentials submitted on the login page.
#[derive(Clone, Deserialize)]
pub struct LoginCredentials {
    /// Account email.
    pub email: String,
    /// Plain-text password, only forwarded to the backend.
    pub password: String,
}

impl LoginCredentials {
    /// Rejects blank credentials before any backend call.
    pub fn validate(&self) -> AppResult<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "email and password are required".to_owned(),
            ));
        }

        Ok(())
    }
}

impl Debug for LoginCredentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Identity and bearer token issued by the backend on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedSession {
    /// Authenticated user.
    pub identity: UserIdentity,
    /// Token sent with every backend request of this session.
    pub token: AccessToken,
}

/// Backend authentication endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchanges credentials for an authenticated session.
    async fn login(&self, credentials: &LoginCredentials) -> AppResult<AuthenticatedSession>;

    /// Revokes the token on the backend.
    async fn logout(&self, token: &AccessToken) -> AppResult<()>;
}

/// Backend source of menu descriptors for the acting user.
#[async_trait]
pub trait MenuSource: Send + Sync {
    /// Fetches the nested descriptor list.
    async fn fetch_menu(&self, token: &AccessToken) -> AppResult<Vec<MenuItemDto>>;
}

/// Backend source of the acting user's permission set.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Fetches the current permission set.
    async fn fetch_permissions(&self, token: &AccessToken) -> AppResult<PermissionSet>;
}

/// Backend persistence of dashboard metric records.
#[async_trait]
pub trait DashboardMetricRepository: Send + Sync {
    /// Lists records matching the filters.
    async fn list_metrics(
        &self,
        token: &AccessToken,
        params: &DashboardMetricsListParams,
    ) -> AppResult<Vec<DashboardMetricRecord>>;

    /// Returns one record.
    async fn get_metric(&self, token: &AccessToken, id: &str) -> AppResult<DashboardMetricRecord>;

    /// Creates a record.
    async fn create_metric(
        &self,
        token: &AccessToken,
        input: &CreateDashboardMetricInput,
    ) -> AppResult<DashboardMetricRecord>;

    /// Applies a partial update.
    async fn update_metric(
        &self,
        token: &AccessToken,
        id: &str,
        input: &UpdateDashboardMetricInput,
    ) -> AppResult<DashboardMetricRecord>;

    /// Deletes a record.
    async fn delete_metric(&self, token: &AccessToken, id: &str) -> AppResult<()>;
}
