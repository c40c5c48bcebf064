use std::sync::Arc;

use bizdesk_core::{AppError, AppResult};
use bizdesk_domain::{
    CreateDashboardMetricInput, DashboardMetricRecord, DashboardMetricsListParams,
    UpdateDashboardMetricInput,
};
use tracing::info;

use crate::auth_context::AuthContext;
use crate::backend_ports::DashboardMetricRepository;
use crate::navigation_service::require_token;

/// Application service for dashboard metric records.
#[derive(Clone)]
pub struct DashboardMetricService {
    repository: Arc<dyn DashboardMetricRepository>,
}

impl DashboardMetricService {
    /// Creates a dashboard metric service.
    #[must_use]
    pub fn new(repository: Arc<dyn DashboardMetricRepository>) -> Self {
        Self { repository }
    }

    /// Lists records matching the filters.
    pub async fn list_metrics(
        &self,
        context: &AuthContext,
        params: &DashboardMetricsListParams,
    ) -> AppResult<Vec<DashboardMetricRecord>> {
        params.validate()?;
        let token = require_token(context)?;
        self.repository.list_metrics(token, params).await
    }

    /// Returns one record.
    pub async fn get_metric(
        &self,
        context: &AuthContext,
        id: &str,
    ) -> AppResult<DashboardMetricRecord> {
        let id = require_id(id)?;
        let token = require_token(context)?;
        self.repository.get_metric(token, id).await
    }

    /// Creates a record.
    pub async fn create_metric(
        &self,
        context: &AuthContext,
        input: &CreateDashboardMetricInput,
    ) -> AppResult<DashboardMetricRecord> {
        input.validate()?;
        let token = require_token(context)?;
        let record = self.repository.create_metric(token, input).await?;

        info!(metric_id = %record.id, period = %record.period, "dashboard metric created");
        Ok(record)
    }

    /// Applies a partial update.
    pub async fn update_metric(
        &self,
        context: &AuthContext,
        id: &str,
        input: &UpdateDashboardMetricInput,
    ) -> AppResult<DashboardMetricRecord> {
        let id = require_id(id)?;
        input.validate()?;
        let token = require_token(context)?;
        let record = self.repository.update_metric(token, id, input).await?;

        info!(metric_id = %record.id, "dashboard metric updated");
        Ok(record)
    }

    /// Deletes a record.
    pub async fn delete_metric(&self, context: &AuthContext, id: &str) -> AppResult<()> {
        let id = require_id(id)?;
        let token = require_token(context)?;
        self.repository.delete_metric(token, id).await?;

        info!(metric_id = id, "dashboard metric deleted");
        Ok(())
    }
}

fn require_id(id: &str) -> AppResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(AppError::Validation("metric id must not be empty".to_owned()));
    }

    Ok(id)
}
