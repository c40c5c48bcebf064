use std::collections::HashMap;

use async_trait::async_trait;
use bizdesk_application::{
    AuthGateway, AuthenticatedSession, DashboardMetricRepository, LoginCredentials, MenuSource,
    PermissionSource,
};
use bizdesk_core::{AccessToken, AppError, AppResult, UserIdentity};
use bizdesk_domain::{
    CreateDashboardMetricInput, DashboardMetricRecord, DashboardMetricsListParams, MenuItemDto,
    PermissionSet, UpdateDashboardMetricInput,
};
use chrono::{Datelike, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;


/// Account accepted by [`InMemoryBackend::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryAccount {
    /// Stable user id.
    pub user_id: String,
    /// Name shown in the shell.
    pub display_name: String,
    /// Login email, matched case-insensitively.
    pub email: String,
    /// Plain-text password for development logins.
    pub password: String,
}

/// In-process stand-in for the REST backend.
///
/// Menus and permission sets are stored per user; users without their own
/// menu receive the default menu.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    accounts: RwLock<Vec<InMemoryAccount>>,
    sessions: RwLock<HashMap<String, String>>,
    default_menu: RwLock<Vec<MenuItemDto>>,
    user_menus: RwLock<HashMap<String, Vec<MenuItemDto>>>,
    permissions: RwLock<HashMap<String, PermissionSet>>,
    metrics: RwLock<Vec<DashboardMetricRecord>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account.
    pub async fn add_account(&self, account: InMemoryAccount) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;

        if accounts.iter().any(|existing| {
            existing.user_id == account.user_id
                || existing.email.eq_ignore_ascii_case(account.email.trim())
        }) {
            return Err(AppError::Conflict(format!(
                "account '{}' already exists",
                account.email
            )));
        }

        accounts.push(account);
        Ok(())
    }

    /// Replaces the menu served to users without a menu of their own.
    pub async fn set_default_menu(&self, menu: Vec<MenuItemDto>) {
        *self.default_menu.write().await = menu;
    }

    /// Replaces the menu served to one user.
    pub async fn set_user_menu(&self, user_id: impl Into<String>, menu: Vec<MenuItemDto>) {
        self.user_menus.write().await.insert(user_id.into(), menu);
    }

    /// Replaces the permission set of one user.
    pub async fn set_permissions(&self, user_id: impl Into<String>, permissions: PermissionSet) {
        self.permissions
            .write()
            .await
            .insert(user_id.into(), permissions);
    }

    /// Stores a metric record as-is.
    pub async fn insert_metric(&self, record: DashboardMetricRecord) -> AppResult<()> {
        let mut metrics = self.metrics.write().await;

        if metrics.iter().any(|existing| existing.id == record.id) {
            return Err(AppError::Conflict(format!(
                "metric '{}' already exists",
                record.id
            )));
        }

        metrics.push(record);
        Ok(())
    }

    async fn session_user(&self, token: &AccessToken) -> AppResult<String> {
        self.sessions
            .read()
            .await
            .get(token.expose())
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("unknown or expired access token".to_owned()))
    }
}

#[async_trait]
impl AuthGateway for InMemoryBackend {
    async fn login(&self, credentials: &LoginCredentials) -> AppResult<AuthenticatedSession> {
        let account = self
            .accounts
            .read()
            .await
            .iter()
            .find(|account| {
                account.email.eq_ignore_ascii_case(credentials.email.trim())
                    && account.password == credentials.password
            })
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("invalid email or password".to_owned()))?;

        let token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(token.clone(), account.user_id.clone());

        Ok(AuthenticatedSession {
            identity: UserIdentity::new(account.user_id, account.display_name, Some(account.email)),
            token: AccessToken::new(token),
        })
    }

    async fn logout(&self, token: &AccessToken) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(token.expose())
            .map(|_| ())
            .ok_or_else(|| AppError::Unauthorized("unknown or expired access token".to_owned()))
    }
}

#[async_trait]
impl MenuSource for InMemoryBackend {
    async fn fetch_menu(&self, token: &AccessToken) -> AppResult<Vec<MenuItemDto>> {
        let user_id = self.session_user(token).await?;

        if let Some(menu) = self.user_menus.read().await.get(&user_id) {
            return Ok(menu.clone());
        }

        Ok(self.default_menu.read().await.clone())
    }
}

#[async_trait]
impl PermissionSource for InMemoryBackend {
    async fn fetch_permissions(&self, token: &AccessToken) -> AppResult<PermissionSet> {
        let user_id = self.session_user(token).await?;

        Ok(self
            .permissions
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl DashboardMetricRepository for InMemoryBackend {
    async fn list_metrics(
        &self,
        token: &AccessToken,
        params: &DashboardMetricsListParams,
    ) -> AppResult<Vec<DashboardMetricRecord>> {
        self.session_user(token).await?;

        Ok(self
            .metrics
            .read()
            .await
            .iter()
            .filter(|record| period_matches(&record.period, params))
            .cloned()
            .collect())
    }

    async fn get_metric(&self, token: &AccessToken, id: &str) -> AppResult<DashboardMetricRecord> {
        self.session_user(token).await?;

        self.metrics
            .read()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("metric '{id}' does not exist")))
    }

    async fn create_metric(
        &self,
        token: &AccessToken,
        input: &CreateDashboardMetricInput,
    ) -> AppResult<DashboardMetricRecord> {
        self.session_user(token).await?;

        let now = Utc::now();
        let record = DashboardMetricRecord {
            id: Uuid::new_v4().to_string(),
            user_id: input.user_id.clone(),
            period: input.period.clone(),
            investment: input.investment,
            visitors: input.visitors,
            bot_conversations: input.bot_conversations,
            human_conversations: input.human_conversations,
            proposals: input.proposals,
            closed_deals: input.closed_deals,
            created_at: now,
            updated_at: now,
        };

        self.metrics.write().await.push(record.clone());
        Ok(record)
    }

    async fn update_metric(
        &self,
        token: &AccessToken,
        id: &str,
        input: &UpdateDashboardMetricInput,
    ) -> AppResult<DashboardMetricRecord> {
        self.session_user(token).await?;

        let mut metrics = self.metrics.write().await;
        let record = metrics
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(format!("metric '{id}' does not exist")))?;

        input.apply_to(record);
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete_metric(&self, token: &AccessToken, id: &str) -> AppResult<()> {
        self.session_user(token).await?;

        let mut metrics = self.metrics.write().await;
        let position = metrics
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| AppError::NotFound(format!("metric '{id}' does not exist")))?;

        metrics.remove(position);
        Ok(())
    }
}

/// Matches a record period (`YYYY-MM-DD`, optionally followed by a time)
/// against the list filters. Unparseable periods only pass an empty filter.
/// With `week` set, `year` names the ISO week-numbering year.
fn period_matches(period: &str, params: &DashboardMetricsListParams) -> bool {
    let has_filter = params.year.is_some()
        || params.month.is_some()
        || params.week.is_some()
        || params.start_date.is_some()
        || params.end_date.is_some();
    if !has_filter {
        return true;
    }

    let Some(date) = period
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    else {
        return false;
    };

    // A week filter pairs with the ISO week-numbering year.
    let year_of_date = if params.week.is_some() {
        date.iso_week().year()
    } else {
        date.year()
    };

    params.year.is_none_or(|year| year_of_date == year)
        && params.month.is_none_or(|month| date.month() == month)
        && params.week.is_none_or(|week| date.iso_week().week() == week)
        && params.start_date.is_none_or(|start| date >= start)
        && params.end_date.is_none_or(|end| date <= end)
}
