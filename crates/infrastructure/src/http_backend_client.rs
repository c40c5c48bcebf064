use std::time::Duration;

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
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

mod menu_payload;
mod permission_payload;


use menu_payload::{menu_descriptors_from_payload, nest_flat_menu};
use permission_payload::permission_set_from_payload;

const MAX_ERROR_BODY_CHARS: usize = 300;

/// Connection settings for the upstream REST backend.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Root URL every endpoint path is joined onto.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// reqwest implementation of every backend port.
#[derive(Clone)]
pub struct HttpBackendClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpBackendClient {
    /// Builds a client with the configured timeout.
    pub fn new(config: HttpBackendConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build backend http client: {error}"))
            })?;

        Ok(Self::with_client(http_client, config.base_url))
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub fn with_client(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url: with_trailing_slash(base_url),
        }
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|error| {
                AppError::Internal(format!("invalid backend endpoint '{path}': {error}"))
            })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let response = request.send().await.map_err(|error| {
            warn!(error = %error, "backend request failed");
            AppError::Unavailable(format!("backend request failed: {error}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<response body unavailable>".to_owned());
        debug!(status = %status, "backend returned error status");
        Err(error_for_status(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> AppResult<T> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|error| {
            AppError::Unavailable(format!("backend returned an unreadable payload: {error}"))
        })
    }

    fn metric_endpoint(&self, id: &str) -> AppResult<Url> {
        let mut url = self.endpoint("metrics")?;
        url.path_segments_mut()
            .map_err(|()| AppError::Internal("backend base url cannot carry a path".to_owned()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

#[async_trait]
impl AuthGateway for HttpBackendClient {
    async fn login(&self, credentials: &LoginCredentials) -> AppResult<AuthenticatedSession> {
        let url = self.endpoint("auth/login")?;
        let response: LoginResponse = self
            .send_json(self.http_client.post(url).json(&LoginRequest {
                email: credentials.email.as_str(),
                password: credentials.password.as_str(),
            }))
            .await?;

        response.into_session()
    }

    async fn logout(&self, token: &AccessToken) -> AppResult<()> {
        let url = self.endpoint("auth/logout")?;
        self.send(authorized(self.http_client.post(url), token)).await?;
        Ok(())
    }
}

#[async_trait]
impl MenuSource for HttpBackendClient {
    async fn fetch_menu(&self, token: &AccessToken) -> AppResult<Vec<MenuItemDto>> {
        let url = self.endpoint("menu")?;
        let payload: Value = self
            .send_json(authorized(self.http_client.get(url), token))
            .await?;

        let descriptors = menu_descriptors_from_payload(payload)?;
        nest_flat_menu(descriptors)
    }
}

#[async_trait]
impl PermissionSource for HttpBackendClient {
    async fn fetch_permissions(&self, token: &AccessToken) -> AppResult<PermissionSet> {
        let url = self.endpoint("permissions")?;
        let payload: Value = self
            .send_json(authorized(self.http_client.get(url), token))
            .await?;

        permission_set_from_payload(&payload)
    }
}

#[async_trait]
impl DashboardMetricRepository for HttpBackendClient {
    async fn list_metrics(
        &self,
        token: &AccessToken,
        params: &DashboardMetricsListParams,
    ) -> AppResult<Vec<DashboardMetricRecord>> {
        let url = self.endpoint("metrics")?;
        self.send_json(authorized(self.http_client.get(url).query(params), token))
            .await
    }

    async fn get_metric(&self, token: &AccessToken, id: &str) -> AppResult<DashboardMetricRecord> {
        let url = self.metric_endpoint(id)?;
        self.send_json(authorized(self.http_client.get(url), token))
            .await
    }

    async fn create_metric(
        &self,
        token: &AccessToken,
        input: &CreateDashboardMetricInput,
    ) -> AppResult<DashboardMetricRecord> {
        let url = self.endpoint("metrics")?;
        self.send_json(authorized(self.http_client.post(url).json(input), token))
            .await
    }

    async fn update_metric(
        &self,
        token: &AccessToken,
        id: &str,
        input: &UpdateDashboardMetricInput,
    ) -> AppResult<DashboardMetricRecord> {
        let url = self.metric_endpoint(id)?;
        self.send_json(authorized(self.http_client.put(url).json(input), token))
            .await
    }

    async fn delete_metric(&self, token: &AccessToken, id: &str) -> AppResult<()> {
        let url = self.metric_endpoint(id)?;
        self.send(authorized(self.http_client.delete(url), token)).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: LoginUser,
}

#[derive(Deserialize)]
struct LoginUser {
    id: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl LoginResponse {
    fn into_session(self) -> AppResult<AuthenticatedSession> {
        if self.token.trim().is_empty() {
            return Err(AppError::Unavailable(
                "backend issued an empty access token".to_owned(),
            ));
        }

        let user_id = match self.user.id {
            Value::String(value) if !value.trim().is_empty() => value,
            Value::Number(value) => value.to_string(),
            other => {
                return Err(AppError::Unavailable(format!(
                    "backend returned an unusable user id: {other}"
                )));
            }
        };
        let display_name = self
            .user
            .name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.user.email.clone())
            .unwrap_or_else(|| user_id.clone());

        Ok(AuthenticatedSession {
            identity: UserIdentity::new(user_id, display_name, self.user.email),
            token: AccessToken::new(self.token),
        })
    }
}

fn authorized(builder: reqwest::RequestBuilder, token: &AccessToken) -> reqwest::RequestBuilder {
    builder.bearer_auth(token.expose())
}

/// Maps a non-success backend status onto the application error taxonomy.
fn error_for_status(status: StatusCode, body: &str) -> AppError {
    let message = error_message(body).unwrap_or_else(|| format!("backend responded with {status}"));

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Unavailable(format!("backend responded with {status}: {message}")),
    }
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(trimmed) {
        if let Some(message) = ["message", "error"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
        {
            return Some(message.to_owned());
        }
    }

    Some(trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect())
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
