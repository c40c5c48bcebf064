use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use bizdesk_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SESSION_IDLE_MINUTES: i64 = 30;

/// Where backend ports are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendMode {
    /// Seeded in-process backend.
    Memory,
    /// Upstream REST backend.
    Http {
        base_url: Url,
        timeout: Duration,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub frontend_url: String,
    pub backend_mode: BackendMode,
    pub cookie_secure: bool,
    pub session_idle_minutes: i64,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let frontend_url = lookup("FRONTEND_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let backend_mode = match lookup("BACKEND_MODE")
            .unwrap_or_else(|| "memory".to_owned())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => BackendMode::Memory,
            "http" => {
                let raw_base_url = lookup("BACKEND_BASE_URL")
                    .filter(|value| !value.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::Validation(
                            "BACKEND_BASE_URL is required when BACKEND_MODE is 'http'".to_owned(),
                        )
                    })?;
                let base_url = Url::parse(raw_base_url.trim()).map_err(|error| {
                    AppError::Validation(format!("invalid BACKEND_BASE_URL: {error}"))
                })?;
                let timeout_secs = match lookup("BACKEND_TIMEOUT_SECS") {
                    Some(value) => value.parse::<u64>().map_err(|error| {
                        AppError::Validation(format!("invalid BACKEND_TIMEOUT_SECS: {error}"))
                    })?,
                    None => DEFAULT_BACKEND_TIMEOUT_SECS,
                };

                BackendMode::Http {
                    base_url,
                    timeout: Duration::from_secs(timeout_secs.max(1)),
                }
            }
            other => {
                return Err(AppError::Validation(format!(
                    "BACKEND_MODE must be either 'memory' or 'http', got '{other}'"
                )));
            }
        };

        let cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");
        let session_idle_minutes = lookup("SESSION_IDLE_MINUTES")
            .and_then(|value| value.parse::<i64>().ok())
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_SESSION_IDLE_MINUTES);

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            backend_mode,
            cookie_secure,
            session_idle_minutes,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
