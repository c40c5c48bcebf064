use std::sync::Arc;

use bizdesk_core::{AppResult, UserIdentity};
use tracing::{info, warn};

use crate::auth_context::AuthContext;
use crate::backend_ports::{AuthGateway, LoginCredentials};

/// Application service for session login and logout.
#[derive(Clone)]
pub struct AuthService {
    gateway: Arc<dyn AuthGateway>,
}

impl AuthService {
    /// Creates an auth service.
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>) -> Self {
        Self { gateway }
    }

    /// Authenticates against the backend and populates the context.
    pub async fn login(
        &self,
        context: &mut AuthContext,
        credentials: &LoginCredentials,
    ) -> AppResult<UserIdentity> {
        credentials.validate()?;

        let session = self.gateway.login(credentials).await?;
        let identity = session.identity.clone();
        context.login(session);

        info!(user_id = identity.user_id(), "user signed in");
        Ok(identity)
    }

    /// Clears the context. Backend revocation is best-effort.
    pub async fn logout(&self, context: &mut AuthContext) {
        let Some(session) = context.logout() else {
            return;
        };

        if let Err(error) = self.gateway.logout(&session.token).await {
            warn!(%error, user_id = session.identity.user_id(), "backend logout failed");
        }

        info!(user_id = session.identity.user_id(), "user signed out");
    }
}
