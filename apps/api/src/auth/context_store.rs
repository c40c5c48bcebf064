use bizdesk_application::AuthContext;
use bizdesk_core::AppError;
use tower_sessions::Session;

use super::SESSION_AUTH_CONTEXT_KEY;

/// Reads the session's auth context, anonymous when none was stored.
pub async fn load_auth_context(session: &Session) -> Result<AuthContext, AppError> {
    Ok(session
        .get::<AuthContext>(SESSION_AUTH_CONTEXT_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session context: {error}")))?
        .unwrap_or_default())
}

pub async fn store_auth_context(session: &Session, context: &AuthContext) -> Result<(), AppError> {
    session
        .insert(SESSION_AUTH_CONTEXT_KEY, context)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist session context: {error}")))
}
