use bizdesk_core::{AccessToken, UserIdentity};
use bizdesk_domain::PermissionSet;
use serde::{Deserialize, Serialize};

use crate::backend_ports::AuthenticatedSession;

/// Authentication and permission state of one browser session.
///
/// Populated by [`AuthContext::login`] and cleared by [`AuthContext::logout`].
/// Both transitions drop the cached permission set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    session: Option<AuthenticatedSession>,
    permissions: Option<PermissionSet>,
}

impl AuthContext {
    /// Creates an anonymous context.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates a context for a freshly authenticated session.
    #[must_use]
    pub fn authenticated(session: AuthenticatedSession) -> Self {
        let mut context = Self::default();
        context.login(session);
        context
    }

    /// Stores a new session, replacing any previous one.
    pub fn login(&mut self, session: AuthenticatedSession) {
        self.session = Some(session);
        self.permissions = None;
    }

    /// Clears the session and returns it.
    pub fn logout(&mut self) -> Option<AuthenticatedSession> {
        self.permissions = None;
        self.session.take()
    }

    /// Returns whether a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Returns the authenticated user.
    #[must_use]
    pub fn identity(&self) -> Option<&UserIdentity> {
        self.session.as_ref().map(|session| &session.identity)
    }

    /// Returns the backend token.
    #[must_use]
    pub fn token(&self) -> Option<&AccessToken> {
        self.session.as_ref().map(|session| &session.token)
    }

    /// Returns the permission set cached for this session.
    #[must_use]
    pub fn cached_permissions(&self) -> Option<&PermissionSet> {
        self.permissions.as_ref()
    }

    /// Caches a permission set. Ignored for anonymous contexts.
    pub fn cache_permissions(&mut self, permissions: PermissionSet) {
        if self.is_authenticated() {
            self.permissions = Some(permissions);
        }
    }

    /// Drops the cached permission set.
    pub fn invalidate_permissions(&mut self) {
        self.permissions = None;
    }
}

#[cfg(test)]
mod tests {
    use bizdesk_core::{AccessToken, UserIdentity};
    use bizdesk_domain::PermissionSet;

    use super::AuthContext;
    use crate::backend_ports::AuthenticatedSession;

    fn session(user_id: &str) -> AuthenticatedSession {
        AuthenticatedSession {
            identity: UserIdentity::new(user_id, user_id, None),
            token: AccessToken::new(format!("token-{user_id}")),
        }
    }

    #[test]
    fn login_and_logout_reset_cached_permissions() {
        let mut context = AuthContext::authenticated(session("alice"));
        context.cache_permissions(PermissionSet::new());
        assert!(context.cached_permissions().is_some());

        context.login(session("bob"));
        assert!(context.cached_permissions().is_none());
        assert_eq!(context.identity().map(UserIdentity::user_id), Some("bob"));

        context.cache_permissions(PermissionSet::new());
        let previous = context.logout();
        assert_eq!(previous.map(|value| value.identity.user_id().to_owned()), Some("bob".to_owned()));
        assert!(!context.is_authenticated());
        assert!(context.cached_permissions().is_none());
    }

    #[test]
    fn anonymous_context_never_caches_permissions() {
        let mut context = AuthContext::anonymous();
        context.cache_permissions(PermissionSet::new());
        assert!(context.cached_permissions().is_none());
        assert!(context.token().is_none());
    }
}
