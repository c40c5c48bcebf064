use std::sync::Arc;

use bizdesk_core::AppResult;
use bizdesk_domain::{
    AccessDecision, DenialReason, GuardState, PermissionSet, RouteGuard, evaluate_access,
};
use tracing::{debug, warn};

use crate::auth_context::AuthContext;
use crate::backend_ports::PermissionSource;
use crate::navigation_service::{NavigationService, require_token};

/// States visited by one guard run, ending in `Granted` or `Denied`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOutcome {
    states: Vec<GuardState>,
}

impl GuardOutcome {
    fn start() -> Self {
        Self {
            states: vec![GuardState::LoadingPermissions],
        }
    }

    fn enter(&mut self, state: GuardState) {
        self.states.push(state);
    }

    fn finish(mut self, decision: AccessDecision) -> Self {
        self.states.push(decision.into());
        self
    }

    /// Returns every state in visiting order.
    #[must_use]
    pub fn states(&self) -> &[GuardState] {
        &self.states
    }

    /// Returns the terminal state.
    #[must_use]
    pub fn final_state(&self) -> &GuardState {
        self.states
            .last()
            .unwrap_or(&GuardState::LoadingPermissions)
    }

    /// Returns whether the page may be served.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self.final_state(), GuardState::Granted)
    }

    /// Returns the denial cause, if any.
    #[must_use]
    pub fn denial_reason(&self) -> Option<&DenialReason> {
        match self.final_state() {
            GuardState::Denied { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Route-level gate deciding whether a protected page is served.
///
/// Fetch failures deny; the guard itself never fails.
#[derive(Clone)]
pub struct PermissionGuard {
    permission_source: Arc<dyn PermissionSource>,
    navigation_service: NavigationService,
}

impl PermissionGuard {
    /// Creates a permission guard.
    #[must_use]
    pub fn new(
        permission_source: Arc<dyn PermissionSource>,
        navigation_service: NavigationService,
    ) -> Self {
        Self {
            permission_source,
            navigation_service,
        }
    }

    /// Returns the session's permission set.
    ///
    /// With `fresh` the backend is always asked; otherwise a cached set is
    /// reused when present. Fetched sets are cached in the context.
    pub async fn permissions(
        &self,
        context: &mut AuthContext,
        fresh: bool,
    ) -> AppResult<PermissionSet> {
        if !fresh {
            if let Some(cached) = context.cached_permissions() {
                return Ok(cached.clone());
            }
        }

        let token = require_token(context)?;
        let permissions = self.permission_source.fetch_permissions(token).await?;
        context.cache_permissions(permissions.clone());

        Ok(permissions)
    }

    /// Runs the guard for one page request.
    pub async fn check(&self, context: &mut AuthContext, rule: &RouteGuard) -> GuardOutcome {
        let mut outcome = GuardOutcome::start();

        let Some(token) = context.token().cloned() else {
            return outcome.finish(AccessDecision::Denied(DenialReason::Unauthenticated));
        };

        let permissions = match self.permissions(context, rule.require_remote()).await {
            Ok(permissions) => permissions,
            Err(error) => {
                warn!(%error, "permission set unavailable, denying access");
                return outcome.finish(AccessDecision::Denied(
                    DenialReason::PermissionsUnavailable,
                ));
            }
        };

        let menu = match rule.menu_path() {
            Some(_) => match self.navigation_service.resolved_menu(&token).await {
                Ok(menu) => Some(menu),
                Err(error) => {
                    warn!(%error, "menu unavailable, denying access");
                    return outcome.finish(AccessDecision::Denied(DenialReason::MenuUnavailable));
                }
            },
            None => None,
        };

        outcome.enter(GuardState::Checking);
        let decision = evaluate_access(rule, &permissions, menu.as_deref());
        debug!(
            required = rule.required().map(|key| key.as_str()),
            menu_path = rule.menu_path(),
            granted = decision.is_granted(),
            "evaluated route guard"
        );

        outcome.finish(decision)
    }
}
