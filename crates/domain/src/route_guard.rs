use serde::{Deserialize, Serialize};

use crate::menu::{MenuItem, find_menu_item_by_url};
use crate::security::{PermissionKey, PermissionSet};

/// Access rule attached to a protected page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGuard {
    required: Option<PermissionKey>,
    menu_path: Option<String>,
    require_remote: bool,
}

impl RouteGuard {
    /// Creates a rule with no checks that reads permissions from the backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            required: None,
            menu_path: None,
            require_remote: true,
        }
    }

    /// Requires a permission key to be granted.
    #[must_use]
    pub fn with_required(mut self, permission: PermissionKey) -> Self {
        self.required = Some(permission);
        self
    }

    /// Requires the menu entry with this url to be viewable.
    #[must_use]
    pub fn with_menu_path(mut self, menu_path: impl Into<String>) -> Self {
        self.menu_path = Some(menu_path.into());
        self
    }

    /// Chooses between a fresh permission fetch and a cached permission set.
    #[must_use]
    pub fn with_require_remote(mut self, require_remote: bool) -> Self {
        self.require_remote = require_remote;
        self
    }

    /// Returns the required permission key.
    #[must_use]
    pub fn required(&self) -> Option<&PermissionKey> {
        self.required.as_ref()
    }

    /// Returns the menu url checked by this rule.
    #[must_use]
    pub fn menu_path(&self) -> Option<&str> {
        self.menu_path.as_deref()
    }

    /// Returns whether permissions must be fetched fresh.
    #[must_use]
    pub fn require_remote(&self) -> bool {
        self.require_remote
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a guard refused to serve a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DenialReason {
    /// No authenticated session.
    Unauthenticated,
    /// The permission set could not be loaded.
    PermissionsUnavailable,
    /// The menu needed for a path check could not be loaded.
    MenuUnavailable,
    /// The required key is missing or not granted.
    MissingPermission {
        /// Required key.
        permission: PermissionKey,
    },
    /// The menu entry exists but its flag does not grant visibility.
    MenuPathHidden {
        /// Checked url.
        path: String,
    },
    /// No menu entry carries the checked url.
    MenuPathUnknown {
        /// Checked url.
        path: String,
    },
}

impl DenialReason {
    /// Returns a human-readable explanation.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Unauthenticated => "authentication required".to_owned(),
            Self::PermissionsUnavailable => "permissions could not be loaded".to_owned(),
            Self::MenuUnavailable => "menu could not be loaded".to_owned(),
            Self::MissingPermission { permission } => {
                format!("missing permission '{permission}'")
            }
            Self::MenuPathHidden { path } => format!("menu entry '{path}' is not viewable"),
            Self::MenuPathUnknown { path } => format!("no menu entry for '{path}'"),
        }
    }
}

/// Outcome of evaluating a rule against loaded permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The page may be served.
    Granted,
    /// The page must not be served.
    Denied(DenialReason),
}

impl AccessDecision {
    /// Returns whether access was granted.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Guard lifecycle states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum GuardState {
    /// Waiting for the permission set (and menu, for path checks).
    LoadingPermissions,
    /// Evaluating the rule.
    Checking,
    /// Page may be mounted.
    Granted,
    /// Fallback must be rendered.
    Denied {
        /// Denial cause.
        reason: DenialReason,
    },
}

impl GuardState {
    /// Returns whether the state ends a guard run.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Granted | Self::Denied { .. })
    }
}

impl From<AccessDecision> for GuardState {
    fn from(value: AccessDecision) -> Self {
        match value {
            AccessDecision::Granted => Self::Granted,
            AccessDecision::Denied(reason) => Self::Denied { reason },
        }
    }
}

/// Evaluates a rule. Both checks must pass when both are configured.
///
/// `menu` is the unfiltered resolved tree; it is only consulted when the rule
/// carries a menu path, and `None` then denies.
#[must_use]
pub fn evaluate_access(
    rule: &RouteGuard,
    permissions: &PermissionSet,
    menu: Option<&[MenuItem]>,
) -> AccessDecision {
    if let Some(permission) = rule.required() {
        if !permissions.allows(permission) {
            return AccessDecision::Denied(DenialReason::MissingPermission {
                permission: permission.clone(),
            });
        }
    }

    if let Some(path) = rule.menu_path() {
        let Some(menu) = menu else {
            return AccessDecision::Denied(DenialReason::MenuUnavailable);
        };

        return match find_menu_item_by_url(menu, path) {
            Some(item) if item.is_viewable() => AccessDecision::Granted,
            Some(_) => AccessDecision::Denied(DenialReason::MenuPathHidden {
                path: path.to_owned(),
            }),
            None => AccessDecision::Denied(DenialReason::MenuPathUnknown {
                path: path.to_owned(),
            }),
        };
    }

    AccessDecision::Granted
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{AccessDecision, DenialReason, GuardState, RouteGuard, evaluate_access};
    use crate::menu::{MenuItem, MenuItemDto, resolve_menu};
    use crate::security::{PermissionKey, PermissionSet};

    fn key(value: &str) -> PermissionKey {
        PermissionKey::new(value).unwrap_or_else(|_| unreachable!())
    }

    fn menu(can_view: serde_json::Value) -> Vec<MenuItem> {
        let dto: Vec<MenuItemDto> = serde_json::from_value(json!([
            {"id": 1, "title": "Settings", "can_view": false, "items": [
                {"id": 2, "url": "/settings/users", "can_view": can_view}
            ]}
        ]))
        .unwrap_or_else(|_| unreachable!());
        resolve_menu(&dto)
    }

    #[test]
    fn key_check_grants_only_explicit_grants() {
        let rule = RouteGuard::new().with_required(key("settings.metrics.view"));
        let granted: PermissionSet = [(key("settings.metrics.view"), true)].into_iter().collect();
        let revoked: PermissionSet = [(key("settings.metrics.view"), false)].into_iter().collect();

        assert!(evaluate_access(&rule, &granted, None).is_granted());
        assert_eq!(
            evaluate_access(&rule, &revoked, None),
            AccessDecision::Denied(DenialReason::MissingPermission {
                permission: key("settings.metrics.view"),
            })
        );
        assert!(!evaluate_access(&rule, &PermissionSet::new(), None).is_granted());
    }

    #[test]
    fn path_check_uses_can_view_of_matching_entry() {
        let rule = RouteGuard::new().with_menu_path("/settings/users");

        let visible = menu(json!(true));
        assert!(evaluate_access(&rule, &PermissionSet::new(), Some(&visible)).is_granted());

        let hidden = menu(json!(false));
        assert_eq!(
            evaluate_access(&rule, &PermissionSet::new(), Some(&hidden)),
            AccessDecision::Denied(DenialReason::MenuPathHidden {
                path: "/settings/users".to_owned(),
            })
        );
    }

    #[test]
    fn path_check_denies_unknown_paths_and_missing_menu() {
        let rule = RouteGuard::new().with_menu_path("/settings/unknown");
        let tree = menu(json!("1"));

        assert_eq!(
            evaluate_access(&rule, &PermissionSet::new(), Some(&tree)),
            AccessDecision::Denied(DenialReason::MenuPathUnknown {
                path: "/settings/unknown".to_owned(),
            })
        );
        assert_eq!(
            evaluate_access(&rule, &PermissionSet::new(), None),
            AccessDecision::Denied(DenialReason::MenuUnavailable)
        );
    }

    #[test]
    fn combined_rule_requires_both_checks() {
        let rule = RouteGuard::new()
            .with_required(key("settings.users.view"))
            .with_menu_path("/settings/users");
        let permissions: PermissionSet =
            [(key("settings.users.view"), true)].into_iter().collect();

        assert!(evaluate_access(&rule, &permissions, Some(&menu(json!(1)))).is_granted());
        assert!(!evaluate_access(&rule, &permissions, Some(&menu(json!(0)))).is_granted());
        assert!(!evaluate_access(&rule, &PermissionSet::new(), Some(&menu(json!(1)))).is_granted());
    }

    #[test]
    fn rule_without_checks_grants() {
        assert!(evaluate_access(&RouteGuard::new(), &PermissionSet::new(), None).is_granted());
    }

    #[test]
    fn guard_state_serializes_with_reason() {
        let state = GuardState::from(AccessDecision::Denied(DenialReason::MenuPathUnknown {
            path: "/x".to_owned(),
        }));
        assert!(state.is_terminal());
        assert!(!GuardState::Checking.is_terminal());
        assert_eq!(
            serde_json::to_value(&state).unwrap_or_default(),
            json!({"state": "denied", "reason": {"kind": "menu_path_unknown", "path": "/x"}})
        );
    }
}
