use std::collections::BTreeMap;

use bizdesk_application::GuardOutcome;
use bizdesk_domain::{DenialReason, GuardState, PageAccess, PermissionSet};
use serde::Serialize;
use ts_rs::TS;

/// Permission flags of the acting user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-set-response.ts"
)]
pub struct PermissionSetResponse {
    pub permissions: BTreeMap<String, bool>,
    pub granted: Vec<String>,
}

impl From<&PermissionSet> for PermissionSetResponse {
    fn from(permissions: &PermissionSet) -> Self {
        Self {
            permissions: permissions
                .iter()
                .map(|(key, granted)| (key.as_str().to_owned(), granted))
                .collect(),
            granted: permissions
                .granted_keys()
                .map(|key| key.as_str().to_owned())
                .collect(),
        }
    }
}

/// Body of a 403 answered by a route guard.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/guard-denied-response.ts"
)]
pub struct GuardDeniedResponse {
    pub state: &'static str,
    pub reason: &'static str,
    pub message: String,
}

impl From<&DenialReason> for GuardDeniedResponse {
    fn from(reason: &DenialReason) -> Self {
        Self {
            state: "denied",
            reason: denial_kind(reason),
            message: reason.message(),
        }
    }
}

/// Guard result for one front-end page.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/page-access-response.ts"
)]
pub struct PageAccessResponse {
    pub path: String,
    pub pattern: String,
    pub access: &'static str,
    pub state: &'static str,
    pub reason: Option<&'static str>,
    pub message: Option<String>,
    /// Every state the guard passed through, in order.
    pub states: Vec<&'static str>,
}

impl PageAccessResponse {
    pub fn granted(path: &str, pattern: &str, access: &PageAccess) -> Self {
        Self {
            path: path.to_owned(),
            pattern: pattern.to_owned(),
            access: access_name(access),
            state: "granted",
            reason: None,
            message: None,
            states: vec![state_name(&GuardState::Granted)],
        }
    }

    pub fn from_outcome(
        path: &str,
        pattern: &str,
        access: &PageAccess,
        outcome: &GuardOutcome,
    ) -> Self {
        let reason = outcome.denial_reason();

        Self {
            path: path.to_owned(),
            pattern: pattern.to_owned(),
            access: access_name(access),
            state: state_name(outcome.final_state()),
            reason: reason.map(denial_kind),
            message: reason.map(DenialReason::message),
            states: outcome.states().iter().map(state_name).collect(),
        }
    }
}

fn access_name(access: &PageAccess) -> &'static str {
    match access {
        PageAccess::Public => "public",
        PageAccess::Authenticated => "authenticated",
        PageAccess::Guarded(_) => "guarded",
    }
}

fn state_name(state: &GuardState) -> &'static str {
    match state {
        GuardState::LoadingPermissions => "loading_permissions",
        GuardState::Checking => "checking",
        GuardState::Granted => "granted",
        GuardState::Denied { .. } => "denied",
    }
}

fn denial_kind(reason: &DenialReason) -> &'static str {
    match reason {
        DenialReason::Unauthenticated => "unauthenticated",
        DenialReason::PermissionsUnavailable => "permissions_unavailable",
        DenialReason::MenuUnavailable => "menu_unavailable",
        DenialReason::MissingPermission { .. } => "missing_permission",
        DenialReason::MenuPathHidden { .. } => "menu_path_hidden",
        DenialReason::MenuPathUnknown { .. } => "menu_path_unknown",
    }
}

#[cfg(test)]
mod tests {
    use bizdesk_domain::{DenialReason, PermissionKey};
    use serde_json::json;

    use super::GuardDeniedResponse;

    #[test]
    fn denial_body_names_reason_and_message() {
        let permission =
            PermissionKey::new("settings.metrics.view").unwrap_or_else(|_| unreachable!());
        let body = GuardDeniedResponse::from(&DenialReason::MissingPermission { permission });

        assert_eq!(
            serde_json::to_value(&body).unwrap_or_else(|_| unreachable!()),
            json!({
                "state": "denied",
                "reason": "missing_permission",
                "message": "missing permission 'settings.metrics.view'"
            })
        );
    }
}
