use bizdesk_core::{AppError, AppResult};
use bizdesk_domain::{CanView, PermissionKey, PermissionSet};
use serde_json::Value;
use tracing::warn;

/// Reads a permission set from `{ key: flag }` or `{ "permissions": { key: flag } }`.
///
/// Flags may be booleans or the `0`/`1` encodings used for `can_view`.
/// Entries with malformed keys are skipped.
pub(super) fn permission_set_from_payload(payload: &Value) -> AppResult<PermissionSet> {
    let entries = payload
        .get("permissions")
        .filter(|value| value.is_object())
        .unwrap_or(payload)
        .as_object()
        .ok_or_else(|| {
            AppError::Unavailable("backend permission payload must be an object".to_owned())
        })?;

    let mut permissions = PermissionSet::new();
    for (raw_key, raw_flag) in entries {
        let key = match PermissionKey::new(raw_key.as_str()) {
            Ok(key) => key,
            Err(error) => {
                warn!(key = %raw_key, error = %error, "skipping malformed permission key");
                continue;
            }
        };

        permissions.insert(key, flag_is_granted(raw_flag));
    }

    Ok(permissions)
}

fn flag_is_granted(flag: &Value) -> bool {
    serde_json::from_value::<CanView>(flag.clone())
        .map(|can_view| can_view.is_truthy())
        .unwrap_or(false)
}
