use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use bizdesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Dot-separated capability string such as `settings.permissions.view`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionKey(String);

impl PermissionKey {
    /// Creates a validated permission key.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(AppError::Validation(
                "permission key must not be empty".to_owned(),
            ));
        }

        let valid_segments = value.split('.').all(|segment| {
            !segment.is_empty()
                && segment.chars().all(|character| {
                    character.is_ascii_lowercase()
                        || character.is_ascii_digit()
                        || character == '_'
                        || character == '-'
                })
        });
        if !valid_segments {
            return Err(AppError::Validation(format!(
                "invalid permission key '{value}'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for PermissionKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PermissionKey {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for PermissionKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionKey> for String {
    fn from(value: PermissionKey) -> Self {
        value.0
    }
}

/// Permissions held by the acting user, keyed by capability.
///
/// A key missing from the set is not granted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<PermissionKey, bool>);

impl PermissionSet {
    /// Creates an empty permission set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the grant state of one key, replacing any previous value.
    pub fn insert(&mut self, key: PermissionKey, granted: bool) {
        self.0.insert(key, granted);
    }

    /// Returns whether the key is explicitly granted.
    #[must_use]
    pub fn allows(&self, key: &PermissionKey) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    /// Returns granted keys in lexical order.
    pub fn granted_keys(&self) -> impl Iterator<Item = &PermissionKey> {
        self.0
            .iter()
            .filter_map(|(key, granted)| granted.then_some(key))
    }

    /// Returns every recorded key with its grant state.
    pub fn iter(&self) -> impl Iterator<Item = (&PermissionKey, bool)> {
        self.0.iter().map(|(key, granted)| (key, *granted))
    }

    /// Returns the number of recorded keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether no key is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PermissionKey, bool)> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = (PermissionKey, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{PermissionKey, PermissionSet};

    fn key(value: &str) -> PermissionKey {
        PermissionKey::new(value).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn permission_key_accepts_dot_separated_segments() {
        for value in ["settings.permissions.view", "clients", "service-objects.edit_all"] {
            assert!(PermissionKey::from_str(value).is_ok(), "{value} should parse");
        }
    }

    #[test]
    fn permission_key_rejects_malformed_values() {
        for value in ["", ".", "settings..view", "settings.view.", "Settings.View", "a b"] {
            assert!(PermissionKey::new(value).is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn permission_set_denies_missing_and_false_keys() {
        let set: PermissionSet = [
            (key("settings.metrics.view"), true),
            (key("settings.users.view"), false),
        ]
        .into_iter()
        .collect();

        assert!(set.allows(&key("settings.metrics.view")));
        assert!(!set.allows(&key("settings.users.view")));
        assert!(!set.allows(&key("settings.permissions.view")));
        assert_eq!(set.granted_keys().count(), 1);
    }

    #[test]
    fn permission_set_deserialization_validates_keys() {
        let parsed = serde_json::from_str::<PermissionSet>(r#"{"Bad Key": true}"#);
        assert!(parsed.is_err());

        let parsed = serde_json::from_str::<PermissionSet>(r#"{"clients.view": true}"#)
            .unwrap_or_default();
        assert!(parsed.allows(&key("clients.view")));
    }
}
