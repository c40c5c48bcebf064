use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Tri-state view flag as delivered by the backend.
///
/// The backend encodes the same flag as a boolean, a number or a string
/// depending on the endpoint. The original encoding is preserved so that a
/// descriptor serializes back exactly as it was received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CanView {
    /// Boolean encoding.
    Bool(bool),
    /// Numeric encoding, `1` grants.
    Number(Number),
    /// String encoding, `"1"` grants.
    Text(String),
    /// Any other JSON shape. Never grants.
    Other(Value),
}

impl CanView {
    /// Returns whether this flag grants visibility.
    ///
    /// Booleans are taken as-is, numbers grant only when equal to one and
    /// strings grant only when exactly `"1"`.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Number(value) => value.as_f64() == Some(1.0),
            Self::Text(value) => value == "1",
            Self::Other(_) => false,
        }
    }
}

impl From<bool> for CanView {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for CanView {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<&str> for CanView {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Evaluates an optional view flag; an absent flag never grants.
#[must_use]
pub fn is_can_view_truthy(can_view: Option<&CanView>) -> bool {
    can_view.is_some_and(CanView::is_truthy)
}
