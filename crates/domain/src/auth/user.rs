//! Caller-defined user records.

use std::fmt;

/// Identifier carried by a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserId {
    /// Textual identifier.
    Text(String),
    /// Numeric identifier.
    Number(i64),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(id) => write!(f, "{id}"),
            Self::Number(id) => write!(f, "{id}"),
        }
    }
}

/// Caller-defined user record.
///
/// The manager treats the record as opaque apart from its identifier.
pub trait UserRecord {
    /// The record's identifier, if it carries one.
    fn id(&self) -> Option<UserId>;
}

/// JSON objects are accepted as user records; the `id` field may be a
/// string or a number.
impl UserRecord for serde_json::Value {
    fn id(&self) -> Option<UserId> {
        match self.get("id")? {
            serde_json::Value::String(id) => Some(UserId::Text(id.clone())),
            serde_json::Value::Number(id) => id.as_i64().map(UserId::Number),
            _ => None,
        }
    }
}
