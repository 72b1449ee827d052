//! Unvalidated credential payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unvalidated field map supplied by a caller or read from persistence.
///
/// Field names follow the wire format of the issuing backend, so a persisted
/// credential round-trips field-for-field. Fields this crate does not
/// interpret are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawCredential {
    /// The access key presented to protected resources.
    #[serde(default)]
    pub access_token: String,

    /// Independent refresh secret, when the backend issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Expiry timestamp; `None` means the credential never expires.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// Scheme prefix for the Authorization header (usually "Bearer").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Caller-defined fields preserved across persistence round trips.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RawCredential {
    /// Creates a credential holding only an access key.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    /// Sets the scheme prefix.
    #[must_use]
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Sets the expiry timestamp.
    #[must_use]
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets the refresh secret.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }
}
