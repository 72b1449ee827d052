//! Validated token value objects.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

use super::credential::RawCredential;

/// Token variant selected by configuration.
///
/// The variant decides how the refresh secret is derived and whether the
/// token can be exchanged before expiry; everything else is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// One secret doubles as both access and refresh key.
    #[default]
    Single,
    /// Fixed credential without a refresh exchange.
    Solid,
}

/// Validated, immutable wrapper around a raw credential.
///
/// Construction checks the required fields, so a `Token` in hand always
/// carries a non-empty access key. Tokens are never mutated, only replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    credential: RawCredential,
}

impl Token {
    /// Validates `credential` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingParameter`] if `accessToken` is absent
    /// or empty.
    pub fn new(kind: TokenKind, credential: RawCredential) -> DomainResult<Self> {
        if credential.access_token.is_empty() {
            return Err(DomainError::MissingParameter("accessToken".to_string()));
        }

        Ok(Self { kind, credential })
    }

    /// The variant this token was constructed as.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The access key presented to protected resources.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.credential.access_token
    }

    /// The key used to refresh this token.
    ///
    /// Single tokens carry no independent refresh secret and reuse the
    /// access key; Solid tokens cannot be refreshed and yield an empty
    /// string.
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        match self.kind {
            TokenKind::Single => &self.credential.access_token,
            TokenKind::Solid => "",
        }
    }

    /// Whether this token supports being exchanged before expiry.
    #[must_use]
    pub const fn is_refreshable(&self) -> bool {
        match self.kind {
            TokenKind::Single => true,
            TokenKind::Solid => false,
        }
    }

    /// Remaining lifetime relative to `now`.
    ///
    /// `None` means the credential never expires. A zero or negative
    /// duration means the token is already at or past its expiry.
    #[must_use]
    pub fn lifetime(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.credential
            .expires_at
            .map(|expires_at| expires_at - now)
    }

    /// The wrapped raw credential, exactly as supplied at construction.
    #[must_use]
    pub const fn credential(&self) -> &RawCredential {
        &self.credential
    }
}
