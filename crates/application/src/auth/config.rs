//! Manager configuration.

use chrono::Duration;
use credo_domain::TokenKind;

/// Configuration for an auth state manager.
///
/// Supplied once at construction and immutable for the manager's lifetime.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Which token variant `set_token` constructs.
    pub token_kind: TokenKind,
    /// Storage key the serialized credential is persisted under.
    pub token_name: String,
    /// Lead time before expiry at which a refresh notification is due.
    pub refresh_threshold: Duration,
    /// Minimum remaining lifetime below which a token counts as expired.
    pub valid_threshold: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_kind: TokenKind::Single,
            token_name: "auth-token".to_string(),
            refresh_threshold: Duration::seconds(5),
            valid_threshold: Duration::seconds(1),
        }
    }
}

impl AuthConfig {
    /// Creates a config persisting under `token_name`, defaults otherwise.
    #[must_use]
    pub fn new(token_name: impl Into<String>) -> Self {
        Self {
            token_name: token_name.into(),
            ..Self::default()
        }
    }

    /// Selects the token variant.
    #[must_use]
    pub const fn with_token_kind(mut self, kind: TokenKind) -> Self {
        self.token_kind = kind;
        self
    }

    /// Sets the refresh lead time.
    #[must_use]
    pub const fn with_refresh_threshold(mut self, threshold: Duration) -> Self {
        self.refresh_threshold = threshold;
        self
    }

    /// Sets the minimum remaining lifetime.
    #[must_use]
    pub const fn with_valid_threshold(mut self, threshold: Duration) -> Self {
        self.valid_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();

        assert_eq!(config.token_kind, TokenKind::Single);
        assert_eq!(config.token_name, "auth-token");
        assert_eq!(config.refresh_threshold, Duration::seconds(5));
        assert_eq!(config.valid_threshold, Duration::seconds(1));
    }

    #[test]
    fn test_builder_setters() {
        let config = AuthConfig::new("session")
            .with_token_kind(TokenKind::Solid)
            .with_refresh_threshold(Duration::minutes(1))
            .with_valid_threshold(Duration::seconds(10));

        assert_eq!(config.token_name, "session");
        assert_eq!(config.token_kind, TokenKind::Solid);
        assert_eq!(config.refresh_threshold, Duration::minutes(1));
        assert_eq!(config.valid_threshold, Duration::seconds(10));
    }
}
