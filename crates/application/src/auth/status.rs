//! Token status summaries for display.

use chrono::Duration;

/// Status of the held token, measured against the configured thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// No token is held.
    NotAuthenticated,
    /// Token is valid and outside the refresh window.
    Valid {
        /// Remaining lifetime, or `None` if the token never expires.
        remaining: Option<Duration>,
    },
    /// Token is valid but inside the refresh window.
    Expiring {
        /// Remaining lifetime.
        remaining: Duration,
        /// Whether the token variant supports refresh.
        can_refresh: bool,
    },
    /// Remaining lifetime fell to or below the valid threshold.
    Expired {
        /// Whether the token variant supports refresh.
        can_refresh: bool,
    },
}

impl TokenStatus {
    /// Returns true if the token is valid (not expired).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. } | Self::Expiring { .. })
    }

    /// Returns true if the token needs attention (expiring or expired).
    #[must_use]
    pub const fn needs_attention(&self) -> bool {
        matches!(self, Self::Expiring { .. } | Self::Expired { .. })
    }

    /// Get a user-friendly display message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not authenticated".to_string(),
            Self::Valid {
                remaining: Some(remaining),
            } => {
                let secs = remaining.num_seconds();
                if secs > 3600 {
                    format!("Valid for {} hours", secs / 3600)
                } else if secs > 60 {
                    format!("Valid for {} minutes", secs / 60)
                } else {
                    format!("Valid for {secs} seconds")
                }
            }
            Self::Valid { remaining: None } => "Valid (no expiry)".to_string(),
            Self::Expiring {
                remaining,
                can_refresh,
            } => {
                let refresh_hint = if *can_refresh {
                    " (refresh due)"
                } else {
                    ""
                };
                format!("Expiring in {} seconds{refresh_hint}", remaining.num_seconds())
            }
            Self::Expired { can_refresh } => {
                if *can_refresh {
                    "Expired (can refresh)".to_string()
                } else {
                    "Expired".to_string()
                }
            }
        }
    }
}
