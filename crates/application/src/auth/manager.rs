//! Auth state manager.
//!
//! Owns the current token and user, runs the validity/lifetime algorithm,
//! drives refresh scheduling and persistence, and emits lifecycle events.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use credo_domain::{DomainResult, RawCredential, Token, UserId, UserRecord};

use crate::ports::{Clock, TimerHandle, TokenStorage};

use super::config::AuthConfig;
use super::events::{AuthEvent, EventBus, Subscription};
use super::status::TokenStatus;

/// Value of the `Authorization` header for the current token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationHeader {
    /// Header value; empty when no token is held.
    pub value: String,
}

impl AuthorizationHeader {
    /// Canonical header name.
    pub const NAME: &'static str = "Authorization";
}

impl fmt::Display for AuthorizationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Client-side authentication state manager.
///
/// The manager owns its state exclusively and mutates it synchronously on
/// the caller's thread. The only asynchronous element is the deferred
/// refresh timer, whose callback publishes on the event channel without
/// touching the manager; consumers react by calling back in. Do not share
/// a manager across threads without external synchronization.
///
/// Invariant: at most one refresh timer is pending at any time; it is
/// cancelled before being replaced and whenever the token is cleared.
pub struct AuthService<U> {
    config: AuthConfig,
    clock: Arc<dyn Clock>,
    storage: Arc<dyn TokenStorage>,
    events: EventBus,
    token: Option<Token>,
    user: Option<U>,
    refresh_timer: Option<Box<dyn TimerHandle>>,
}

impl<U: UserRecord> AuthService<U> {
    /// Creates a manager with no token or user held.
    #[must_use]
    pub fn new(config: AuthConfig, clock: Arc<dyn Clock>, storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            config,
            clock,
            storage,
            events: EventBus::new(),
            token: None,
            user: None,
            refresh_timer: None,
        }
    }

    /// The manager's configuration.
    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Registers an observer for lifecycle events.
    pub fn listen<F>(&self, handler: F) -> Subscription
    where
        F: Fn(AuthEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(handler)
    }

    /// Returns whether a valid token is held.
    ///
    /// A token without an expiry is always valid. An invalid token has
    /// been cleared, with a `Logout` published, by the time this returns
    /// false.
    pub fn check(&mut self) -> bool {
        if self.token.is_none() {
            return false;
        }

        let lifetime = self.token_lifetime();
        self.is_token_valid(lifetime)
    }

    /// Validates `credential`, adopts it as the current token, persists
    /// it, runs refresh scheduling, and publishes `Login`.
    ///
    /// A token already inside its refresh window emits `RefreshNeeded`
    /// before the `Login`.
    ///
    /// # Errors
    ///
    /// Returns [`credo_domain::DomainError::MissingParameter`] when a
    /// required credential field is absent; prior state is left untouched.
    pub fn set_token(&mut self, credential: RawCredential) -> DomainResult<()> {
        let token = Token::new(self.config.token_kind, credential)?;

        self.cancel_refresh_timer();
        self.persist(&token);
        self.token = Some(token);
        tracing::debug!(token_name = %self.config.token_name, "Adopted new token");
        self.setup_refreshment();
        self.events.publish(AuthEvent::Login);

        Ok(())
    }

    /// Clears token and user, removes the persisted entry, and publishes
    /// `Logout`.
    ///
    /// Idempotent; calling with no token held still clears the user and
    /// still publishes.
    pub fn delete_token(&mut self) {
        self.cancel_refresh_timer();
        self.token = None;
        self.user = None;
        self.storage.remove(&self.config.token_name);
        tracing::debug!(token_name = %self.config.token_name, "Cleared auth state");
        self.events.publish(AuthEvent::Logout);
    }

    /// Adopts the token persisted under the configured storage key.
    ///
    /// Any read or reconstruction failure (missing entry, storage error,
    /// parse error, missing required field) clears state exactly as
    /// [`AuthService::delete_token`] does. Successful adoption re-runs
    /// refresh scheduling without re-persisting.
    pub fn retrieve_token(&mut self) {
        let raw = match self.storage.get(&self.config.token_name) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.delete_token();
                return;
            }
            Err(error) => {
                tracing::warn!(%error, token_name = %self.config.token_name, "Failed to read persisted token");
                self.delete_token();
                return;
            }
        };

        let credential = match serde_json::from_str::<RawCredential>(&raw) {
            Ok(credential) => credential,
            Err(error) => {
                tracing::warn!(%error, token_name = %self.config.token_name, "Persisted token is not a valid credential");
                self.delete_token();
                return;
            }
        };

        match Token::new(self.config.token_kind, credential) {
            Ok(token) => {
                self.cancel_refresh_timer();
                self.token = Some(token);
                tracing::debug!(token_name = %self.config.token_name, "Restored persisted token");
                self.setup_refreshment();
            }
            Err(error) => {
                tracing::warn!(%error, token_name = %self.config.token_name, "Persisted credential is incomplete");
                self.delete_token();
            }
        }
    }

    /// Stores `user` in state.
    pub fn set_user(&mut self, user: U) {
        self.user = Some(user);
    }

    /// The current user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&U> {
        self.user.as_ref()
    }

    /// Identifier of the current user, if the record carries one.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().and_then(UserRecord::id)
    }

    /// The current token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Authorization header for the current token.
    ///
    /// With no token the value is empty. A credential without a token
    /// type yields the bare access key, no scheme prefix.
    #[must_use]
    pub fn authorization_header(&self) -> AuthorizationHeader {
        let value = self.token.as_ref().map_or_else(String::new, |token| {
            match token
                .credential()
                .token_type
                .as_deref()
                .filter(|token_type| !token_type.is_empty())
            {
                Some(token_type) => format!("{token_type} {}", token.access_token()),
                None => token.access_token().to_string(),
            }
        });

        AuthorizationHeader { value }
    }

    /// Remaining lifetime of the held token.
    ///
    /// `None` when no token is held or when the token never expires;
    /// callers composing this with [`AuthService::is_token_valid`] gate on
    /// token presence first, as [`AuthService::check`] does.
    #[must_use]
    pub fn token_lifetime(&self) -> Option<Duration> {
        self.token
            .as_ref()
            .and_then(|token| token.lifetime(self.clock.now()))
    }

    /// Checks `lifetime` against the valid threshold.
    ///
    /// `None` (no expiry) is always valid. A failed check performs the
    /// same clear-and-`Logout` transition as [`AuthService::delete_token`].
    pub fn is_token_valid(&mut self, lifetime: Option<Duration>) -> bool {
        let valid = lifetime.is_none_or(|remaining| remaining > self.config.valid_threshold);

        if !valid {
            tracing::debug!(token_name = %self.config.token_name, "Token no longer valid, logging out");
            self.delete_token();
        }

        valid
    }

    /// Read-only status of the held token against the configured
    /// thresholds.
    ///
    /// Unlike [`AuthService::check`] this never mutates state or publishes
    /// events.
    #[must_use]
    pub fn status(&self) -> TokenStatus {
        let Some(token) = &self.token else {
            return TokenStatus::NotAuthenticated;
        };

        match token.lifetime(self.clock.now()) {
            None => TokenStatus::Valid { remaining: None },
            Some(remaining) if remaining <= self.config.valid_threshold => TokenStatus::Expired {
                can_refresh: token.is_refreshable(),
            },
            Some(remaining) if remaining <= self.config.refresh_threshold => {
                TokenStatus::Expiring {
                    remaining,
                    can_refresh: token.is_refreshable(),
                }
            }
            Some(remaining) => TokenStatus::Valid {
                remaining: Some(remaining),
            },
        }
    }

    /// Schedules (or immediately publishes) the refresh notification for
    /// the current token.
    fn setup_refreshment(&mut self) {
        let Some(token) = &self.token else {
            return;
        };
        if !token.is_refreshable() {
            return;
        }
        let Some(lifetime) = token.lifetime(self.clock.now()) else {
            // Nothing to refresh on a token that never expires.
            return;
        };

        let delay = lifetime - self.config.refresh_threshold;
        if delay <= Duration::zero() {
            tracing::debug!(token_name = %self.config.token_name, "Token already inside its refresh window");
            self.events.publish(AuthEvent::RefreshNeeded);
            return;
        }

        let events = self.events.clone();
        let handle = self.clock.after(
            delay,
            Box::new(move || {
                events.publish(AuthEvent::RefreshNeeded);
            }),
        );
        tracing::debug!(
            token_name = %self.config.token_name,
            delay_ms = delay.num_milliseconds(),
            "Scheduled refresh notification"
        );
        self.refresh_timer = Some(handle);
    }

    /// Cancels and clears any pending refresh timer.
    fn cancel_refresh_timer(&mut self) {
        if let Some(timer) = self.refresh_timer.take() {
            timer.cancel();
        }
    }

    fn persist(&self, token: &Token) {
        match serde_json::to_string(token.credential()) {
            Ok(serialized) => {
                if let Err(error) = self.storage.set(&self.config.token_name, &serialized) {
                    tracing::warn!(%error, token_name = %self.config.token_name, "Failed to persist token");
                }
            }
            Err(error) => {
                tracing::warn!(%error, token_name = %self.config.token_name, "Failed to serialize credential");
            }
        }
    }
}

impl<U> Drop for AuthService<U> {
    fn drop(&mut self) {
        // A timer outliving its manager would notify about a token nobody
        // holds anymore.
        if let Some(timer) = self.refresh_timer.take() {
            timer.cancel();
        }
    }
}

impl<U> fmt::Debug for AuthService<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("token_name", &self.config.token_name)
            .field("has_token", &self.token.is_some())
            .field("has_user", &self.user.is_some())
            .field("refresh_pending", &self.refresh_timer.is_some())
            .finish()
    }
}
