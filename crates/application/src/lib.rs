//! Credo Application - The token lifecycle manager and its ports
//!
//! This crate provides:
//! - The auth state manager driving the token lifecycle
//! - A synchronous event channel for lifecycle notifications
//! - Ports for the clock and storage collaborators, implemented by
//!   adapters in the infrastructure layer

pub mod auth;
pub mod ports;
#[cfg(test)]
pub mod testutil;

pub use auth::{
    AuthConfig, AuthEvent, AuthService, AuthorizationHeader, EventBus, Subscription, TokenStatus,
};
pub use ports::{Clock, StorageError, TimerHandle, TokenStorage};
