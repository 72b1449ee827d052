//! Credo Domain - Core business types
//!
//! This crate defines the domain model for the credo token lifecycle
//! manager. All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;

pub use auth::{RawCredential, Token, TokenKind, UserId, UserRecord};
pub use error::{DomainError, DomainResult};
