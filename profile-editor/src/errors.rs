//! Collaborator error types
//!
//! Each external collaborator reports failures through its own enum. The
//! payloads are plain strings so the errors can travel inside messages and
//! be compared in tests.

use std::time::Duration;

use thiserror::Error;

/// Sign-out / session failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Network request failed
    #[error("Network error: {0}")]
    Network(String),

    /// There was no session to end
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Profile persistence failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Profile not found: {username}")]
    NotFound { username: String },

    /// The backend answered but refused the request
    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Avatar compression failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// The cancellation token fired before the transform finished
    #[error("Compression cancelled")]
    Cancelled,

    #[error("Compression timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AuthResult<T> = Result<T, AuthError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type TransformResult<T> = Result<T, TransformError>;
