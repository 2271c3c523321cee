//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during account operations.
///
/// The public [`AuthStore`](super::AuthStore) login and register calls
/// collapse these into a boolean; they are kept for logging and for
/// profile updates.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] aurora_core::EmailError),

    /// A required field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Wrong password or unknown email.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Another account already uses this email.
    #[error("user already exists")]
    UserAlreadyExists,

    /// No one is signed in.
    #[error("not signed in")]
    NotAuthenticated,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
