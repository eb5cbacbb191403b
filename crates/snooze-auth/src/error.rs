//! Authentication error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token does not match username")]
    HashMismatch,

    #[error("No user matches token")]
    UnknownPrincipal,

    #[error("Insufficient permissions")]
    AuthorizationDenied,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] snooze_db::DbError),
}

impl AuthError {
    /// True for outcomes a client caused by presenting bad or insufficient credentials
    pub fn is_unauthorized(&self) -> bool {
        !matches!(self, AuthError::PasswordHash(_) | AuthError::Database(_))
    }

    /// Short label used for logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing",
            AuthError::MalformedToken => "malformed",
            AuthError::HashMismatch => "hash_mismatch",
            AuthError::UnknownPrincipal => "unknown_principal",
            AuthError::AuthorizationDenied => "denied",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::PasswordHash(_) => "password_hash",
            AuthError::Database(_) => "database",
        }
    }
}
