//! Core error types

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the service layer
#[derive(Error, Debug)]
pub enum CoreError {
    /// Row does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// Caller's role does not permit the operation, or the row exists but
    /// is outside the caller's scope
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Status workflow violation
    #[error("invalid transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// Input failed validation before reaching the database
    #[error("validation failed: {0}")]
    Validation(String),

    /// An account with this email already exists
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// Password hashing or verification failure
    #[error("password hashing error: {0}")]
    PasswordHash(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }
}
