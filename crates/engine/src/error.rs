//! The module contains the error the engine can throw.
//!
//! The variants follow the failure taxonomy of the core:
//!
//! - [`Validation`] malformed input, never retried.
//! - [`Conflict`] a rejected state transition (e.g. settling twice).
//! - [`NotFound`] a referenced record does not exist for the caller.
//! - [`InUse`] deleting an entity still referenced by financial records.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Conflict`]: EngineError::Conflict
//!  [`NotFound`]: EngineError::NotFound
//!  [`InUse`]: EngineError::InUse
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("\"{0}\" is in use!")]
    InUse(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InUse(a), Self::InUse(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
