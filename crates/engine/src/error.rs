//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`NotInitialized`] thrown when the database pool has no live handle yet.
//! - [`InvalidField`] thrown when a lookup names a column outside the
//!   allow-list.
//! - [`InvalidValue`] thrown when a lookup value does not fit its column.
//! - [`Database`] wraps any connection or query failure.
//!
//!  [`NotInitialized`]: EngineError::NotInitialized
//!  [`InvalidField`]: EngineError::InvalidField
//!  [`InvalidValue`]: EngineError::InvalidValue
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Database pool not initialized")]
    NotInitialized,
    #[error("Invalid field: {0}")]
    InvalidField(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotInitialized, Self::NotInitialized) => true,
            (Self::InvalidField(a), Self::InvalidField(b)) => a == b,
            (Self::InvalidValue(a), Self::InvalidValue(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
