//! The module contains the errors the engine can throw.
//!
//! Validation errors ([`UnknownCategory`], [`InvalidDate`], [`InvalidMonth`],
//! [`InvalidAmount`]) are always raised before anything is written.
//! [`Storage`] wraps failures of the storage collaborator.
//!
//!  [`UnknownCategory`]: EngineError::UnknownCategory
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`InvalidMonth`]: EngineError::InvalidMonth
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`Storage`]: EngineError::Storage
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("\"{0}\" is not a known category")]
    UnknownCategory(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid month: {0}")]
    InvalidMonth(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Cannot resolve local date: {0}")]
    ClockResolution(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EngineError {
    /// Returns `true` for errors caused by caller input rather than by the
    /// process or its collaborators.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownCategory(_)
                | Self::InvalidDate(_)
                | Self::InvalidMonth(_)
                | Self::InvalidAmount(_)
        )
    }
}

impl From<DbErr> for EngineError {
    fn from(value: DbErr) -> Self {
        Self::Storage(value.to_string())
    }
}
