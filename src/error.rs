//! Error handling module
//!
//! Centralized error types and their caller-facing classification.

use crate::config::ConfigError;
use crate::domain::{AmountError, DomainError};

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Business outcomes and lookups
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Storage faults
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unit of work '{0}' timed out")]
    Timeout(&'static str),

    // COMMIT was sent but its result never arrived intact
    #[error("Commit of unit of work '{name}' failed, outcome unknown: {source}")]
    CommitOutcomeUnknown {
        name: &'static str,
        source: sqlx::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error classes a caller can branch on without inspecting messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidRequest,
    NotFound,
    Conflict,
    BusinessRule,
    Unavailable,
    Internal,
}

impl ErrorCategory {
    /// HTTP-equivalent status for this category
    pub fn status_code(self) -> u16 {
        match self {
            ErrorCategory::InvalidRequest => 400,
            ErrorCategory::BusinessRule => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Conflict => 409,
            ErrorCategory::Internal => 500,
            ErrorCategory::Unavailable => 503,
        }
    }
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Domain(err) => match err {
                DomainError::AccountNotFound(_) => ErrorCategory::NotFound,
                DomainError::InsufficientBalance { .. } | DomainError::BalanceOverflow(_) => {
                    ErrorCategory::BusinessRule
                }
                DomainError::InvalidAmount(_) | DomainError::SameAccountTransfer => {
                    ErrorCategory::InvalidRequest
                }
                DomainError::DuplicateAccountId(_) | DomainError::DuplicateAccountType { .. } => {
                    ErrorCategory::Conflict
                }
            },
            AppError::Database(_) | AppError::Timeout(_) => ErrorCategory::Unavailable,
            AppError::CommitOutcomeUnknown { .. }
            | AppError::Config(_)
            | AppError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Safe to retry the whole operation from scratch
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Unavailable
    }

    /// Message suitable for an end user. Storage details never leak.
    pub fn public_message(&self) -> String {
        match self.category() {
            ErrorCategory::Unavailable => {
                "We couldn't process your transaction at the moment. Please try again later."
                    .to_string()
            }
            ErrorCategory::Internal => "Something went wrong on our side.".to_string(),
            ErrorCategory::BusinessRule => match self {
                AppError::Domain(DomainError::InsufficientBalance { .. }) => {
                    "You do not have sufficient balance in your account to perform the transfer"
                        .to_string()
                }
                other => other.to_string(),
            },
            _ => self.to_string(),
        }
    }

    /// Shorthand for the domain lookup failure
    pub fn account_not_found(account_id: i64) -> Self {
        AppError::Domain(DomainError::AccountNotFound(account_id))
    }
}

impl From<AmountError> for AppError {
    fn from(err: AmountError) -> Self {
        AppError::Domain(err.into())
    }
}
