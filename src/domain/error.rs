//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;
use uuid::Uuid;

use super::AmountError;

/// Domain-specific errors
///
/// These errors represent business rule violations and lookups that
/// matched nothing. They are independent of the storage layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Insufficient balance for debit operation
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: i64, available: i64 },

    /// Invalid amount (zero or negative)
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Account not found
    #[error("Account with ID {0} not found")]
    AccountNotFound(i64),

    /// Transfer to same account
    #[error("Sender and recipient account ids must be different")]
    SameAccountTransfer,

    /// Credit would push the balance past the representable maximum
    #[error("Balance overflow on account {0}")]
    BalanceOverflow(i64),

    /// Generated account number already taken
    #[error("Account ID {0} already exists")]
    DuplicateAccountId(i64),

    /// A user holds at most one account of each type
    #[error("User {user_id} already has a {account_type} account")]
    DuplicateAccountType { user_id: Uuid, account_type: String },
}

impl DomainError {
    /// Create an insufficient balance error
    pub fn insufficient_balance(required: i64, available: i64) -> Self {
        Self::InsufficientBalance {
            required,
            available,
        }
    }
}

impl From<AmountError> for DomainError {
    fn from(err: AmountError) -> Self {
        DomainError::InvalidAmount(err.to_string())
    }
}
