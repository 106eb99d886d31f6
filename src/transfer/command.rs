//! Command definitions
//!
//! Commands represent intentions to change the system state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Amount, DomainError};

/// Command to move money between two accounts of this bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalTransferCommand {
    /// Authenticated user; ownership of the sender account is checked upstream
    pub sender_user_id: Uuid,
    pub from_account_id: i64,
    pub to_account_id: i64,
    /// Minor currency units
    pub amount: i64,
}

impl InternalTransferCommand {
    pub fn new(sender_user_id: Uuid, from_account_id: i64, to_account_id: i64, amount: i64) -> Self {
        Self {
            sender_user_id,
            from_account_id,
            to_account_id,
            amount,
        }
    }

    /// Re-check the caller's preconditions; returns the validated amount
    pub fn validate(&self) -> Result<Amount, DomainError> {
        if self.from_account_id == self.to_account_id {
            return Err(DomainError::SameAccountTransfer);
        }
        Ok(Amount::new(self.amount)?)
    }
}
