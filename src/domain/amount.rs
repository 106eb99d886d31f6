//! Amount type
//!
//! Domain primitives for monetary values held in the smallest currency unit.
//! All amounts are validated at construction time, ensuring invalid values
//! cannot exist in the system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount represents a validated transfer magnitude in minor units.
///
/// # Invariants
/// - Value is always positive (> 0)
///
/// # Example
/// ```
/// use bank_ledger::domain::Amount;
///
/// let amount = Amount::new(10_000).unwrap();
/// assert_eq!(amount.value(), 10_000);
/// assert!(Amount::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Amount(i64);

/// Errors that can occur when creating or applying an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("Amount must be positive (got {0})")]
    NotPositive(i64),

    #[error("Balance cannot be negative (got {0})")]
    Negative(i64),

    #[error("Balance exceeds the maximum representable value")]
    Overflow,
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `AmountError::NotPositive` if value <= 0
    pub fn new(value: i64) -> Result<Self, AmountError> {
        if value <= 0 {
            return Err(AmountError::NotPositive(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Amount {
    type Error = AmountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for i64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Balance represents an account balance (can be zero or positive).
/// Unlike Amount, Balance can be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Balance(i64);

impl Balance {
    /// Create a new balance (zero or positive)
    pub fn new(value: i64) -> Result<Self, AmountError> {
        if value < 0 {
            return Err(AmountError::Negative(value));
        }
        Ok(Self(value))
    }

    /// Create a zero balance
    pub fn zero() -> Self {
        Self(0)
    }

    /// Get the underlying value
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Check if balance is sufficient for withdrawal
    pub fn is_sufficient_for(&self, amount: &Amount) -> bool {
        self.0 >= amount.value()
    }

    /// Add amount to balance
    pub fn credit(&self, amount: &Amount) -> Result<Balance, AmountError> {
        self.0
            .checked_add(amount.value())
            .ok_or(AmountError::Overflow)
            .and_then(Balance::new)
    }

    /// Subtract amount from balance
    pub fn debit(&self, amount: &Amount) -> Result<Balance, AmountError> {
        Balance::new(self.0 - amount.value())
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Balance {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_positive() {
        let amount = Amount::new(100);
        assert_eq!(amount.unwrap().value(), 100);
    }

    #[test]
    fn test_amount_zero_rejected() {
        assert!(matches!(Amount::new(0), Err(AmountError::NotPositive(0))));
    }

    #[test]
    fn test_amount_negative_rejected() {
        assert!(matches!(Amount::new(-5), Err(AmountError::NotPositive(-5))));
    }

    #[test]
    fn test_amount_serde_rejects_non_positive() {
        let amount: Amount = serde_json::from_str("2500").unwrap();
        assert_eq!(amount.value(), 2500);
        assert!(serde_json::from_str::<Amount>("0").is_err());
    }

    #[test]
    fn test_balance_credit_debit() {
        let balance = Balance::zero();
        let balance = balance.credit(&Amount::new(100).unwrap()).unwrap();
        assert_eq!(balance.value(), 100);

        let balance = balance.debit(&Amount::new(30).unwrap()).unwrap();
        assert_eq!(balance.value(), 70);
    }

    #[test]
    fn test_balance_debit_to_exactly_zero() {
        let balance = Balance::new(500).unwrap();
        let amount = Amount::new(500).unwrap();

        assert!(balance.is_sufficient_for(&amount));
        assert_eq!(balance.debit(&amount).unwrap(), Balance::zero());
    }

    #[test]
    fn test_balance_insufficient() {
        let balance = Balance::new(50).unwrap();
        let amount = Amount::new(100).unwrap();

        assert!(!balance.is_sufficient_for(&amount));
        assert!(matches!(balance.debit(&amount), Err(AmountError::Negative(-50))));
    }

    #[test]
    fn test_balance_credit_overflow() {
        let balance = Balance::new(i64::MAX - 1).unwrap();
        let result = balance.credit(&Amount::new(2).unwrap());
        assert!(matches!(result, Err(AmountError::Overflow)));
    }
}
