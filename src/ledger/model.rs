//! Ledger records
//!
//! Row types for `accounts` and the append-only `transactions` ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Amount, AmountError, Balance};

/// Kind of account a user may hold (at most one of each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Savings,
    Current,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "SAVINGS",
            AccountType::Current => "CURRENT",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Debit,
    Credit,
}

/// Account row
///
/// `id` is the customer-facing account number (10-15 digits) and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub user_id: Uuid,
    /// Smallest currency unit
    pub balance: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Balance as a validated domain value
    pub fn current_balance(&self) -> Result<Balance, AmountError> {
        Balance::new(self.balance)
    }
}

/// Ledger entry. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    /// Shared by the DEBIT and CREDIT legs of one transfer
    pub transfer_id: Uuid,
    pub account_id: i64,
    pub amount: i64,
    /// Account balance right after this entry was applied
    pub balance_after: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub created_at: DateTime<Utc>,
}

/// Ledger entry to be inserted; id and timestamp are assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub transfer_id: Uuid,
    pub account_id: i64,
    pub amount: Amount,
    pub balance_after: Balance,
    pub transaction_type: TransactionType,
}

impl NewTransaction {
    /// Debit leg, snapshotting the already-debited account balance
    pub fn debit(transfer_id: Uuid, account: &Account, amount: Amount) -> Result<Self, AmountError> {
        Ok(Self {
            transfer_id,
            account_id: account.id,
            amount,
            balance_after: account.current_balance()?,
            transaction_type: TransactionType::Debit,
        })
    }

    /// Credit leg, snapshotting the already-credited account balance
    pub fn credit(transfer_id: Uuid, account: &Account, amount: Amount) -> Result<Self, AmountError> {
        Ok(Self {
            transfer_id,
            account_id: account.id,
            amount,
            balance_after: account.current_balance()?,
            transaction_type: TransactionType::Credit,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn account(id: i64, balance: i64) -> Account {
        let now = Utc::now();
        Account {
            id,
            user_id: Uuid::nil(),
            balance,
            account_type: AccountType::Savings,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transaction_snapshots_balance() {
        let transfer_id = Uuid::new_v4();
        let account = fixtures::account(11111111111111, 4_000);
        let amount = Amount::new(1_000).unwrap();

        let debit = NewTransaction::debit(transfer_id, &account, amount).unwrap();
        assert_eq!(debit.account_id, 11111111111111);
        assert_eq!(debit.balance_after.value(), 4_000);
        assert_eq!(debit.transaction_type, TransactionType::Debit);

        let credit = NewTransaction::credit(transfer_id, &account, amount).unwrap();
        assert_eq!(credit.transfer_id, debit.transfer_id);
        assert_eq!(credit.transaction_type, TransactionType::Credit);
    }

    #[test]
    fn test_negative_row_balance_rejected() {
        let account = fixtures::account(11111111111111, -1);
        let result = NewTransaction::debit(Uuid::new_v4(), &account, Amount::new(1).unwrap());
        assert!(matches!(result, Err(AmountError::Negative(-1))));
    }

    #[test]
    fn test_serialized_names() {
        let account = fixtures::account(22222222222222, 10);
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["type"], "SAVINGS");
        assert_eq!(json["balance"], 10);

        let json = serde_json::to_value(TransactionType::Credit).unwrap();
        assert_eq!(json, "CREDIT");
        assert_eq!(AccountType::Current.to_string(), "CURRENT");
    }
}
