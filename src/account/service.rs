//! Account Service
//!
//! Domain-facing wrapper over the ledger store. Every call forwards the
//! caller's execution context unchanged so it joins the caller's unit of work.

use async_trait::async_trait;
use rand::Rng;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::AppResult;
use crate::ledger::{
    Account, AccountQuery, AccountType, AccountUpdate, LedgerStore, NewTransaction, Transaction,
};

/// Smallest 10-digit account number
pub const MIN_ACCOUNT_ID: i64 = 1_000_000_000;
/// Largest 15-digit account number
pub const MAX_ACCOUNT_ID: i64 = 999_999_999_999_999;

/// Account operations consumed by the transfer engine and outer layers.
///
/// `conn` is the ambient execution context; `None` runs the call on its
/// own pooled connection.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn get_account(
        &self,
        conn: Option<&mut PgConnection>,
        query: AccountQuery,
    ) -> AppResult<Account>;

    async fn update_account(
        &self,
        conn: Option<&mut PgConnection>,
        account_id: i64,
        update: AccountUpdate,
    ) -> AppResult<Account>;

    async fn create_transaction_record(
        &self,
        conn: Option<&mut PgConnection>,
        record: NewTransaction,
    ) -> AppResult<Transaction>;

    async fn create_account(
        &self,
        conn: Option<&mut PgConnection>,
        user_id: Uuid,
        account_type: AccountType,
    ) -> AppResult<Account>;

    async fn get_accounts_by_user_id(
        &self,
        conn: Option<&mut PgConnection>,
        user_id: Uuid,
    ) -> AppResult<Vec<Account>>;

    async fn get_transactions_by_account_id(
        &self,
        conn: Option<&mut PgConnection>,
        account_id: i64,
    ) -> AppResult<Vec<Transaction>>;
}

/// PostgreSQL-backed account service
#[derive(Debug, Clone)]
pub struct PgAccountService {
    store: LedgerStore,
}

impl PgAccountService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountService for PgAccountService {
    async fn get_account(
        &self,
        conn: Option<&mut PgConnection>,
        query: AccountQuery,
    ) -> AppResult<Account> {
        self.store.get_account(conn, &query).await
    }

    async fn update_account(
        &self,
        conn: Option<&mut PgConnection>,
        account_id: i64,
        update: AccountUpdate,
    ) -> AppResult<Account> {
        self.store
            .update_account_balance(conn, account_id, &update)
            .await
    }

    async fn create_transaction_record(
        &self,
        conn: Option<&mut PgConnection>,
        record: NewTransaction,
    ) -> AppResult<Transaction> {
        self.store.insert_transaction(conn, &record).await
    }

    async fn create_account(
        &self,
        conn: Option<&mut PgConnection>,
        user_id: Uuid,
        account_type: AccountType,
    ) -> AppResult<Account> {
        // A collision surfaces as DuplicateAccountId from the primary key
        let account_id = generate_account_id();
        let account = self
            .store
            .create_account(conn, account_id, user_id, account_type)
            .await?;

        tracing::info!(
            account_id = account.id,
            user_id = %user_id,
            account_type = %account_type,
            "Account created"
        );
        Ok(account)
    }

    async fn get_accounts_by_user_id(
        &self,
        conn: Option<&mut PgConnection>,
        user_id: Uuid,
    ) -> AppResult<Vec<Account>> {
        self.store.get_accounts_by_user_id(conn, user_id).await
    }

    async fn get_transactions_by_account_id(
        &self,
        conn: Option<&mut PgConnection>,
        account_id: i64,
    ) -> AppResult<Vec<Transaction>> {
        self.store
            .get_transactions_by_account_id(conn, account_id)
            .await
    }
}

/// Random account number of 10 to 15 digits
pub fn generate_account_id() -> i64 {
    rand::thread_rng().gen_range(MIN_ACCOUNT_ID..=MAX_ACCOUNT_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_stay_in_range() {
        for _ in 0..10_000 {
            let id = generate_account_id();
            assert!((MIN_ACCOUNT_ID..=MAX_ACCOUNT_ID).contains(&id));

            let digits = id.to_string().len();
            assert!((10..=15).contains(&digits), "{} has {} digits", id, digits);
        }
    }
}
