//! Ledger Store
//!
//! PostgreSQL persistence for accounts and ledger entries.
//! Every operation runs on the caller's execution context when one is
//! supplied, so several calls compose into one atomic unit of work.
//! Without one, a connection is taken from the pool for that call alone.

use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::error::{AppError, AppResult};

use super::model::{Account, AccountType, NewTransaction, Transaction};
use super::query::{AccountQuery, AccountUpdate};

const SELECT_ACCOUNT: &str = r#"
    SELECT id, user_id, balance, type, created_at, updated_at
    FROM accounts
    WHERE id = $1
"#;

const SELECT_ACCOUNT_FOR_UPDATE: &str = r#"
    SELECT id, user_id, balance, type, created_at, updated_at
    FROM accounts
    WHERE id = $1
    FOR UPDATE
"#;

const UNIQUE_USER_ACCOUNT_TYPE: &str = "accounts_user_id_type_unique";
const ACCOUNTS_PKEY: &str = "accounts_pkey";

/// Store for account rows and the transaction ledger
#[derive(Debug, Clone)]
pub struct LedgerStore {
    pool: PgPool,
}

impl LedgerStore {
    /// Create a new LedgerStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the execution context, falling back to a pooled connection
    async fn connection<'a>(
        &self,
        conn: Option<&'a mut PgConnection>,
        pooled: &'a mut Option<PoolConnection<Postgres>>,
    ) -> AppResult<&'a mut PgConnection> {
        match conn {
            Some(conn) => Ok(conn),
            None => {
                let acquired = self
                    .pool
                    .acquire()
                    .await
                    .map_err(|e| store_error("acquire_connection", e))?;
                Ok(&mut **pooled.insert(acquired))
            }
        }
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Fetch one account, optionally taking its row lock
    pub async fn get_account(
        &self,
        conn: Option<&mut PgConnection>,
        query: &AccountQuery,
    ) -> AppResult<Account> {
        let mut pooled = None;
        let conn = self.connection(conn, &mut pooled).await?;

        let sql = if query.for_update {
            SELECT_ACCOUNT_FOR_UPDATE
        } else {
            SELECT_ACCOUNT
        };

        sqlx::query_as::<_, Account>(sql)
            .bind(query.account_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| store_error("get_account", e))?
            .ok_or_else(|| AppError::account_not_found(query.account_id))
    }

    /// Set the balance and refresh `updated_at`.
    ///
    /// Callers must hold the row lock from a `for_update` read in the same
    /// unit of work, otherwise concurrent writers race.
    pub async fn update_account_balance(
        &self,
        conn: Option<&mut PgConnection>,
        account_id: i64,
        update: &AccountUpdate,
    ) -> AppResult<Account> {
        let mut pooled = None;
        let conn = self.connection(conn, &mut pooled).await?;

        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET balance = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, balance, type, created_at, updated_at
            "#,
        )
        .bind(account_id)
        .bind(update.new_balance.value())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| store_error("update_account_balance", e))?
        .ok_or_else(|| AppError::account_not_found(account_id))
    }

    /// Insert a new account row
    pub async fn create_account(
        &self,
        conn: Option<&mut PgConnection>,
        account_id: i64,
        user_id: Uuid,
        account_type: AccountType,
    ) -> AppResult<Account> {
        let mut pooled = None;
        let conn = self.connection(conn, &mut pooled).await?;

        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, user_id, type)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, balance, type, created_at, updated_at
            "#,
        )
        .bind(account_id)
        .bind(user_id)
        .bind(account_type)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            let violated = match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    db_err.constraint().map(str::to_owned)
                }
                _ => None,
            };

            match violated.as_deref() {
                Some(UNIQUE_USER_ACCOUNT_TYPE) => DomainError::DuplicateAccountType {
                    user_id,
                    account_type: account_type.to_string(),
                }
                .into(),
                Some(ACCOUNTS_PKEY) => DomainError::DuplicateAccountId(account_id).into(),
                _ => store_error("create_account", e),
            }
        })
    }

    /// All accounts of one user, oldest first
    pub async fn get_accounts_by_user_id(
        &self,
        conn: Option<&mut PgConnection>,
        user_id: Uuid,
    ) -> AppResult<Vec<Account>> {
        let mut pooled = None;
        let conn = self.connection(conn, &mut pooled).await?;

        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, user_id, balance, type, created_at, updated_at
            FROM accounts
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| store_error("get_accounts_by_user_id", e))
    }

    // =========================================================================
    // Ledger entries
    // =========================================================================

    /// Append a ledger entry; returns it with generated id and timestamp
    pub async fn insert_transaction(
        &self,
        conn: Option<&mut PgConnection>,
        record: &NewTransaction,
    ) -> AppResult<Transaction> {
        let mut pooled = None;
        let conn = self.connection(conn, &mut pooled).await?;

        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (transfer_id, account_id, amount, balance_after, type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, transfer_id, account_id, amount, balance_after, type, created_at
            "#,
        )
        .bind(record.transfer_id)
        .bind(record.account_id)
        .bind(record.amount.value())
        .bind(record.balance_after.value())
        .bind(record.transaction_type)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| store_error("insert_transaction", e))
    }

    /// Ledger entries of one account, oldest first
    pub async fn get_transactions_by_account_id(
        &self,
        conn: Option<&mut PgConnection>,
        account_id: i64,
    ) -> AppResult<Vec<Transaction>> {
        let mut pooled = None;
        let conn = self.connection(conn, &mut pooled).await?;

        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, transfer_id, account_id, amount, balance_after, type, created_at
            FROM transactions
            WHERE account_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(account_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| store_error("get_transactions_by_account_id", e))
    }
}

fn store_error(operation: &'static str, err: sqlx::Error) -> AppError {
    tracing::error!(operation, error = %err, "Ledger store query failed");
    AppError::Database(err)
}
