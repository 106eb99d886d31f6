//! Database module
//!
//! Connection pool, schema utilities, and the transactional execution
//! context every multi-step ledger write runs in.

use std::time::Duration;

use futures::future::BoxFuture;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tracing::Instrument;

use crate::config::Config;
use crate::domain::OperationContext;
use crate::error::{AppError, AppResult};

/// Create the connection pool from configuration
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .connect(&config.database_url)
        .await
}

/// Apply the embedded SQL migrations from `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let required_tables = ["users", "accounts", "transactions"];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}

// =========================================================================
// Transactional execution context
// =========================================================================

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs closures inside one database transaction.
///
/// The closure receives the transaction's connection; every store call made
/// with it joins the same unit of work. `Ok` commits, `Err` rolls back.
///
/// The deadline covers `BEGIN` and the closure only. Exceeding it drops the
/// still-open transaction, which rolls it back. `COMMIT` runs after the
/// deadline check: once it is sent the outcome is reported, never guessed.
#[derive(Debug, Clone)]
pub struct TransactionRunner {
    pool: PgPool,
    timeout: Duration,
    lock_timeout: Option<Duration>,
}

impl TransactionRunner {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            timeout: DEFAULT_TIMEOUT,
            lock_timeout: None,
        }
    }

    pub fn from_config(pool: PgPool, config: &Config) -> Self {
        Self::new(pool)
            .with_timeout(config.transfer_timeout)
            .with_lock_timeout(config.lock_timeout)
    }

    /// Default deadline when the operation context carries none
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bound on row-lock waits, applied transaction-locally
    pub fn with_lock_timeout(mut self, lock_timeout: Option<Duration>) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Run `f` as one atomic unit of work named `name`
    pub async fn run_in_transaction<T, F>(
        &self,
        name: &'static str,
        ctx: &OperationContext,
        f: F,
    ) -> AppResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, AppResult<T>> + Send,
    {
        let deadline = ctx.timeout.unwrap_or(self.timeout);
        let span = tracing::debug_span!(
            "db_transaction",
            tx.name = name,
            correlation_id = ?ctx.correlation_id
        );

        let (tx, result) = match tokio::time::timeout(deadline, self.execute(f))
            .instrument(span.clone())
            .await
        {
            Ok(executed) => executed?,
            Err(_) => {
                tracing::warn!(
                    tx.name = name,
                    deadline_ms = deadline.as_millis() as u64,
                    "Unit of work exceeded its deadline, rolled back"
                );
                return Err(AppError::Timeout(name));
            }
        };

        Self::finish(name, tx, result).instrument(span).await
    }

    /// Begin, apply session limits and run `f`, leaving the transaction open
    async fn execute<T, F>(
        &self,
        f: F,
    ) -> AppResult<(Transaction<'static, Postgres>, AppResult<T>)>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, AppResult<T>>,
    {
        let mut tx = self.pool.begin().await?;

        if let Some(lock_timeout) = self.lock_timeout {
            sqlx::query("SELECT set_config('lock_timeout', $1, true)")
                .bind(format!("{}ms", lock_timeout.as_millis()))
                .execute(&mut *tx)
                .await?;
        }

        let result = f(&mut *tx).await;
        Ok((tx, result))
    }

    async fn finish<T>(
        name: &'static str,
        tx: Transaction<'static, Postgres>,
        result: AppResult<T>,
    ) -> AppResult<T> {
        match result {
            Ok(value) => match tx.commit().await {
                Ok(()) => {
                    tracing::debug!(outcome = "committed", "Unit of work finished");
                    Ok(value)
                }
                Err(err) => {
                    tracing::error!(
                        tx.name = name,
                        error = %err,
                        "Commit failed, outcome unknown"
                    );
                    Err(AppError::CommitOutcomeUnknown { name, source: err })
                }
            },
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed; connection will be discarded");
                }
                tracing::debug!(outcome = "rolled_back", error = %err, "Unit of work finished");
                Err(err)
            }
        }
    }
}
