//! Common test utilities
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use bank_ledger::account::{AccountService, PgAccountService};
use bank_ledger::ledger::{Account, AccountType, LedgerStore};
use bank_ledger::{TransactionRunner, TransferEngine};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Connect to the test database and apply migrations.
///
/// Tests never truncate: each one works on freshly created users and accounts.
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    bank_ledger::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn account_service(pool: &PgPool) -> PgAccountService {
    PgAccountService::new(LedgerStore::new(pool.clone()))
}

/// Runner with a deadline generous enough for heavy contention
pub fn runner(pool: &PgPool) -> TransactionRunner {
    TransactionRunner::new(pool.clone()).with_timeout(Duration::from_secs(30))
}

pub fn engine(pool: &PgPool) -> TransferEngine<PgAccountService> {
    TransferEngine::new(Arc::new(account_service(pool)), runner(pool))
}

pub async fn create_user(pool: &PgPool) -> Uuid {
    sqlx::query_scalar("INSERT INTO users DEFAULT VALUES RETURNING id")
        .fetch_one(pool)
        .await
        .expect("Failed to seed user")
}

/// Fresh user with one SAVINGS account holding `balance`
pub async fn open_account(pool: &PgPool, balance: i64) -> Account {
    let user_id = create_user(pool).await;
    let account = account_service(pool)
        .create_account(None, user_id, AccountType::Savings)
        .await
        .expect("Failed to create account");

    set_balance(pool, account.id, balance).await;
    Account { balance, ..account }
}

/// Account with a fixed number, reset to `balance` if it already exists
pub async fn seed_account_with_id(pool: &PgPool, account_id: i64, balance: i64) {
    let user_id = create_user(pool).await;
    sqlx::query(
        r#"
        INSERT INTO accounts (id, user_id, balance, type)
        VALUES ($1, $2, $3, 'SAVINGS')
        ON CONFLICT (id) DO UPDATE SET balance = EXCLUDED.balance, updated_at = NOW()
        "#,
    )
    .bind(account_id)
    .bind(user_id)
    .bind(balance)
    .execute(pool)
    .await
    .expect("Failed to seed fixed account");
}

pub async fn set_balance(pool: &PgPool, account_id: i64, balance: i64) {
    sqlx::query("UPDATE accounts SET balance = $2 WHERE id = $1")
        .bind(account_id)
        .bind(balance)
        .execute(pool)
        .await
        .expect("Failed to set balance");
}

pub async fn balance_of(pool: &PgPool, account_id: i64) -> i64 {
    sqlx::query_scalar("SELECT balance FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read balance")
}

pub async fn transaction_count(pool: &PgPool, account_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE account_id = $1")
        .bind(account_id)
        .fetch_one(pool)
        .await
        .expect("Failed to count transactions")
}
