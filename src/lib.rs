//! bank_ledger Library
//!
//! Ledger-backed banking core: account storage, the append-only transaction
//! ledger, and the internal funds-transfer engine.

pub mod account;
pub mod config;
pub mod db;
pub mod domain;
pub mod ledger;
pub mod transfer;

mod error;

pub use config::{Config, ConfigError};
pub use db::TransactionRunner;
pub use domain::{Amount, AmountError, Balance, DomainError, OperationContext};
pub use error::{AppError, AppResult, ErrorCategory};
pub use transfer::{InternalTransferCommand, TransferEngine};
