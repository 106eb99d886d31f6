//! Ledger module
//!
//! Account rows, the append-only transaction ledger, and the store that
//! reads and writes them.

mod model;
mod query;
mod store;

pub use model::{Account, AccountType, NewTransaction, Transaction, TransactionType};
pub use query::{AccountQuery, AccountUpdate};
pub use store::LedgerStore;

#[cfg(test)]
pub(crate) use model::fixtures;
