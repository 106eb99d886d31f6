//! Account module
//!
//! Account lookup, balance updates, and ledger-record creation behind a
//! trait, so the transfer engine stays decoupled from storage wiring.

mod service;

pub use service::{
    generate_account_id, AccountService, PgAccountService, MAX_ACCOUNT_ID, MIN_ACCOUNT_ID,
};
