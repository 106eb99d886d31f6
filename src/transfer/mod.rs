//! Transfer module
//!
//! Internal funds transfers between accounts held at this bank.

mod command;
mod engine;

pub use command::InternalTransferCommand;
pub use engine::{lock_order, resolve_roles, TransferEngine};
