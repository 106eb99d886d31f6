//! Transfer Engine
//!
//! Moves money between two accounts as one atomic unit of work: two locked
//! reads, a balance check, two balance updates and two ledger entries.

use std::sync::Arc;

use futures::FutureExt;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::account::AccountService;
use crate::db::TransactionRunner;
use crate::domain::{AmountError, DomainError, OperationContext};
use crate::error::{AppError, AppResult};
use crate::ledger::{Account, AccountQuery, AccountUpdate, NewTransaction, Transaction};

use super::InternalTransferCommand;

/// Orchestrates internal transfers over an [`AccountService`]
pub struct TransferEngine<S> {
    accounts: Arc<S>,
    runner: TransactionRunner,
}

impl<S> Clone for TransferEngine<S> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            runner: self.runner.clone(),
        }
    }
}

impl<S: AccountService + 'static> TransferEngine<S> {
    pub fn new(accounts: Arc<S>, runner: TransactionRunner) -> Self {
        Self { accounts, runner }
    }

    pub fn accounts(&self) -> &S {
        &self.accounts
    }

    /// Run the transfer in a unit of work of its own
    pub async fn execute(
        &self,
        ctx: &OperationContext,
        command: InternalTransferCommand,
    ) -> AppResult<Transaction> {
        let engine = self.clone();
        let op_ctx = ctx.clone();

        self.runner
            .run_in_transaction("create_internal_transfer", ctx, move |conn| {
                async move {
                    engine
                        .create_internal_transfer(&op_ctx, conn, command)
                        .await
                }
                .boxed()
            })
            .await
    }

    /// Run the transfer on the caller's execution context.
    ///
    /// Nothing is committed here; on `Err` the caller must roll back.
    /// Returns the sender's DEBIT entry.
    pub async fn create_internal_transfer(
        &self,
        ctx: &OperationContext,
        conn: &mut PgConnection,
        command: InternalTransferCommand,
    ) -> AppResult<Transaction> {
        let amount = command.validate()?;
        let transfer_id = Uuid::new_v4();

        // Lock in ascending id order whatever the direction, so A->B and
        // B->A running together cannot each hold one lock and wait on the other.
        let (first_id, second_id) = lock_order(command.from_account_id, command.to_account_id);

        let first = self
            .accounts
            .get_account(Some(&mut *conn), AccountQuery::by_id(first_id).for_update())
            .await?;
        let second = self
            .accounts
            .get_account(Some(&mut *conn), AccountQuery::by_id(second_id).for_update())
            .await?;

        let (sender, receiver) = resolve_roles(command.from_account_id, first, second);

        let sender_balance = sender.current_balance().map_err(corrupt_row)?;
        if !sender_balance.is_sufficient_for(&amount) {
            tracing::warn!(
                correlation_id = ?ctx.correlation_id,
                from_account_id = sender.id,
                required = amount.value(),
                available = sender_balance.value(),
                "Transfer rejected: insufficient balance"
            );
            return Err(
                DomainError::insufficient_balance(amount.value(), sender_balance.value()).into(),
            );
        }

        let debited = sender_balance.debit(&amount)?;
        let credited = receiver
            .current_balance()
            .map_err(corrupt_row)?
            .credit(&amount)
            .map_err(|_| DomainError::BalanceOverflow(receiver.id))?;

        // Debit
        let sender = self
            .accounts
            .update_account(Some(&mut *conn), sender.id, AccountUpdate::balance(debited))
            .await?;
        let debit_record = self
            .accounts
            .create_transaction_record(
                Some(&mut *conn),
                NewTransaction::debit(transfer_id, &sender, amount).map_err(corrupt_row)?,
            )
            .await?;

        // Credit
        let receiver = self
            .accounts
            .update_account(Some(&mut *conn), receiver.id, AccountUpdate::balance(credited))
            .await?;
        self.accounts
            .create_transaction_record(
                Some(&mut *conn),
                NewTransaction::credit(transfer_id, &receiver, amount).map_err(corrupt_row)?,
            )
            .await?;

        tracing::info!(
            correlation_id = ?ctx.correlation_id,
            transfer_id = %transfer_id,
            sender_user_id = %command.sender_user_id,
            from_account_id = sender.id,
            to_account_id = receiver.id,
            amount = amount.value(),
            "Internal transfer applied"
        );

        Ok(debit_record)
    }
}

/// Lock acquisition order for a pair of accounts: smaller id first
pub fn lock_order(from_account_id: i64, to_account_id: i64) -> (i64, i64) {
    if from_account_id < to_account_id {
        (from_account_id, to_account_id)
    } else {
        (to_account_id, from_account_id)
    }
}

/// Split rows loaded in lock order back into (sender, receiver)
pub fn resolve_roles(from_account_id: i64, first: Account, second: Account) -> (Account, Account) {
    if first.id == from_account_id {
        (first, second)
    } else {
        (second, first)
    }
}

fn corrupt_row(err: AmountError) -> AppError {
    AppError::Internal(format!("stored balance violates ledger invariant: {}", err))
}
