//! Storage and unit-of-work error types.

use mediator::DispatchError;
use thiserror::Error;

/// Errors surfaced by repository and transaction-control ports.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store rejected a write (constraint violation or similar).
    #[error("write rejected: {reason}")]
    WriteRejected { reason: String },

    /// The underlying connection failed.
    #[error("storage connection failure: {0}")]
    Connection(String),

    /// A transaction-control call arrived in the wrong state.
    #[error("transaction state error: {0}")]
    TransactionState(String),

    /// The cancellation signal fired before or during the operation.
    #[error("storage operation cancelled")]
    Cancelled,
}

/// Errors surfaced by the unit of work.
#[derive(Debug, Error)]
pub enum UnitOfWorkError {
    /// `begin_transaction` was called while a transaction is open.
    #[error("a transaction is already in progress")]
    TransactionInProgress,

    /// `commit` or `rollback` was called with no open transaction.
    #[error("no transaction is in progress")]
    NoTransaction,

    /// The unit of work has already committed or rolled back.
    #[error("unit of work is already closed")]
    Closed,

    /// Persisting aggregate state or driving the transaction failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// One or more event listeners failed during the pre-commit dispatch.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
