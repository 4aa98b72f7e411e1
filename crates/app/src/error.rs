//! Application error taxonomy.

use domain::ValidationError;
use mediator::DispatchError;
use storage::{StorageError, UnitOfWorkError};
use thiserror::Error;

/// Result alias for handler outcomes.
pub type AppResult<T> = Result<T, AppError>;

/// Errors a handler can return to the router.
///
/// Every expected failure of the pipeline converts into one of these
/// variants at the handler boundary; the presentation layer maps the
/// categories to distinct outward signals.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input: value-object construction or request precondition
    /// failed before any mutation.
    #[error("{0}")]
    Validation(String),

    /// The requested aggregate has no persisted record visible to the
    /// caller.
    #[error("{0}")]
    NotFound(String),

    /// The store rejected a write or the transaction failed; the unit of
    /// work has rolled back.
    #[error("persistence failure: {0}")]
    Persistence(#[from] StorageError),

    /// One or more event listeners failed; the enclosing operation was
    /// rolled back.
    #[error("event dispatch failure: {0}")]
    Dispatch(#[from] DispatchError),

    /// Anything unclassified, wrapped with its message.
    #[error("{0}")]
    Unexpected(String),
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        AppError::Validation(error.to_string())
    }
}

impl From<UnitOfWorkError> for AppError {
    fn from(error: UnitOfWorkError) -> Self {
        match error {
            UnitOfWorkError::Storage(inner) => AppError::Persistence(inner),
            UnitOfWorkError::Dispatch(inner) => AppError::Dispatch(inner),
            other => AppError::Unexpected(other.to_string()),
        }
    }
}
