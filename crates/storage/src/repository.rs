//! Repository and transaction-control ports.

use async_trait::async_trait;
use common::TaskId;
use domain::{AggregateRoot, Task, UserId};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::StorageError;

/// Port for loading and saving one aggregate type by identity.
///
/// Implemented by the persistence layer; consumed by handlers through the
/// unit of work. `save` assigns the identifier on the first save of a new
/// aggregate.
#[async_trait]
pub trait Repository<A: AggregateRoot>: Send + Sync {
    /// Loads an aggregate by identity. Returns `None` when no persisted
    /// record exists.
    async fn load(&self, id: A::Id, cancel: &CancellationToken) -> Result<Option<A>, StorageError>;

    /// Persists the aggregate's current state, assigning the identifier on
    /// first save.
    async fn save(&self, aggregate: &mut A, cancel: &CancellationToken)
    -> Result<(), StorageError>;
}

/// Port over the store's transaction resource.
///
/// The resource is exclusively owned by one in-flight unit of work and must
/// not be shared across concurrent requests.
#[async_trait]
pub trait TransactionControl: Send + Sync {
    /// Opens a transaction; subsequent writes are staged until commit.
    async fn begin(&self, cancel: &CancellationToken) -> Result<(), StorageError>;

    /// Applies all staged writes and closes the transaction.
    async fn commit(&self, cancel: &CancellationToken) -> Result<(), StorageError>;

    /// Discards all staged writes and closes the transaction.
    async fn rollback(&self, cancel: &CancellationToken) -> Result<(), StorageError>;
}

/// Completion-status filter for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

/// Per-user task counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// Task-specific repository port with the user-scoped lookups the
/// application layer needs.
///
/// A task is only visible to the user who created it, and soft-deleted tasks
/// are excluded from every user-scoped operation.
#[async_trait]
pub trait TaskRepository: Repository<Task> + TransactionControl {
    /// Loads a task visible to `user`, excluding deleted tasks.
    async fn load_for_user(
        &self,
        id: TaskId,
        user: &UserId,
        cancel: &CancellationToken,
    ) -> Result<Option<Task>, StorageError>;

    /// Lists a user's tasks matching the status filter, ordered by id.
    async fn list_for_user(
        &self,
        user: &UserId,
        filter: StatusFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<Task>, StorageError>;

    /// Returns one page of a user's tasks plus the total count.
    ///
    /// Pages are 1-based.
    async fn page_for_user(
        &self,
        user: &UserId,
        page: usize,
        page_size: usize,
        cancel: &CancellationToken,
    ) -> Result<(Vec<Task>, usize), StorageError>;

    /// Returns total/completed/pending counts for a user.
    async fn counts_for_user(
        &self,
        user: &UserId,
        cancel: &CancellationToken,
    ) -> Result<TaskCounts, StorageError>;
}
