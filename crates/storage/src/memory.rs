//! In-memory task store for testing and local composition.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use common::TaskId;
use domain::{AggregateRoot, Task, TaskSnapshot, UserId};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::error::StorageError;
use crate::repository::{
    Repository, StatusFilter, TaskCounts, TaskRepository, TransactionControl,
};

#[derive(Default)]
struct StoreInner {
    rows: HashMap<TaskId, TaskSnapshot>,
    staged: Vec<(TaskId, TaskSnapshot)>,
    in_transaction: bool,
}

/// In-memory store implementing the repository and transaction-control
/// ports.
///
/// Provides the same interface a relational adapter would: sequential
/// identifier assignment on first save, and writes staged under an open
/// transaction until commit.
#[derive(Clone)]
pub struct InMemoryTaskStore {
    inner: Arc<RwLock<StoreInner>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Returns the number of committed rows.
    pub async fn row_count(&self) -> usize {
        self.inner.read().await.rows.len()
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), StorageError> {
    if cancel.is_cancelled() {
        Err(StorageError::Cancelled)
    } else {
        Ok(())
    }
}

fn matches_filter(snapshot: &TaskSnapshot, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Completed => snapshot.completed,
        StatusFilter::Pending => !snapshot.completed,
    }
}

#[async_trait]
impl Repository<Task> for InMemoryTaskStore {
    async fn load(
        &self,
        id: TaskId,
        cancel: &CancellationToken,
    ) -> Result<Option<Task>, StorageError> {
        ensure_not_cancelled(cancel)?;
        let inner = self.inner.read().await;
        // Staged writes shadow committed rows within the open transaction.
        let snapshot = inner
            .staged
            .iter()
            .rev()
            .find(|(staged_id, _)| *staged_id == id)
            .map(|(_, snapshot)| snapshot.clone())
            .or_else(|| inner.rows.get(&id).cloned());
        Ok(snapshot.map(Task::from_snapshot))
    }

    async fn save(
        &self,
        aggregate: &mut Task,
        cancel: &CancellationToken,
    ) -> Result<(), StorageError> {
        ensure_not_cancelled(cancel)?;
        if !aggregate.id().is_assigned() {
            let id = TaskId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
            aggregate.assign_id(id);
        }
        let snapshot = aggregate.snapshot();
        let mut inner = self.inner.write().await;
        if inner.in_transaction {
            inner.staged.push((snapshot.id, snapshot));
        } else {
            inner.rows.insert(snapshot.id, snapshot);
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionControl for InMemoryTaskStore {
    async fn begin(&self, cancel: &CancellationToken) -> Result<(), StorageError> {
        ensure_not_cancelled(cancel)?;
        let mut inner = self.inner.write().await;
        if inner.in_transaction {
            return Err(StorageError::TransactionState(
                "a transaction is already open".to_string(),
            ));
        }
        inner.in_transaction = true;
        Ok(())
    }

    async fn commit(&self, cancel: &CancellationToken) -> Result<(), StorageError> {
        ensure_not_cancelled(cancel)?;
        let mut inner = self.inner.write().await;
        if !inner.in_transaction {
            return Err(StorageError::TransactionState(
                "no transaction is open".to_string(),
            ));
        }
        let staged = std::mem::take(&mut inner.staged);
        for (id, snapshot) in staged {
            inner.rows.insert(id, snapshot);
        }
        inner.in_transaction = false;
        Ok(())
    }

    // Rollback ignores the cancellation signal: an aborted operation must
    // still be able to discard its staged writes.
    async fn rollback(&self, _cancel: &CancellationToken) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        if !inner.in_transaction {
            return Err(StorageError::TransactionState(
                "no transaction is open".to_string(),
            ));
        }
        inner.staged.clear();
        inner.in_transaction = false;
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn load_for_user(
        &self,
        id: TaskId,
        user: &UserId,
        cancel: &CancellationToken,
    ) -> Result<Option<Task>, StorageError> {
        let task = self.load(id, cancel).await?;
        Ok(task.filter(|task| task.created_by() == user && !task.is_deleted()))
    }

    async fn list_for_user(
        &self,
        user: &UserId,
        filter: StatusFilter,
        cancel: &CancellationToken,
    ) -> Result<Vec<Task>, StorageError> {
        ensure_not_cancelled(cancel)?;
        let inner = self.inner.read().await;
        let mut tasks: Vec<Task> = inner
            .rows
            .values()
            .filter(|snapshot| snapshot.created_by == *user && !snapshot.deleted)
            .filter(|snapshot| matches_filter(snapshot, filter))
            .cloned()
            .map(Task::from_snapshot)
            .collect();
        tasks.sort_by_key(|task| task.id());
        Ok(tasks)
    }

    async fn page_for_user(
        &self,
        user: &UserId,
        page: usize,
        page_size: usize,
        cancel: &CancellationToken,
    ) -> Result<(Vec<Task>, usize), StorageError> {
        let all = self.list_for_user(user, StatusFilter::All, cancel).await?;
        let total = all.len();
        let page = page.max(1);
        let items = all
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();
        Ok((items, total))
    }

    async fn counts_for_user(
        &self,
        user: &UserId,
        cancel: &CancellationToken,
    ) -> Result<TaskCounts, StorageError> {
        let all = self.list_for_user(user, StatusFilter::All, cancel).await?;
        let completed = all.iter().filter(|task| task.is_completed()).count();
        Ok(TaskCounts {
            total: all.len(),
            completed,
            pending: all.len() - completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{TaskTitle, UserId};

    fn user(value: &str) -> UserId {
        UserId::new(value).unwrap()
    }

    fn task_for(owner: &str, title: &str) -> Task {
        Task::create(TaskTitle::new(title).unwrap(), None, user(owner))
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids() {
        let store = InMemoryTaskStore::new();
        let cancel = CancellationToken::new();

        let mut first = task_for("alice", "one");
        let mut second = task_for("alice", "two");
        store.save(&mut first, &cancel).await.unwrap();
        store.save(&mut second, &cancel).await.unwrap();

        assert_eq!(first.id(), TaskId::new(1));
        assert_eq!(second.id(), TaskId::new(2));
    }

    #[tokio::test]
    async fn save_keeps_an_already_assigned_id() {
        let store = InMemoryTaskStore::new();
        let cancel = CancellationToken::new();

        let mut task = task_for("alice", "one");
        store.save(&mut task, &cancel).await.unwrap();
        let id = task.id();

        task.complete(user("alice"));
        store.save(&mut task, &cancel).await.unwrap();

        assert_eq!(task.id(), id);
        assert_eq!(store.row_count().await, 1);
    }

    #[tokio::test]
    async fn load_returns_none_for_unknown_id() {
        let store = InMemoryTaskStore::new();
        let cancel = CancellationToken::new();

        let result = store.load(TaskId::new(99), &cancel).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn staged_writes_are_visible_before_commit_and_gone_after_rollback() {
        let store = InMemoryTaskStore::new();
        let cancel = CancellationToken::new();

        TransactionControl::begin(&store, &cancel).await.unwrap();
        let mut task = task_for("alice", "one");
        store.save(&mut task, &cancel).await.unwrap();

        // Visible within the transaction.
        assert!(store.load(task.id(), &cancel).await.unwrap().is_some());
        assert_eq!(store.row_count().await, 0);

        TransactionControl::rollback(&store, &cancel).await.unwrap();
        assert!(store.load(task.id(), &cancel).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn commit_applies_staged_writes() {
        let store = InMemoryTaskStore::new();
        let cancel = CancellationToken::new();

        TransactionControl::begin(&store, &cancel).await.unwrap();
        let mut task = task_for("alice", "one");
        store.save(&mut task, &cancel).await.unwrap();
        TransactionControl::commit(&store, &cancel).await.unwrap();

        assert_eq!(store.row_count().await, 1);
        assert!(store.load(task.id(), &cancel).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn double_begin_is_rejected() {
        let store = InMemoryTaskStore::new();
        let cancel = CancellationToken::new();

        TransactionControl::begin(&store, &cancel).await.unwrap();
        let result = TransactionControl::begin(&store, &cancel).await;
        assert!(matches!(result, Err(StorageError::TransactionState(_))));
    }

    #[tokio::test]
    async fn user_scoped_load_hides_other_users_and_deleted_tasks() {
        let store = InMemoryTaskStore::new();
        let cancel = CancellationToken::new();

        let mut task = task_for("alice", "one");
        store.save(&mut task, &cancel).await.unwrap();

        assert!(
            store
                .load_for_user(task.id(), &user("alice"), &cancel)
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            store
                .load_for_user(task.id(), &user("bob"), &cancel)
                .await
                .unwrap()
                .is_none()
        );

        task.delete(user("alice"));
        store.save(&mut task, &cancel).await.unwrap();
        assert!(
            store
                .load_for_user(task.id(), &user("alice"), &cancel)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn list_filters_by_status_and_orders_by_id() {
        let store = InMemoryTaskStore::new();
        let cancel = CancellationToken::new();

        let mut open = task_for("alice", "open");
        let mut done = task_for("alice", "done");
        done.complete(user("alice"));
        let mut other = task_for("bob", "other");
        store.save(&mut open, &cancel).await.unwrap();
        store.save(&mut done, &cancel).await.unwrap();
        store.save(&mut other, &cancel).await.unwrap();

        let all = store
            .list_for_user(&user("alice"), StatusFilter::All, &cancel)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title().as_str(), "open");
        assert_eq!(all[1].title().as_str(), "done");

        let completed = store
            .list_for_user(&user("alice"), StatusFilter::Completed, &cancel)
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].title().as_str(), "done");

        let pending = store
            .list_for_user(&user("alice"), StatusFilter::Pending, &cancel)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title().as_str(), "open");
    }

    #[tokio::test]
    async fn paging_slices_and_reports_total() {
        let store = InMemoryTaskStore::new();
        let cancel = CancellationToken::new();

        for index in 0..5 {
            let mut task = task_for("alice", &format!("task {index}"));
            store.save(&mut task, &cancel).await.unwrap();
        }

        let (items, total) = store
            .page_for_user(&user("alice"), 2, 2, &cancel)
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title().as_str(), "task 2");

        let (items, total) = store
            .page_for_user(&user("alice"), 3, 2, &cancel)
            .await
            .unwrap();
        assert_eq!(total, 5);
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn counts_split_by_completion() {
        let store = InMemoryTaskStore::new();
        let cancel = CancellationToken::new();

        let mut open = task_for("alice", "open");
        let mut done = task_for("alice", "done");
        done.complete(user("alice"));
        store.save(&mut open, &cancel).await.unwrap();
        store.save(&mut done, &cancel).await.unwrap();

        let counts = store.counts_for_user(&user("alice"), &cancel).await.unwrap();
        assert_eq!(
            counts,
            TaskCounts {
                total: 2,
                completed: 1,
                pending: 1
            }
        );
    }

    #[tokio::test]
    async fn cancelled_token_fails_reads_and_writes() {
        let store = InMemoryTaskStore::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut task = task_for("alice", "one");
        assert!(matches!(
            store.save(&mut task, &cancel).await,
            Err(StorageError::Cancelled)
        ));
        assert!(matches!(
            store.load(TaskId::new(1), &cancel).await,
            Err(StorageError::Cancelled)
        ));
    }
}
