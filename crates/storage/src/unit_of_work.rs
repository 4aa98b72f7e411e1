//! Unit of work: the transaction boundary of the mutation pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use domain::AggregateRoot;
use mediator::EventDispatcher;
use tokio_util::sync::CancellationToken;

use crate::error::{StorageError, UnitOfWorkError};
use crate::repository::{Repository, TransactionControl};

/// The store surface a unit of work drives: persistence plus transaction
/// control. Blanket-implemented for every type that provides both ports.
#[async_trait]
pub trait UnitOfWorkStore<A: AggregateRoot>: Send + Sync {
    async fn persist(
        &self,
        aggregate: &mut A,
        cancel: &CancellationToken,
    ) -> Result<(), StorageError>;

    async fn begin(&self, cancel: &CancellationToken) -> Result<(), StorageError>;

    async fn commit(&self, cancel: &CancellationToken) -> Result<(), StorageError>;

    async fn rollback(&self, cancel: &CancellationToken) -> Result<(), StorageError>;
}

#[async_trait]
impl<A, T> UnitOfWorkStore<A> for T
where
    A: AggregateRoot,
    T: Repository<A> + TransactionControl,
{
    async fn persist(
        &self,
        aggregate: &mut A,
        cancel: &CancellationToken,
    ) -> Result<(), StorageError> {
        self.save(aggregate, cancel).await
    }

    async fn begin(&self, cancel: &CancellationToken) -> Result<(), StorageError> {
        TransactionControl::begin(self, cancel).await
    }

    async fn commit(&self, cancel: &CancellationToken) -> Result<(), StorageError> {
        TransactionControl::commit(self, cancel).await
    }

    async fn rollback(&self, cancel: &CancellationToken) -> Result<(), StorageError> {
        TransactionControl::rollback(self, cancel).await
    }
}

/// Lifecycle of a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOfWorkState {
    /// No transaction open; `save_changes` and `begin_transaction` are valid.
    Idle,
    /// An explicit transaction is open.
    InTransaction,
    /// The explicit transaction committed; the instance is done.
    Committed,
    /// The explicit transaction rolled back; the instance is done.
    RolledBack,
}

impl UnitOfWorkState {
    /// Returns true once the unit of work has committed or rolled back.
    pub fn is_closed(&self) -> bool {
        matches!(self, UnitOfWorkState::Committed | UnitOfWorkState::RolledBack)
    }
}

/// Ties persistence and event delivery into one atomic step.
///
/// A flush runs in a fixed order: persist every touched aggregate's state,
/// collect their pending events into one batch (event order within an
/// aggregate preserved), dispatch the batch, clear the logs, commit the
/// store transaction. Any failure rolls the transaction back and leaves the
/// event logs intact, so nothing is lost and nothing is double-dispatched on
/// retry.
///
/// Dispatch runs pre-commit, inside the transaction: a failing listener
/// aborts the enclosing write. Events are dispatched at most once and never
/// before their state change has been handed to the store.
///
/// An instance belongs to a single in-flight operation and must not be
/// shared across concurrent requests.
pub struct UnitOfWork<A: AggregateRoot> {
    store: Arc<dyn UnitOfWorkStore<A>>,
    dispatcher: Arc<EventDispatcher<A::Event>>,
    state: UnitOfWorkState,
}

impl<A: AggregateRoot> UnitOfWork<A> {
    /// Creates an idle unit of work over the given store and dispatcher.
    pub fn new(
        store: Arc<dyn UnitOfWorkStore<A>>,
        dispatcher: Arc<EventDispatcher<A::Event>>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            state: UnitOfWorkState::Idle,
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> UnitOfWorkState {
        self.state
    }

    /// Opens an explicit transaction. Fails if one is already open or the
    /// unit of work is closed.
    pub async fn begin_transaction(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<(), UnitOfWorkError> {
        match self.state {
            UnitOfWorkState::InTransaction => Err(UnitOfWorkError::TransactionInProgress),
            state if state.is_closed() => Err(UnitOfWorkError::Closed),
            _ => {
                self.store.begin(cancel).await?;
                self.state = UnitOfWorkState::InTransaction;
                Ok(())
            }
        }
    }

    /// Flushes the touched aggregates and commits the open transaction.
    ///
    /// On any failure the transaction is rolled back, the unit of work
    /// closes, and no events are considered dispatched.
    #[tracing::instrument(skip_all, fields(aggregates = aggregates.len()))]
    pub async fn commit(
        &mut self,
        aggregates: &mut [&mut A],
        cancel: &CancellationToken,
    ) -> Result<(), UnitOfWorkError> {
        match self.state {
            UnitOfWorkState::Idle => return Err(UnitOfWorkError::NoTransaction),
            state if state.is_closed() => return Err(UnitOfWorkError::Closed),
            _ => {}
        }

        match self.flush(aggregates, cancel).await {
            Ok(()) => {
                self.state = UnitOfWorkState::Committed;
                Ok(())
            }
            Err(error) => {
                self.recover().await;
                self.state = UnitOfWorkState::RolledBack;
                Err(error)
            }
        }
    }

    /// Discards all pending changes in the open transaction.
    ///
    /// Pending events are NOT cleared, so a reused aggregate instance never
    /// looks already-dispatched.
    pub async fn rollback(&mut self) -> Result<(), UnitOfWorkError> {
        match self.state {
            UnitOfWorkState::Idle => return Err(UnitOfWorkError::NoTransaction),
            state if state.is_closed() => return Err(UnitOfWorkError::Closed),
            _ => {}
        }

        self.state = UnitOfWorkState::RolledBack;
        // Rollback itself is not cancellable.
        self.store.rollback(&CancellationToken::new()).await?;
        Ok(())
    }

    /// Persists one aggregate and flushes its events as an implicit
    /// single-operation transaction.
    ///
    /// Valid only while idle; the unit of work stays idle afterwards, so
    /// repeated calls each run their own transaction.
    #[tracing::instrument(skip_all)]
    pub async fn save_changes(
        &mut self,
        aggregate: &mut A,
        cancel: &CancellationToken,
    ) -> Result<(), UnitOfWorkError> {
        match self.state {
            UnitOfWorkState::InTransaction => return Err(UnitOfWorkError::TransactionInProgress),
            state if state.is_closed() => return Err(UnitOfWorkError::Closed),
            _ => {}
        }

        self.store.begin(cancel).await?;
        let mut group = [aggregate];
        match self.flush(&mut group, cancel).await {
            Ok(()) => Ok(()),
            Err(error) => {
                self.recover().await;
                Err(error)
            }
        }
    }

    /// Persist → collect → dispatch → clear → commit.
    async fn flush(
        &self,
        aggregates: &mut [&mut A],
        cancel: &CancellationToken,
    ) -> Result<(), UnitOfWorkError> {
        for aggregate in aggregates.iter_mut() {
            self.store.persist(aggregate, cancel).await?;
        }

        let batch: Vec<A::Event> = aggregates
            .iter()
            .flat_map(|aggregate| aggregate.uncommitted_events().iter().cloned())
            .collect();
        if !batch.is_empty() {
            self.dispatcher.dispatch_all(&batch, cancel).await?;
        }

        for aggregate in aggregates.iter_mut() {
            aggregate.clear_uncommitted_events();
        }

        self.store.commit(cancel).await?;
        Ok(())
    }

    /// Rolls the store transaction back after a failed flush.
    async fn recover(&self) {
        if let Err(error) = self.store.rollback(&CancellationToken::new()).await {
            tracing::error!(error = %error, "rollback failed after aborted flush");
        }
    }
}
