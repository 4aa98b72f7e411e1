//! Event listener trait.

use async_trait::async_trait;
use domain::DomainEvent;
use tokio_util::sync::CancellationToken;

use crate::error::ListenerError;

/// A side-effecting observer of domain events (logging, notification,
/// metrics).
///
/// Listeners run after the aggregate's state change has been handed to the
/// store; a failing listener fails the dispatch but must never touch
/// aggregate state itself.
#[async_trait]
pub trait EventListener<E>: Send + Sync
where
    E: DomainEvent,
{
    /// A stable name identifying this listener in failure reports and logs.
    fn name(&self) -> &'static str;

    /// Handles a single event.
    async fn on_event(&self, event: &E, cancel: &CancellationToken) -> Result<(), ListenerError>;
}
