//! Domain event dispatcher with concurrent listener fan-out.

use domain::DomainEvent;
use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::error::{DispatchError, ListenerFailure};
use crate::registry::ListenerRegistry;

/// Fans domain events out to the listeners registered for their kind.
///
/// A batch is dispatched in recording order. For each event, all listeners
/// of that event's kind run concurrently and are all awaited; their relative
/// order is undefined. A failing listener fails the whole dispatch call, but
/// events dispatched earlier in the batch are not undone.
pub struct EventDispatcher<E: DomainEvent> {
    registry: ListenerRegistry<E>,
}

impl<E: DomainEvent> EventDispatcher<E> {
    /// Creates a dispatcher over a registry populated at startup.
    pub fn new(registry: ListenerRegistry<E>) -> Self {
        Self { registry }
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &ListenerRegistry<E> {
        &self.registry
    }

    /// Dispatches a single event to all listeners of its kind.
    ///
    /// Zero registered listeners is a valid no-op.
    #[tracing::instrument(skip(self, event, cancel), fields(event_type = event.event_type()))]
    pub async fn dispatch(&self, event: &E, cancel: &CancellationToken) -> Result<(), DispatchError> {
        if cancel.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }

        let listeners = self.registry.listeners_for(event.kind());
        if listeners.is_empty() {
            return Ok(());
        }

        let outcomes = join_all(
            listeners
                .iter()
                .map(|listener| listener.on_event(event, cancel)),
        )
        .await;
        metrics::counter!("domain_events_dispatched").increment(1);

        let failures: Vec<ListenerFailure> = listeners
            .iter()
            .zip(outcomes)
            .filter_map(|(listener, outcome)| {
                outcome.err().map(|error| ListenerFailure {
                    listener: listener.name(),
                    message: error.to_string(),
                })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            tracing::error!(
                event_type = event.event_type(),
                failed = failures.len(),
                "listener failures during dispatch"
            );
            Err(DispatchError::ListenersFailed {
                event_type: event.event_type(),
                failures,
            })
        }
    }

    /// Dispatches a batch of events in recording order.
    ///
    /// Stops at the first event whose listener set reports a failure; the
    /// events dispatched before it stand.
    pub async fn dispatch_all(
        &self,
        events: &[E],
        cancel: &CancellationToken,
    ) -> Result<(), DispatchError> {
        for event in events {
            self.dispatch(event, cancel).await?;
        }
        Ok(())
    }
}
