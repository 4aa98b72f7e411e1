//! Core aggregate and domain event traits.

use std::fmt::Debug;
use std::hash::Hash;

use chrono::{DateTime, Utc};

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable, named in past tense, and carry the occurrence
/// timestamp assigned at construction.
pub trait DomainEvent: Clone + Send + Sync + 'static {
    /// Tag type identifying the event variant in listener registries.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Returns the registry tag of this event.
    fn kind(&self) -> Self::Kind;

    /// Returns the event type name, used for logging and diagnostics.
    fn event_type(&self) -> &'static str;

    /// Returns when the event occurred.
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Trait for aggregate roots.
///
/// An aggregate root mutates its own state through business methods and
/// appends the resulting domain events to an internal log. The log grows
/// only from inside the aggregate; the unit of work reads it during a flush
/// and clears it once the events have been dispatched.
pub trait AggregateRoot: Send + Sync {
    /// The typed identifier of this aggregate.
    type Id: Copy + Eq + Debug + Send + Sync;

    /// The events this aggregate records.
    type Event: DomainEvent;

    /// Returns the aggregate's identifier (the unassigned sentinel before
    /// the first save).
    fn id(&self) -> Self::Id;

    /// Sets the identifier. Called by the persistence layer on first save.
    fn assign_id(&mut self, id: Self::Id);

    /// Returns the events recorded since the last flush, in recording order.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Discards the recorded events. Called by the unit of work after a
    /// successful dispatch, never on rollback.
    fn clear_uncommitted_events(&mut self);
}

/// Append-only log of events an aggregate has recorded but not yet flushed.
///
/// Only the owning aggregate can append (`record` is crate-private); callers
/// outside the domain crate can read the log and clear it, nothing else.
#[derive(Debug, Clone, Default)]
pub struct EventLog<E> {
    events: Vec<E>,
}

impl<E> EventLog<E> {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub(crate) fn record(&mut self, event: E) {
        self.events.push(event);
    }

    /// Returns the recorded events in recording order.
    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been recorded since the last clear.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discards all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
