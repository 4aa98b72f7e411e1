//! Listener registry keyed by event kind.

use std::collections::HashMap;
use std::sync::Arc;

use domain::DomainEvent;

use crate::listener::EventListener;

/// Maps each event kind to the listeners interested in it.
///
/// Populated once at process start through [`ListenerRegistryBuilder`];
/// immutable afterwards. A kind with no listeners is valid and dispatches
/// as a no-op.
pub struct ListenerRegistry<E: DomainEvent> {
    listeners: HashMap<E::Kind, Vec<Arc<dyn EventListener<E>>>>,
}

impl<E: DomainEvent> ListenerRegistry<E> {
    /// Creates an empty registry builder.
    pub fn builder() -> ListenerRegistryBuilder<E> {
        ListenerRegistryBuilder {
            listeners: HashMap::new(),
        }
    }

    /// Creates a registry with no listeners.
    pub fn empty() -> Self {
        Self {
            listeners: HashMap::new(),
        }
    }

    /// Returns the listeners registered for `kind`, in registration order.
    pub fn listeners_for(&self, kind: E::Kind) -> &[Arc<dyn EventListener<E>>] {
        self.listeners.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the total number of registrations.
    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }
}

/// Builder collecting listener registrations at process start.
pub struct ListenerRegistryBuilder<E: DomainEvent> {
    listeners: HashMap<E::Kind, Vec<Arc<dyn EventListener<E>>>>,
}

impl<E: DomainEvent> ListenerRegistryBuilder<E> {
    /// Registers a listener for the given event kind.
    ///
    /// The same listener instance may be registered for several kinds.
    pub fn on(mut self, kind: E::Kind, listener: Arc<dyn EventListener<E>>) -> Self {
        self.listeners.entry(kind).or_default().push(listener);
        self
    }

    /// Builds the immutable registry.
    pub fn build(self) -> ListenerRegistry<E> {
        ListenerRegistry {
            listeners: self.listeners,
        }
    }
}
