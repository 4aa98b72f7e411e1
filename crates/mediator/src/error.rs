//! Dispatch and registry error types.

use thiserror::Error;

/// Startup-time registry configuration errors.
///
/// These are fatal to process initialization and never surface as a
/// per-request failure.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A request kind of the closed set has no registered handler.
    #[error("no handler registered for request kind {kind}")]
    MissingHandler { kind: String },

    /// A request kind was registered more than once.
    #[error("multiple handlers registered for request kind {kind}")]
    DuplicateHandler { kind: String },
}

/// Error returned by a failing event listener.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ListenerError {
    message: String,
}

impl ListenerError {
    /// Creates a listener error with a descriptive message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One listener's failure within a dispatch, identified by listener name.
#[derive(Debug, Clone)]
pub struct ListenerFailure {
    /// The listener that failed.
    pub listener: &'static str,

    /// The failure message.
    pub message: String,
}

impl std::fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.listener, self.message)
    }
}

/// Errors surfaced by the domain-event dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The cancellation signal fired before or during dispatch.
    #[error("dispatch cancelled")]
    Cancelled,

    /// One or more listeners of a single event failed. Every listener of the
    /// event was still invoked; events dispatched earlier in the batch are
    /// not undone.
    #[error("one or more listeners failed while handling {event_type}")]
    ListenersFailed {
        event_type: &'static str,
        failures: Vec<ListenerFailure>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_failure_display_includes_name() {
        let failure = ListenerFailure {
            listener: "audit",
            message: "sink unavailable".to_string(),
        };
        assert_eq!(failure.to_string(), "audit: sink unavailable");
    }

    #[test]
    fn dispatch_error_names_the_event_type() {
        let error = DispatchError::ListenersFailed {
            event_type: "TaskCompleted",
            failures: vec![],
        };
        assert!(error.to_string().contains("TaskCompleted"));
    }
}
