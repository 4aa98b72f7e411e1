//! Request routing and domain-event dispatch.
//!
//! This crate provides the two dispatch mechanisms of the pipeline:
//! - [`Router`]: routes a command or query value to the single handler
//!   registered for its kind (one handler per request type, verified at
//!   startup)
//! - [`EventDispatcher`]: fans a domain event out to every listener
//!   registered for its kind (zero or more listeners, invoked concurrently)
//!
//! Both registries are built once at process start and are immutable and
//! safe for unsynchronized concurrent reads afterwards.

pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod registry;
pub mod request;
pub mod router;

pub use dispatcher::EventDispatcher;
pub use error::{DispatchError, ListenerError, ListenerFailure, RegistryError};
pub use listener::EventListener;
pub use registry::{ListenerRegistry, ListenerRegistryBuilder};
pub use request::{Request, RequestHandler};
pub use router::{Router, RouterBuilder};
