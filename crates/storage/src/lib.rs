//! Persistence ports and the unit of work.
//!
//! This crate owns the boundary between the domain and the store:
//! - [`Repository`] / [`TransactionControl`] ports implemented by concrete
//!   adapters (the in-memory store here; relational adapters live outside
//!   this workspace)
//! - [`UnitOfWork`], the transaction boundary that makes "persist state" and
//!   "flush events" succeed or fail together
//! - [`InMemoryTaskStore`] for tests and local composition

pub mod error;
pub mod memory;
pub mod repository;
pub mod unit_of_work;

pub use error::{StorageError, UnitOfWorkError};
pub use memory::InMemoryTaskStore;
pub use repository::{Repository, StatusFilter, TaskCounts, TaskRepository, TransactionControl};
pub use unit_of_work::{UnitOfWork, UnitOfWorkState, UnitOfWorkStore};
