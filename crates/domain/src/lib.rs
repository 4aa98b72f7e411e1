//! Domain layer for the task backend.
//!
//! This crate provides the core domain abstractions:
//! - [`AggregateRoot`] and [`DomainEvent`] traits with the uncommitted event log
//! - Self-validating value objects with explicit fallible constructors
//! - The [`Task`] aggregate with its closed event union

pub mod aggregate;
pub mod error;
pub mod task;

pub use aggregate::{AggregateRoot, DomainEvent, EventLog};
pub use error::ValidationError;
pub use task::{
    Task, TaskCompletedData, TaskCreatedData, TaskDeletedData, TaskDescription, TaskEvent,
    TaskEventKind, TaskReopenedData, TaskSnapshot, TaskTitle, TaskUpdatedData, UserId,
};
