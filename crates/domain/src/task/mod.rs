//! Task aggregate and related types.

mod aggregate;
mod events;
mod value_objects;

pub use aggregate::{Task, TaskSnapshot};
pub use events::{
    TaskCompletedData, TaskCreatedData, TaskDeletedData, TaskEvent, TaskEventKind,
    TaskReopenedData, TaskUpdatedData,
};
pub use value_objects::{TaskDescription, TaskTitle, UserId};
