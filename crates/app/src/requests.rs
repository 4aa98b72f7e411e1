//! The closed set of request kinds routed by the application.

use strum::EnumIter;

/// Registry tag for every command and query the backend accepts.
///
/// The router builder iterates this set at startup to verify that each kind
/// has exactly one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum RequestKind {
    CreateTask,
    UpdateTask,
    CompleteTask,
    ReopenTask,
    DeleteTask,
    GetTask,
    ListTasks,
    PagedTasks,
    CountTasks,
}
