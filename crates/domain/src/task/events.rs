//! Task domain events.

use chrono::{DateTime, Utc};
use common::TaskId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{TaskDescription, TaskTitle, UserId};

/// Registry tag identifying a task event variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskEventKind {
    Created,
    Updated,
    Completed,
    Reopened,
    Deleted,
}

/// Events that can occur on a task aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TaskEvent {
    /// Task was created.
    Created(TaskCreatedData),

    /// Task title or description was changed.
    Updated(TaskUpdatedData),

    /// Task was marked completed.
    Completed(TaskCompletedData),

    /// A completed task was reopened.
    Reopened(TaskReopenedData),

    /// Task was soft-deleted.
    Deleted(TaskDeletedData),
}

impl DomainEvent for TaskEvent {
    type Kind = TaskEventKind;

    fn kind(&self) -> TaskEventKind {
        match self {
            TaskEvent::Created(_) => TaskEventKind::Created,
            TaskEvent::Updated(_) => TaskEventKind::Updated,
            TaskEvent::Completed(_) => TaskEventKind::Completed,
            TaskEvent::Reopened(_) => TaskEventKind::Reopened,
            TaskEvent::Deleted(_) => TaskEventKind::Deleted,
        }
    }

    fn event_type(&self) -> &'static str {
        match self {
            TaskEvent::Created(_) => "TaskCreated",
            TaskEvent::Updated(_) => "TaskUpdated",
            TaskEvent::Completed(_) => "TaskCompleted",
            TaskEvent::Reopened(_) => "TaskReopened",
            TaskEvent::Deleted(_) => "TaskDeleted",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            TaskEvent::Created(data) => data.occurred_at,
            TaskEvent::Updated(data) => data.occurred_at,
            TaskEvent::Completed(data) => data.occurred_at,
            TaskEvent::Reopened(data) => data.occurred_at,
            TaskEvent::Deleted(data) => data.occurred_at,
        }
    }
}

/// Data for the Created event.
///
/// The task id is captured at the moment of mutation; for a brand-new
/// aggregate this is the unassigned sentinel until the first save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreatedData {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub title: TaskTitle,
    pub description: Option<TaskDescription>,
    pub occurred_at: DateTime<Utc>,
}

/// Data for the Updated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskUpdatedData {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub title: TaskTitle,
    pub description: Option<TaskDescription>,
    pub occurred_at: DateTime<Utc>,
}

/// Data for the Completed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCompletedData {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub title: TaskTitle,
    pub completed_at: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

/// Data for the Reopened event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskReopenedData {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub title: TaskTitle,
    pub occurred_at: DateTime<Utc>,
}

/// Data for the Deleted event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDeletedData {
    pub task_id: TaskId,
    pub user_id: UserId,
    pub title: TaskTitle,
    pub occurred_at: DateTime<Utc>,
}

// Convenience constructors stamping the occurrence time.
impl TaskEvent {
    /// Creates a Created event.
    pub fn created(
        task_id: TaskId,
        user_id: UserId,
        title: TaskTitle,
        description: Option<TaskDescription>,
    ) -> Self {
        TaskEvent::Created(TaskCreatedData {
            task_id,
            user_id,
            title,
            description,
            occurred_at: Utc::now(),
        })
    }

    /// Creates an Updated event.
    pub fn updated(
        task_id: TaskId,
        user_id: UserId,
        title: TaskTitle,
        description: Option<TaskDescription>,
    ) -> Self {
        TaskEvent::Updated(TaskUpdatedData {
            task_id,
            user_id,
            title,
            description,
            occurred_at: Utc::now(),
        })
    }

    /// Creates a Completed event.
    pub fn completed(
        task_id: TaskId,
        user_id: UserId,
        title: TaskTitle,
        completed_at: DateTime<Utc>,
    ) -> Self {
        TaskEvent::Completed(TaskCompletedData {
            task_id,
            user_id,
            title,
            completed_at,
            occurred_at: Utc::now(),
        })
    }

    /// Creates a Reopened event.
    pub fn reopened(task_id: TaskId, user_id: UserId, title: TaskTitle) -> Self {
        TaskEvent::Reopened(TaskReopenedData {
            task_id,
            user_id,
            title,
            occurred_at: Utc::now(),
        })
    }

    /// Creates a Deleted event.
    pub fn deleted(task_id: TaskId, user_id: UserId, title: TaskTitle) -> Self {
        TaskEvent::Deleted(TaskDeletedData {
            task_id,
            user_id,
            title,
            occurred_at: Utc::now(),
        })
    }
}
