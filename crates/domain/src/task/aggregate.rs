//! Task aggregate implementation.

use chrono::{DateTime, Utc};
use common::TaskId;
use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateRoot, EventLog};

use super::{TaskDescription, TaskEvent, TaskTitle, UserId};

/// Task aggregate root.
///
/// A titled unit of work owned by the user who created it. State changes go
/// through the business methods below; each one records at most one domain
/// event and applies the idempotent no-op policy (a call that would not
/// change observable state records nothing).
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<TaskDescription>,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    created_by: UserId,
    modified_at: Option<DateTime<Utc>>,
    modified_by: Option<UserId>,
    deleted: bool,
    deleted_at: Option<DateTime<Utc>>,
    deleted_by: Option<UserId>,
    events: EventLog<TaskEvent>,
}

impl Task {
    /// Creates a new task, recording a Created event as the first log entry.
    ///
    /// This factory is the only way to bring a new aggregate into existence;
    /// the identifier stays unassigned until the first save.
    pub fn create(title: TaskTitle, description: Option<TaskDescription>, owner: UserId) -> Self {
        let mut task = Self {
            id: TaskId::unassigned(),
            title: title.clone(),
            description: description.clone(),
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
            created_by: owner.clone(),
            modified_at: None,
            modified_by: None,
            deleted: false,
            deleted_at: None,
            deleted_by: None,
            events: EventLog::new(),
        };
        task.events
            .record(TaskEvent::created(task.id, owner, title, description));
        task
    }
}

// Query methods
impl Task {
    /// Returns the task title.
    pub fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description, if any.
    pub fn description(&self) -> Option<&TaskDescription> {
        self.description.as_ref()
    }

    /// Returns true if the task has been completed.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns when the task was completed.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns when the task was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the user who created the task.
    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Returns when the task was last modified.
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    /// Returns true if the task has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

// Business methods
impl Task {
    /// Replaces the title and description.
    ///
    /// Records an Updated event only when either field actually changes.
    pub fn update(
        &mut self,
        title: TaskTitle,
        description: Option<TaskDescription>,
        user: UserId,
    ) {
        let changed = self.title != title || self.description != description;
        if !changed {
            return;
        }

        self.title = title;
        self.description = description;
        self.touch(user.clone());
        self.events.record(TaskEvent::updated(
            self.id,
            user,
            self.title.clone(),
            self.description.clone(),
        ));
    }

    /// Marks the task completed. No-op if already completed.
    pub fn complete(&mut self, user: UserId) {
        if self.completed {
            return;
        }

        let completed_at = Utc::now();
        self.completed = true;
        self.completed_at = Some(completed_at);
        self.touch(user.clone());
        self.events.record(TaskEvent::completed(
            self.id,
            user,
            self.title.clone(),
            completed_at,
        ));
    }

    /// Reopens a completed task. No-op if the task is still open.
    pub fn reopen(&mut self, user: UserId) {
        if !self.completed {
            return;
        }

        self.completed = false;
        self.completed_at = None;
        self.touch(user.clone());
        self.events
            .record(TaskEvent::reopened(self.id, user, self.title.clone()));
    }

    /// Soft-deletes the task. No-op if already deleted.
    pub fn delete(&mut self, user: UserId) {
        if self.deleted {
            return;
        }

        self.deleted = true;
        self.deleted_at = Some(Utc::now());
        self.deleted_by = Some(user.clone());
        self.events
            .record(TaskEvent::deleted(self.id, user, self.title.clone()));
    }

    fn touch(&mut self, user: UserId) {
        self.modified_at = Some(Utc::now());
        self.modified_by = Some(user);
    }
}

impl AggregateRoot for Task {
    type Id = TaskId;
    type Event = TaskEvent;

    fn id(&self) -> TaskId {
        self.id
    }

    fn assign_id(&mut self, id: TaskId) {
        self.id = id;
    }

    fn uncommitted_events(&self) -> &[TaskEvent] {
        self.events.as_slice()
    }

    fn clear_uncommitted_events(&mut self) {
        self.events.clear();
    }
}

/// Two tasks are equal iff both carry an assigned identifier and the
/// identifiers match; unsaved aggregates are never equal to anything.
impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id.is_assigned() && other.id.is_assigned() && self.id == other.id
    }
}

/// Persisted field capture of a task, used by repositories to materialize
/// the aggregate without going through the event-recording factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub title: TaskTitle,
    pub description: Option<TaskDescription>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub created_by: UserId,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<UserId>,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<UserId>,
}

impl Task {
    /// Captures the current persistent state (the event log is not part of
    /// persisted state).
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            completed: self.completed,
            completed_at: self.completed_at,
            created_at: self.created_at,
            created_by: self.created_by.clone(),
            modified_at: self.modified_at,
            modified_by: self.modified_by.clone(),
            deleted: self.deleted,
            deleted_at: self.deleted_at,
            deleted_by: self.deleted_by.clone(),
        }
    }

    /// Materializes a task from persisted state with an empty event log.
    pub fn from_snapshot(snapshot: TaskSnapshot) -> Self {
        Self {
            id: snapshot.id,
            title: snapshot.title,
            description: snapshot.description,
            completed: snapshot.completed,
            completed_at: snapshot.completed_at,
            created_at: snapshot.created_at,
            created_by: snapshot.created_by,
            modified_at: snapshot.modified_at,
            modified_by: snapshot.modified_by,
            deleted: snapshot.deleted,
            deleted_at: snapshot.deleted_at,
            deleted_by: snapshot.deleted_by,
            events: EventLog::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DomainEvent;

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    fn title(value: &str) -> TaskTitle {
        TaskTitle::new(value).unwrap()
    }

    fn new_task() -> Task {
        Task::create(title("Buy milk"), None, user())
    }

    #[test]
    fn create_records_exactly_one_created_event() {
        let task = new_task();

        assert_eq!(task.uncommitted_events().len(), 1);
        assert_eq!(task.uncommitted_events()[0].event_type(), "TaskCreated");
        assert!(!task.is_completed());
        assert!(!task.id().is_assigned());
    }

    #[test]
    fn complete_records_event_once() {
        let mut task = new_task();
        task.clear_uncommitted_events();

        task.complete(user());
        task.complete(user());

        assert_eq!(task.uncommitted_events().len(), 1);
        assert_eq!(task.uncommitted_events()[0].event_type(), "TaskCompleted");
        assert!(task.is_completed());
        assert!(task.completed_at().is_some());
    }

    #[test]
    fn reopen_open_task_is_noop() {
        let mut task = new_task();
        task.clear_uncommitted_events();

        task.reopen(user());

        assert!(task.uncommitted_events().is_empty());
        assert!(!task.is_completed());
    }

    #[test]
    fn reopen_after_complete_records_event() {
        let mut task = new_task();
        task.complete(user());
        task.clear_uncommitted_events();

        task.reopen(user());

        assert_eq!(task.uncommitted_events().len(), 1);
        assert_eq!(task.uncommitted_events()[0].event_type(), "TaskReopened");
        assert!(!task.is_completed());
        assert!(task.completed_at().is_none());
    }

    #[test]
    fn update_with_identical_values_records_nothing() {
        let mut task = new_task();
        task.clear_uncommitted_events();

        task.update(title("Buy milk"), None, user());

        assert!(task.uncommitted_events().is_empty());
        assert!(task.modified_at().is_none());
    }

    #[test]
    fn update_with_new_title_records_event() {
        let mut task = new_task();
        task.clear_uncommitted_events();

        task.update(title("Buy bread"), None, user());

        assert_eq!(task.uncommitted_events().len(), 1);
        assert_eq!(task.uncommitted_events()[0].event_type(), "TaskUpdated");
        assert_eq!(task.title().as_str(), "Buy bread");
        assert!(task.modified_at().is_some());
    }

    #[test]
    fn update_with_new_description_records_event() {
        let mut task = new_task();
        task.clear_uncommitted_events();

        let description = TaskDescription::new("2 liters").unwrap();
        task.update(title("Buy milk"), Some(description.clone()), user());

        assert_eq!(task.uncommitted_events().len(), 1);
        assert_eq!(task.description(), Some(&description));
    }

    #[test]
    fn delete_is_idempotent() {
        let mut task = new_task();
        task.clear_uncommitted_events();

        task.delete(user());
        task.delete(user());

        assert_eq!(task.uncommitted_events().len(), 1);
        assert_eq!(task.uncommitted_events()[0].event_type(), "TaskDeleted");
        assert!(task.is_deleted());
    }

    #[test]
    fn events_accumulate_in_recording_order() {
        let mut task = new_task();

        task.update(title("Buy oat milk"), None, user());
        task.complete(user());

        let types: Vec<_> = task
            .uncommitted_events()
            .iter()
            .map(|e| e.event_type())
            .collect();
        assert_eq!(types, ["TaskCreated", "TaskUpdated", "TaskCompleted"]);
    }

    #[test]
    fn equality_requires_assigned_matching_ids() {
        let mut a = new_task();
        let mut b = new_task();

        // unsaved aggregates are never equal
        assert_ne!(a, b);

        a.assign_id(TaskId::new(1));
        b.assign_id(TaskId::new(1));
        assert_eq!(a, b);

        b.assign_id(TaskId::new(2));
        assert_ne!(a, b);
    }

    #[test]
    fn snapshot_roundtrip_preserves_state_and_empties_log() {
        let mut task = new_task();
        task.assign_id(TaskId::new(9));
        task.complete(user());

        let restored = Task::from_snapshot(task.snapshot());

        assert_eq!(restored.id(), TaskId::new(9));
        assert_eq!(restored.title().as_str(), "Buy milk");
        assert!(restored.is_completed());
        assert!(restored.uncommitted_events().is_empty());
    }
}
