//! End-to-end lifecycle tests for the task aggregate.

use common::TaskId;
use domain::{AggregateRoot, DomainEvent, Task, TaskDescription, TaskTitle, UserId};

fn user(value: &str) -> UserId {
    UserId::new(value).unwrap()
}

#[test]
fn full_lifecycle_records_one_event_per_transition() {
    let mut task = Task::create(
        TaskTitle::new("Write quarterly report").unwrap(),
        Some(TaskDescription::new("Q3 numbers").unwrap()),
        user("alice"),
    );

    task.update(
        TaskTitle::new("Write quarterly report").unwrap(),
        Some(TaskDescription::new("Q3 and Q4 numbers").unwrap()),
        user("alice"),
    );
    task.complete(user("alice"));
    task.reopen(user("bob"));
    task.complete(user("bob"));
    task.delete(user("alice"));

    let types: Vec<_> = task
        .uncommitted_events()
        .iter()
        .map(|e| e.event_type())
        .collect();
    assert_eq!(
        types,
        [
            "TaskCreated",
            "TaskUpdated",
            "TaskCompleted",
            "TaskReopened",
            "TaskCompleted",
            "TaskDeleted",
        ]
    );
}

#[test]
fn noop_calls_leave_the_log_untouched() {
    let mut task = Task::create(TaskTitle::new("Buy milk").unwrap(), None, user("alice"));
    task.clear_uncommitted_events();

    // Every call below would not change observable state.
    task.reopen(user("alice"));
    task.update(TaskTitle::new("Buy milk").unwrap(), None, user("alice"));
    task.complete(user("alice"));
    task.complete(user("alice"));

    // Only the first complete recorded anything.
    assert_eq!(task.uncommitted_events().len(), 1);
}

#[test]
fn flush_then_mutate_starts_a_fresh_log() {
    let mut task = Task::create(TaskTitle::new("Buy milk").unwrap(), None, user("alice"));
    task.assign_id(TaskId::new(1));
    task.clear_uncommitted_events();
    assert!(task.uncommitted_events().is_empty());

    task.complete(user("alice"));
    assert_eq!(task.uncommitted_events().len(), 1);
    assert_eq!(task.uncommitted_events()[0].event_type(), "TaskCompleted");
}

#[test]
fn events_capture_field_values_at_mutation_time() {
    let mut task = Task::create(TaskTitle::new("Buy milk").unwrap(), None, user("alice"));
    task.update(TaskTitle::new("Buy oat milk").unwrap(), None, user("alice"));

    match &task.uncommitted_events()[1] {
        domain::TaskEvent::Updated(data) => {
            assert_eq!(data.title.as_str(), "Buy oat milk");
            assert_eq!(data.user_id.as_str(), "alice");
        }
        other => panic!("expected Updated event, got {}", other.event_type()),
    }
}
