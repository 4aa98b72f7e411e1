//! Event listeners wired at startup.

use async_trait::async_trait;
use domain::TaskEvent;
use mediator::{EventListener, ListenerError};
use tokio_util::sync::CancellationToken;

/// Writes a structured log line for every task event.
pub struct ActivityLogger;

#[async_trait]
impl EventListener<TaskEvent> for ActivityLogger {
    fn name(&self) -> &'static str {
        "activity-logger"
    }

    async fn on_event(
        &self,
        event: &TaskEvent,
        _cancel: &CancellationToken,
    ) -> Result<(), ListenerError> {
        match event {
            TaskEvent::Created(data) => {
                tracing::info!(task_id = %data.task_id, user = %data.user_id, title = %data.title, "task created");
            }
            TaskEvent::Updated(data) => {
                tracing::info!(task_id = %data.task_id, user = %data.user_id, title = %data.title, "task updated");
            }
            TaskEvent::Completed(data) => {
                tracing::info!(task_id = %data.task_id, user = %data.user_id, title = %data.title, completed_at = %data.completed_at, "task completed");
            }
            TaskEvent::Reopened(data) => {
                tracing::info!(task_id = %data.task_id, user = %data.user_id, title = %data.title, "task reopened");
            }
            TaskEvent::Deleted(data) => {
                tracing::info!(task_id = %data.task_id, user = %data.user_id, title = %data.title, "task deleted");
            }
        }
        Ok(())
    }
}

/// Counts completions for the metrics endpoint.
pub struct CompletionMetrics;

#[async_trait]
impl EventListener<TaskEvent> for CompletionMetrics {
    fn name(&self) -> &'static str {
        "completion-metrics"
    }

    async fn on_event(
        &self,
        event: &TaskEvent,
        _cancel: &CancellationToken,
    ) -> Result<(), ListenerError> {
        if let TaskEvent::Completed(_) = event {
            metrics::counter!("tasks_completed").increment(1);
        }
        Ok(())
    }
}
