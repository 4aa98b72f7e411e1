//! Data transfer objects mapping aggregates for the presentation layer.

use chrono::{DateTime, Utc};
use common::TaskId;
use domain::{AggregateRoot, Task};
use serde::Serialize;

/// Flat projection of a task aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDto {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskDto {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().as_str().to_string(),
            description: task.description().map(|d| d.as_str().to_string()),
            completed: task.is_completed(),
            completed_at: task.completed_at(),
            created_at: task.created_at(),
            modified_at: task.modified_at(),
        }
    }
}

/// One page of a listing, with navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> Page<T> {
    /// Builds a page envelope from the items of a 1-based page.
    pub fn new(items: Vec<T>, total_count: usize, page: usize, page_size: usize) -> Self {
        let total_pages = total_count.div_ceil(page_size.max(1));
        Self {
            items,
            total_count,
            page,
            page_size,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}
