//! Read-only queries and their handlers.
//!
//! Queries go straight to the repository port: no aggregate mutation, no
//! unit of work, no events.

use std::sync::Arc;

use async_trait::async_trait;
use common::TaskId;
use domain::UserId;
use mediator::{Request, RequestHandler};
use storage::{StatusFilter, TaskCounts, TaskRepository};
use tokio_util::sync::CancellationToken;

use crate::dto::{Page, TaskDto};
use crate::error::{AppError, AppResult};
use crate::requests::RequestKind;

const TASK_NOT_FOUND: &str = "task not found or access denied";

/// Fetch a single task by id.
#[derive(Debug, Clone)]
pub struct GetTask {
    pub id: TaskId,
    pub user_id: String,
}

impl Request for GetTask {
    type Kind = RequestKind;
    type Response = TaskDto;
    const KIND: RequestKind = RequestKind::GetTask;
}

pub struct GetTaskHandler<S> {
    store: Arc<S>,
}

impl<S> GetTaskHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> RequestHandler<GetTask, AppError> for GetTaskHandler<S>
where
    S: TaskRepository + 'static,
{
    #[tracing::instrument(skip_all, fields(task_id = %request.id))]
    async fn handle(&self, request: GetTask, cancel: &CancellationToken) -> AppResult<TaskDto> {
        let user = UserId::new(request.user_id)?;
        let task = self
            .store
            .load_for_user(request.id, &user, cancel)
            .await?
            .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.to_string()))?;
        Ok(TaskDto::from(&task))
    }
}

/// List a user's tasks, optionally filtered by completion status.
#[derive(Debug, Clone)]
pub struct ListTasks {
    pub user_id: String,
    pub filter: StatusFilter,
}

impl Request for ListTasks {
    type Kind = RequestKind;
    type Response = Vec<TaskDto>;
    const KIND: RequestKind = RequestKind::ListTasks;
}

pub struct ListTasksHandler<S> {
    store: Arc<S>,
}

impl<S> ListTasksHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> RequestHandler<ListTasks, AppError> for ListTasksHandler<S>
where
    S: TaskRepository + 'static,
{
    #[tracing::instrument(skip_all)]
    async fn handle(&self, request: ListTasks, cancel: &CancellationToken) -> AppResult<Vec<TaskDto>> {
        let user = UserId::new(request.user_id)?;
        let tasks = self
            .store
            .list_for_user(&user, request.filter, cancel)
            .await?;
        Ok(tasks.iter().map(TaskDto::from).collect())
    }
}

/// Fetch one page of a user's tasks.
#[derive(Debug, Clone)]
pub struct PagedTasks {
    pub user_id: String,
    pub page: usize,
    pub page_size: usize,
}

impl Request for PagedTasks {
    type Kind = RequestKind;
    type Response = Page<TaskDto>;
    const KIND: RequestKind = RequestKind::PagedTasks;
}

pub struct PagedTasksHandler<S> {
    store: Arc<S>,
}

impl<S> PagedTasksHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> RequestHandler<PagedTasks, AppError> for PagedTasksHandler<S>
where
    S: TaskRepository + 'static,
{
    #[tracing::instrument(skip_all, fields(page = request.page, page_size = request.page_size))]
    async fn handle(
        &self,
        request: PagedTasks,
        cancel: &CancellationToken,
    ) -> AppResult<Page<TaskDto>> {
        if request.page == 0 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        if request.page_size == 0 {
            return Err(AppError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }

        let user = UserId::new(request.user_id)?;
        let (tasks, total) = self
            .store
            .page_for_user(&user, request.page, request.page_size, cancel)
            .await?;
        let items = tasks.iter().map(TaskDto::from).collect();
        Ok(Page::new(items, total, request.page, request.page_size))
    }
}

/// Fetch total/completed/pending counts for a user.
#[derive(Debug, Clone)]
pub struct CountTasks {
    pub user_id: String,
}

impl Request for CountTasks {
    type Kind = RequestKind;
    type Response = TaskCounts;
    const KIND: RequestKind = RequestKind::CountTasks;
}

pub struct CountTasksHandler<S> {
    store: Arc<S>,
}

impl<S> CountTasksHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> RequestHandler<CountTasks, AppError> for CountTasksHandler<S>
where
    S: TaskRepository + 'static,
{
    #[tracing::instrument(skip_all)]
    async fn handle(&self, request: CountTasks, cancel: &CancellationToken) -> AppResult<TaskCounts> {
        let user = UserId::new(request.user_id)?;
        Ok(self.store.counts_for_user(&user, cancel).await?)
    }
}
