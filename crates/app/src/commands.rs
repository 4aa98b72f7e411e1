//! State-changing commands and their handlers.
//!
//! Each handler performs the load → mutate → persist sequence: it resolves
//! value objects from the raw request, loads the aggregate through the
//! user-scoped repository port, invokes the business method, and flushes
//! through a fresh unit of work. All expected failures come back as
//! [`AppError`] values.

use std::sync::Arc;

use async_trait::async_trait;
use common::TaskId;
use domain::{Task, TaskDescription, TaskEvent, TaskTitle, UserId};
use mediator::{EventDispatcher, Request, RequestHandler};
use storage::{TaskRepository, UnitOfWork};
use tokio_util::sync::CancellationToken;

use crate::dto::TaskDto;
use crate::error::{AppError, AppResult};
use crate::requests::RequestKind;

const TASK_NOT_FOUND: &str = "task not found or access denied";

fn parse_description(input: Option<String>) -> Result<Option<TaskDescription>, AppError> {
    match input {
        Some(value) if !value.trim().is_empty() => Ok(Some(TaskDescription::new(value)?)),
        _ => Ok(None),
    }
}

/// Create a new task for a user.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
}

impl Request for CreateTask {
    type Kind = RequestKind;
    type Response = TaskDto;
    const KIND: RequestKind = RequestKind::CreateTask;
}

pub struct CreateTaskHandler<S> {
    store: Arc<S>,
    dispatcher: Arc<EventDispatcher<TaskEvent>>,
}

impl<S> CreateTaskHandler<S> {
    pub fn new(store: Arc<S>, dispatcher: Arc<EventDispatcher<TaskEvent>>) -> Self {
        Self { store, dispatcher }
    }
}

#[async_trait]
impl<S> RequestHandler<CreateTask, AppError> for CreateTaskHandler<S>
where
    S: TaskRepository + 'static,
{
    #[tracing::instrument(skip_all)]
    async fn handle(&self, request: CreateTask, cancel: &CancellationToken) -> AppResult<TaskDto> {
        let owner = UserId::new(request.user_id)?;
        let title = TaskTitle::new(request.title)?;
        let description = parse_description(request.description)?;

        let mut task = Task::create(title, description, owner);
        let mut uow = UnitOfWork::new(self.store.clone(), self.dispatcher.clone());
        uow.save_changes(&mut task, cancel).await?;

        Ok(TaskDto::from(&task))
    }
}

/// Replace a task's title and description.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    pub id: TaskId,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
}

impl Request for UpdateTask {
    type Kind = RequestKind;
    type Response = TaskDto;
    const KIND: RequestKind = RequestKind::UpdateTask;
}

pub struct UpdateTaskHandler<S> {
    store: Arc<S>,
    dispatcher: Arc<EventDispatcher<TaskEvent>>,
}

impl<S> UpdateTaskHandler<S> {
    pub fn new(store: Arc<S>, dispatcher: Arc<EventDispatcher<TaskEvent>>) -> Self {
        Self { store, dispatcher }
    }
}

#[async_trait]
impl<S> RequestHandler<UpdateTask, AppError> for UpdateTaskHandler<S>
where
    S: TaskRepository + 'static,
{
    #[tracing::instrument(skip_all, fields(task_id = %request.id))]
    async fn handle(&self, request: UpdateTask, cancel: &CancellationToken) -> AppResult<TaskDto> {
        let user = UserId::new(request.user_id)?;
        let title = TaskTitle::new(request.title)?;
        let description = parse_description(request.description)?;

        let mut task = self
            .store
            .load_for_user(request.id, &user, cancel)
            .await?
            .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.to_string()))?;

        task.update(title, description, user);
        let mut uow = UnitOfWork::new(self.store.clone(), self.dispatcher.clone());
        uow.save_changes(&mut task, cancel).await?;

        Ok(TaskDto::from(&task))
    }
}

/// Mark a task completed.
#[derive(Debug, Clone)]
pub struct CompleteTask {
    pub id: TaskId,
    pub user_id: String,
}

impl Request for CompleteTask {
    type Kind = RequestKind;
    type Response = TaskDto;
    const KIND: RequestKind = RequestKind::CompleteTask;
}

pub struct CompleteTaskHandler<S> {
    store: Arc<S>,
    dispatcher: Arc<EventDispatcher<TaskEvent>>,
}

impl<S> CompleteTaskHandler<S> {
    pub fn new(store: Arc<S>, dispatcher: Arc<EventDispatcher<TaskEvent>>) -> Self {
        Self { store, dispatcher }
    }
}

#[async_trait]
impl<S> RequestHandler<CompleteTask, AppError> for CompleteTaskHandler<S>
where
    S: TaskRepository + 'static,
{
    #[tracing::instrument(skip_all, fields(task_id = %request.id))]
    async fn handle(&self, request: CompleteTask, cancel: &CancellationToken) -> AppResult<TaskDto> {
        let user = UserId::new(request.user_id)?;
        let mut task = self
            .store
            .load_for_user(request.id, &user, cancel)
            .await?
            .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.to_string()))?;

        task.complete(user);
        let mut uow = UnitOfWork::new(self.store.clone(), self.dispatcher.clone());
        uow.save_changes(&mut task, cancel).await?;

        Ok(TaskDto::from(&task))
    }
}

/// Reopen a completed task.
#[derive(Debug, Clone)]
pub struct ReopenTask {
    pub id: TaskId,
    pub user_id: String,
}

impl Request for ReopenTask {
    type Kind = RequestKind;
    type Response = TaskDto;
    const KIND: RequestKind = RequestKind::ReopenTask;
}

pub struct ReopenTaskHandler<S> {
    store: Arc<S>,
    dispatcher: Arc<EventDispatcher<TaskEvent>>,
}

impl<S> ReopenTaskHandler<S> {
    pub fn new(store: Arc<S>, dispatcher: Arc<EventDispatcher<TaskEvent>>) -> Self {
        Self { store, dispatcher }
    }
}

#[async_trait]
impl<S> RequestHandler<ReopenTask, AppError> for ReopenTaskHandler<S>
where
    S: TaskRepository + 'static,
{
    #[tracing::instrument(skip_all, fields(task_id = %request.id))]
    async fn handle(&self, request: ReopenTask, cancel: &CancellationToken) -> AppResult<TaskDto> {
        let user = UserId::new(request.user_id)?;
        let mut task = self
            .store
            .load_for_user(request.id, &user, cancel)
            .await?
            .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.to_string()))?;

        task.reopen(user);
        let mut uow = UnitOfWork::new(self.store.clone(), self.dispatcher.clone());
        uow.save_changes(&mut task, cancel).await?;

        Ok(TaskDto::from(&task))
    }
}

/// Soft-delete a task.
#[derive(Debug, Clone)]
pub struct DeleteTask {
    pub id: TaskId,
    pub user_id: String,
}

impl Request for DeleteTask {
    type Kind = RequestKind;
    type Response = bool;
    const KIND: RequestKind = RequestKind::DeleteTask;
}

pub struct DeleteTaskHandler<S> {
    store: Arc<S>,
    dispatcher: Arc<EventDispatcher<TaskEvent>>,
}

impl<S> DeleteTaskHandler<S> {
    pub fn new(store: Arc<S>, dispatcher: Arc<EventDispatcher<TaskEvent>>) -> Self {
        Self { store, dispatcher }
    }
}

#[async_trait]
impl<S> RequestHandler<DeleteTask, AppError> for DeleteTaskHandler<S>
where
    S: TaskRepository + 'static,
{
    #[tracing::instrument(skip_all, fields(task_id = %request.id))]
    async fn handle(&self, request: DeleteTask, cancel: &CancellationToken) -> AppResult<bool> {
        let user = UserId::new(request.user_id)?;
        let mut task = self
            .store
            .load_for_user(request.id, &user, cancel)
            .await?
            .ok_or_else(|| AppError::NotFound(TASK_NOT_FOUND.to_string()))?;

        task.delete(user);
        let mut uow = UnitOfWork::new(self.store.clone(), self.dispatcher.clone());
        uow.save_changes(&mut task, cancel).await?;

        Ok(true)
    }
}
