//! Startup composition: registries built once, immutable afterwards.

use std::sync::Arc;

use domain::{TaskEvent, TaskEventKind};
use mediator::{
    EventDispatcher, EventListener, ListenerRegistry, RegistryError, Request, Router,
};
use storage::TaskRepository;
use tokio_util::sync::CancellationToken;

use crate::commands::{
    CompleteTask, CompleteTaskHandler, CreateTask, CreateTaskHandler, DeleteTask,
    DeleteTaskHandler, ReopenTask, ReopenTaskHandler, UpdateTask, UpdateTaskHandler,
};
use crate::error::AppError;
use crate::listeners::{ActivityLogger, CompletionMetrics};
use crate::queries::{
    CountTasks, CountTasksHandler, GetTask, GetTaskHandler, ListTasks, ListTasksHandler,
    PagedTasks, PagedTasksHandler,
};
use crate::requests::RequestKind;

/// Builds the default listener registry: activity logging on every event
/// kind plus completion metrics.
pub fn build_listener_registry() -> ListenerRegistry<TaskEvent> {
    let activity: Arc<dyn EventListener<TaskEvent>> = Arc::new(ActivityLogger);
    ListenerRegistry::builder()
        .on(TaskEventKind::Created, activity.clone())
        .on(TaskEventKind::Updated, activity.clone())
        .on(TaskEventKind::Completed, activity.clone())
        .on(TaskEventKind::Reopened, activity.clone())
        .on(TaskEventKind::Deleted, activity)
        .on(TaskEventKind::Completed, Arc::new(CompletionMetrics))
        .build()
}

/// Registers every command and query handler and verifies the registry
/// against the closed kind set.
pub fn build_router<S>(
    store: Arc<S>,
    dispatcher: Arc<EventDispatcher<TaskEvent>>,
) -> Result<Router<RequestKind, AppError>, RegistryError>
where
    S: TaskRepository + 'static,
{
    Router::builder()
        .register::<CreateTask, _>(CreateTaskHandler::new(store.clone(), dispatcher.clone()))
        .register::<UpdateTask, _>(UpdateTaskHandler::new(store.clone(), dispatcher.clone()))
        .register::<CompleteTask, _>(CompleteTaskHandler::new(store.clone(), dispatcher.clone()))
        .register::<ReopenTask, _>(ReopenTaskHandler::new(store.clone(), dispatcher.clone()))
        .register::<DeleteTask, _>(DeleteTaskHandler::new(store.clone(), dispatcher))
        .register::<GetTask, _>(GetTaskHandler::new(store.clone()))
        .register::<ListTasks, _>(ListTasksHandler::new(store.clone()))
        .register::<PagedTasks, _>(PagedTasksHandler::new(store.clone()))
        .register::<CountTasks, _>(CountTasksHandler::new(store))
        .build()
}

/// The wired application: one router and one event dispatcher over a store.
///
/// The presentation layer holds a single instance and sends request values
/// through it; both registries are read-only after construction.
pub struct Application {
    router: Router<RequestKind, AppError>,
    dispatcher: Arc<EventDispatcher<TaskEvent>>,
}

impl Application {
    /// Wires the application with the default listeners.
    pub fn bootstrap<S>(store: Arc<S>) -> Result<Self, RegistryError>
    where
        S: TaskRepository + 'static,
    {
        Self::with_registry(store, build_listener_registry())
    }

    /// Wires the application with a caller-provided listener registry.
    pub fn with_registry<S>(
        store: Arc<S>,
        registry: ListenerRegistry<TaskEvent>,
    ) -> Result<Self, RegistryError>
    where
        S: TaskRepository + 'static,
    {
        let dispatcher = Arc::new(EventDispatcher::new(registry));
        let router = build_router(store, dispatcher.clone())?;
        Ok(Self { router, dispatcher })
    }

    /// Returns the request router.
    pub fn router(&self) -> &Router<RequestKind, AppError> {
        &self.router
    }

    /// Returns the event dispatcher.
    pub fn dispatcher(&self) -> &Arc<EventDispatcher<TaskEvent>> {
        &self.dispatcher
    }

    /// Sends a request through the router.
    pub async fn send<R>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<R::Response, AppError>
    where
        R: Request<Kind = RequestKind>,
    {
        self.router.send(request, cancel).await
    }
}
