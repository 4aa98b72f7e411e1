//! Request router mapping each request kind to its single handler.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use strum::IntoEnumIterator;
use tokio_util::sync::CancellationToken;

use crate::error::RegistryError;
use crate::request::{Request, RequestHandler};

struct HandlerSlot {
    request_type: TypeId,
    request_name: &'static str,
    handler: Box<dyn Any + Send + Sync>,
}

/// Routes a request value to the one handler registered for its kind.
///
/// The binding between request kinds and handlers is established once at
/// process start through [`RouterBuilder`]; after `build` the router is
/// immutable and safe for unsynchronized concurrent reads.
pub struct Router<K, E> {
    handlers: HashMap<K, HandlerSlot>,
    _marker: PhantomData<fn() -> E>,
}

impl<K, E> Router<K, E>
where
    K: Copy + Eq + Hash + Debug + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Creates an empty router builder.
    pub fn builder() -> RouterBuilder<K, E> {
        RouterBuilder {
            entries: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Sends a request to its registered handler.
    ///
    /// The registry is verified complete at startup, so a missing or
    /// mismatched registration here is a wiring bug, not a runtime failure
    /// of the request itself.
    #[tracing::instrument(skip(self, request, cancel), fields(kind = ?R::KIND))]
    pub async fn send<R>(&self, request: R, cancel: &CancellationToken) -> Result<R::Response, E>
    where
        R: Request<Kind = K>,
    {
        let slot = self
            .handlers
            .get(&R::KIND)
            .unwrap_or_else(|| panic!("no handler registered for request kind {:?}", R::KIND));
        assert_eq!(
            slot.request_type,
            TypeId::of::<R>(),
            "request kind {:?} is registered for {}, not {}",
            R::KIND,
            slot.request_name,
            type_name::<R>(),
        );
        let handler = slot
            .handler
            .downcast_ref::<Box<dyn RequestHandler<R, E>>>()
            .unwrap_or_else(|| panic!("handler for request kind {:?} has the wrong type", R::KIND));
        handler.handle(request, cancel).await
    }
}

/// Builder collecting handler registrations at process start.
pub struct RouterBuilder<K, E> {
    entries: Vec<(K, HandlerSlot)>,
    _marker: PhantomData<fn() -> E>,
}

impl<K, E> RouterBuilder<K, E>
where
    K: Copy + Eq + Hash + Debug + Send + Sync + 'static,
    E: Send + 'static,
{
    /// Registers the handler for request type `R`.
    pub fn register<R, H>(mut self, handler: H) -> Self
    where
        R: Request<Kind = K>,
        H: RequestHandler<R, E> + 'static,
    {
        let boxed: Box<dyn RequestHandler<R, E>> = Box::new(handler);
        self.entries.push((
            R::KIND,
            HandlerSlot {
                request_type: TypeId::of::<R>(),
                request_name: type_name::<R>(),
                handler: Box::new(boxed),
            },
        ));
        self
    }

    /// Verifies the registrations against the closed kind set and builds the
    /// router.
    ///
    /// Fails if any kind is registered twice or has no registration at all;
    /// both are startup configuration errors.
    pub fn build(self) -> Result<Router<K, E>, RegistryError>
    where
        K: IntoEnumIterator,
    {
        let mut handlers = HashMap::new();
        for (kind, slot) in self.entries {
            if handlers.insert(kind, slot).is_some() {
                return Err(RegistryError::DuplicateHandler {
                    kind: format!("{kind:?}"),
                });
            }
        }
        for kind in K::iter() {
            if !handlers.contains_key(&kind) {
                return Err(RegistryError::MissingHandler {
                    kind: format!("{kind:?}"),
                });
            }
        }
        Ok(Router {
            handlers,
            _marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use strum::EnumIter;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
    enum TestKind {
        Ping,
        Echo,
    }

    struct Ping;

    impl Request for Ping {
        type Kind = TestKind;
        type Response = &'static str;
        const KIND: TestKind = TestKind::Ping;
    }

    struct Echo(String);

    impl Request for Echo {
        type Kind = TestKind;
        type Response = String;
        const KIND: TestKind = TestKind::Echo;
    }

    struct PingHandler;

    #[async_trait]
    impl RequestHandler<Ping, String> for PingHandler {
        async fn handle(&self, _request: Ping, _cancel: &CancellationToken) -> Result<&'static str, String> {
            Ok("pong")
        }
    }

    struct EchoHandler;

    #[async_trait]
    impl RequestHandler<Echo, String> for EchoHandler {
        async fn handle(&self, request: Echo, _cancel: &CancellationToken) -> Result<String, String> {
            if request.0.is_empty() {
                Err("nothing to echo".to_string())
            } else {
                Ok(request.0)
            }
        }
    }

    fn full_router() -> Router<TestKind, String> {
        Router::builder()
            .register::<Ping, _>(PingHandler)
            .register::<Echo, _>(EchoHandler)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn send_routes_to_the_registered_handler() {
        let router = full_router();
        let cancel = CancellationToken::new();

        let response = router.send(Ping, &cancel).await.unwrap();
        assert_eq!(response, "pong");

        let response = router.send(Echo("hello".to_string()), &cancel).await.unwrap();
        assert_eq!(response, "hello");
    }

    #[tokio::test]
    async fn handler_failures_surface_as_errors() {
        let router = full_router();
        let cancel = CancellationToken::new();

        let result = router.send(Echo(String::new()), &cancel).await;
        assert_eq!(result, Err("nothing to echo".to_string()));
    }

    #[test]
    fn missing_registration_fails_build() {
        let result = Router::<TestKind, String>::builder()
            .register::<Ping, _>(PingHandler)
            .build();

        assert!(matches!(
            result,
            Err(RegistryError::MissingHandler { kind }) if kind == "Echo"
        ));
    }

    #[test]
    fn duplicate_registration_fails_build() {
        let result = Router::<TestKind, String>::builder()
            .register::<Ping, _>(PingHandler)
            .register::<Ping, _>(PingHandler)
            .register::<Echo, _>(EchoHandler)
            .build();

        assert!(matches!(
            result,
            Err(RegistryError::DuplicateHandler { kind }) if kind == "Ping"
        ));
    }

    #[test]
    fn complete_router_reports_handler_count() {
        assert_eq!(full_router().handler_count(), 2);
    }
}
