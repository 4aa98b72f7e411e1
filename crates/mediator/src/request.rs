//! Request and handler traits for command/query dispatch.

use std::fmt::Debug;
use std::hash::Hash;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// An immutable request value: a command (state-changing intent) or a query
/// (read-only intent).
///
/// Each request type declares the registry tag it routes under via `KIND`.
/// Kinds must map one-to-one to request types; the router verifies at
/// startup that every kind of the closed set has exactly one handler.
pub trait Request: Send + 'static {
    /// The closed tag set this request routes under.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// The value a successful handler invocation produces.
    type Response: Send + 'static;

    /// The tag of this request type.
    const KIND: Self::Kind;
}

/// Handler for exactly one request type.
///
/// A handler performs the load → mutate → persist sequence and converts both
/// expected failures and unexpected conditions into the error type `E`;
/// nothing else crosses the router boundary.
#[async_trait]
pub trait RequestHandler<R, E>: Send + Sync
where
    R: Request,
    E: Send + 'static,
{
    /// Handles the request, observing the cancellation signal on every
    /// suspension point.
    async fn handle(&self, request: R, cancel: &CancellationToken) -> Result<R::Response, E>;
}
