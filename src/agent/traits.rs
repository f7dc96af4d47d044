use futures::future::BoxFuture;

use crate::client::error::ClientError;
use super::types::{AgentRequest, AgentResponse};

/// External inference collaborator. `Agent::run` hands it the built
/// payload verbatim; implementations own transport concerns such as
/// timeouts and retries.
///
/// Note:
/// - We intentionally do not use `async_trait` here so that returned futures
///   can be annotated with the input lifetime `'a` and borrow the request
///   instead of cloning it.
pub trait InferenceBackend: Send + Sync {
    /// Produce a completion for the request. The returned future may borrow
    /// from `request`.
    fn complete<'a>(
        &'a self,
        request: &'a AgentRequest,
    ) -> BoxFuture<'a, Result<AgentResponse, ClientError>>;
}
