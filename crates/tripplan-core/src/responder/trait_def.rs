//! The `Responder` trait -- the seam between plan generation and a model
//! provider.

use async_trait::async_trait;

use super::types::{CompletionRequest, ResponderError};

/// Produces free text for a prompt.
///
/// Implementors wrap a specific provider API. A reply with no text content
/// is `Ok(None)`, not an error; the caller decides what an empty reply
/// means.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Human-readable name for this responder (e.g. "openai").
    fn name(&self) -> &str;

    /// Request a single completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<Option<String>, ResponderError>;
}

// Compile-time assertion: Responder must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Responder) {}
};
