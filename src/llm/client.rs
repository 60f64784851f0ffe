//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless completion client - each call is independent
///
/// This is the core abstraction for the completion service. Exactly one
/// request goes out per `complete` call: no internal retries, no streaming
/// accumulation. Retry policy belongs to the caller, which knows which
/// failures are transient. Dropping the returned future aborts the
/// in-flight request.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
