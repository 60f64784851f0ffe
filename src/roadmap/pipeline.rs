//! The extraction pipeline
//!
//! Strictly linear: instruction -> completion call -> payload extraction ->
//! schema validation -> repair/assembly. The completion call is the only
//! suspension point; the pipeline holds no mutable state across
//! invocations, so one pipeline can serve concurrent callers. Dropping the
//! returned future cancels the in-flight service call.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::llm::{CompletionRequest, LlmClient, Message, StopReason, TokenUsage};

use super::assemble::assemble;
use super::error::PipelineError;
use super::extract::extract_payload;
use super::prompt;
use super::types::Roadmap;
use super::validate::validate_payload;

/// Initial backoff delay for transient-error retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Pipeline retry/repair configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Completion attempts per instruction (transient failures only)
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Whether an unusable reply earns one corrective re-invocation
    #[serde(rename = "corrective-retry")]
    pub corrective_retry: bool,

    /// Token budget requested per completion
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            corrective_retry: true,
            max_tokens: 4096,
        }
    }
}

/// A successful pipeline run: the roadmap plus everything repaired along
/// the way
#[derive(Debug, Clone)]
pub struct RoadmapResult {
    pub roadmap: Roadmap,
    /// Ordered repair warnings; empty when the reply was clean
    pub warnings: Vec<String>,
    /// Combined token usage across all completion calls made
    pub usage: TokenUsage,
}

/// Syllabus -> roadmap extraction pipeline
pub struct RoadmapPipeline {
    llm: Arc<dyn LlmClient>,
    config: PipelineConfig,
}

impl RoadmapPipeline {
    /// Create a pipeline around an explicitly-passed completion client
    pub fn new(llm: Arc<dyn LlmClient>, config: PipelineConfig) -> Self {
        Self { llm, config }
    }

    /// Generate a roadmap from syllabus source text
    pub async fn generate(&self, source_text: &str) -> Result<RoadmapResult, PipelineError> {
        let instruction = prompt::build_instruction(source_text);
        let (reply, mut usage) = self.complete_with_backoff(&instruction).await?;

        match interpret(&reply) {
            Ok((roadmap, warnings)) => {
                info!(
                    tasks = roadmap.tasks.len(),
                    study_guides = roadmap.study_guides.len(),
                    timeline = roadmap.timeline.len(),
                    warnings = warnings.len(),
                    "roadmap assembled"
                );
                Ok(RoadmapResult {
                    roadmap,
                    warnings,
                    usage,
                })
            }
            Err(err) if self.config.corrective_retry && err.is_payload_defect() => {
                // Deterministic failure: re-running against the same reply
                // cannot help, but one fresh completion carrying the defects
                // as feedback might.
                warn!(error = %err, "reply unusable, attempting corrective re-invocation");
                let feedback = prompt::corrective_instruction(source_text, &reply, &err.to_string());
                let (second_reply, second_usage) = self.complete_with_backoff(&feedback).await?;
                usage.merge(second_usage);

                let (roadmap, mut warnings) = interpret(&second_reply)?;
                warnings.insert(0, format!("initial reply was unusable and was regenerated: {err}"));
                Ok(RoadmapResult {
                    roadmap,
                    warnings,
                    usage,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Send one instruction, retrying transient service failures with
    /// bounded exponential backoff
    async fn complete_with_backoff(&self, instruction: &str) -> Result<(String, TokenUsage), PipelineError> {
        let request = CompletionRequest {
            system_prompt: prompt::SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(instruction)],
            max_tokens: self.config.max_tokens,
        };

        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.llm.complete(request.clone()).await {
                Ok(response) => {
                    if response.stop_reason == StopReason::MaxTokens {
                        warn!("reply was truncated at the token budget");
                    }
                    let usage = response.usage;
                    let text = match response.content {
                        Some(text) if !text.trim().is_empty() => text,
                        _ => return Err(crate::llm::LlmError::EmptyResponse.into()),
                    };
                    debug!(attempt, reply_chars = text.len(), "completion received");
                    return Ok((text, usage));
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let backoff = e
                        .retry_after()
                        .unwrap_or_else(|| Duration::from_millis(INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1)));
                    warn!(
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "completion failed with transient error, backing off"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// The deterministic tail of the pipeline: extract, validate, assemble
fn interpret(reply: &str) -> Result<(Roadmap, Vec<String>), PipelineError> {
    let payload = extract_payload(reply)?;
    let draft = validate_payload(&payload)?;
    assemble(draft)
}
