//! Pipeline error taxonomy
//!
//! Fatal failures only. Per-item problems (bad date, dangling reference,
//! missing id) are repaired or dropped during assembly and surface as
//! warnings on a successful result, never as errors.

use thiserror::Error;

use crate::llm::LlmError;

/// Maximum reply characters carried in an extraction error
const SNIPPET_MAX_CHARS: usize = 160;

/// A fatal pipeline failure
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or invalid credential/configuration. Detected before any
    /// network attempt; never retryable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The completion service call failed
    #[error("Completion service error: {0}")]
    Service(LlmError),

    /// No parseable payload could be located in the model reply
    #[error("Could not locate a payload in the model reply: {reason} (reply starts: {snippet:?})")]
    Extraction { reason: String, snippet: String },

    /// The payload parsed but the roadmap has no identity or no usable
    /// content after repair
    #[error("Roadmap validation failed: {0}")]
    Validation(String),
}

impl PipelineError {
    /// Build an extraction error carrying a bounded snippet of the reply
    pub(crate) fn extraction(reason: impl Into<String>, reply: &str) -> Self {
        PipelineError::Extraction {
            reason: reason.into(),
            snippet: snippet(reply),
        }
    }

    /// Coarse classification for boundary mapping (exit codes, statuses)
    pub fn classification(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => "configuration",
            PipelineError::Service(_) => "service",
            PipelineError::Extraction { .. } => "extraction",
            PipelineError::Validation(_) => "validation",
        }
    }

    /// Whether a caller could plausibly succeed by trying again later
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::Service(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// True when the failure came from the reply content itself: a fresh
    /// completion could fix it, re-running against the same reply cannot
    pub fn is_payload_defect(&self) -> bool {
        matches!(self, PipelineError::Extraction { .. } | PipelineError::Validation(_))
    }
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        match err {
            // Credential problems are configuration, not service weather
            LlmError::Config(msg) => PipelineError::Configuration(msg),
            other => PipelineError::Service(other),
        }
    }
}

/// Truncate a reply for diagnostics without splitting a char boundary
fn snippet(reply: &str) -> String {
    let trimmed = reply.trim();
    if trimmed.chars().count() <= SNIPPET_MAX_CHARS {
        trimmed.to_string()
    } else {
        let mut s: String = trimmed.chars().take(SNIPPET_MAX_CHARS).collect();
        s.push_str("...");
        s
    }
}
