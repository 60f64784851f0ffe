//! Roadmapper - syllabus to semester roadmap extraction
//!
//! Turns unstructured course syllabus text into a structured semester
//! roadmap (tasks, subtasks, study guides, a chronological timeline) by
//! delegating extraction to a hosted completion service and hardening its
//! free-form reply into a validated, internally-consistent data structure.
//!
//! # Core Guarantees
//!
//! - **Untrusted replies**: the model reply is validated field by field
//!   before anything is read from it; nothing is blindly cast
//! - **Repair over rejection**: per-item problems (bad date, dangling
//!   reference, missing id) are repaired or dropped with a warning; only a
//!   roadmap with no identity or no content at all is rejected
//! - **Typed failures**: every fatal outcome is a distinct error kind, so
//!   callers can tell "try again later" from "fix your input"
//!
//! # Modules
//!
//! - [`roadmap`] - the extraction pipeline and domain types
//! - [`llm`] - completion service client trait and Anthropic implementation
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod llm;
pub mod roadmap;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, LlmClient, LlmError, TokenUsage, create_client};
pub use roadmap::{
    EventType, PipelineConfig, PipelineError, Priority, Roadmap, RoadmapPipeline, RoadmapResult, StudyGuide, Subtask,
    Task, TaskCategory, TimelineEvent,
};
