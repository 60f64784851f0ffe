//! Syllabus -> semester roadmap extraction
//!
//! The pipeline is strictly linear:
//!
//! ```text
//! source text -> prompt -> completion service -> extract -> validate -> assemble
//! ```
//!
//! [`prompt`] renders the instruction, [`RoadmapPipeline`] drives the
//! completion call, and the private extract/validate/assemble stages turn
//! the raw reply into a [`Roadmap`] or a typed [`PipelineError`].

mod assemble;
mod error;
mod extract;
pub mod prompt;
mod pipeline;
mod types;
mod validate;

pub use error::PipelineError;
pub use pipeline::{PipelineConfig, RoadmapPipeline, RoadmapResult};
pub use prompt::build_instruction;
pub use types::{EventType, Priority, Roadmap, StudyGuide, Subtask, Task, TaskCategory, TimelineEvent};
