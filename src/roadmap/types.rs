//! Semester roadmap domain types
//!
//! These types double as the wire shape: the JSON the completion service is
//! asked to produce and the JSON the pipeline returns are the same
//! structure, so the serde attributes here and the contract in
//! [`super::prompt`] must stay in lockstep.

use serde::{Deserialize, Serialize};

/// The root structured result of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roadmap {
    pub course_name: String,
    pub tasks: Vec<Task>,
    pub study_guides: Vec<StudyGuide>,
    pub timeline: Vec<TimelineEvent>,
}

/// A dated course task (assignment, exam, or reading)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Canonical YYYY-MM-DD
    pub due_date: String,
    pub priority: Priority,
    pub category: TaskCategory,
    /// May be empty, never absent
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

/// A step within a task; `completed` is caller-owned state after delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Study guide for a major topic, optionally linked to tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGuide {
    pub topic: String,
    pub content: String,
    /// Each entry must name an id in the roadmap's `tasks`
    #[serde(default)]
    pub related_tasks: Vec<String>,
}

/// A dated entry in the chronological course timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    /// Canonical YYYY-MM-DD
    pub date: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Task category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Assignment,
    Exam,
    Reading,
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assignment => write!(f, "assignment"),
            Self::Exam => write!(f, "exam"),
            Self::Reading => write!(f, "reading"),
        }
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assignment" => Ok(Self::Assignment),
            "exam" => Ok(Self::Exam),
            "reading" => Ok(Self::Reading),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Timeline event type - the task categories plus standalone milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Assignment,
    Exam,
    Reading,
    Milestone,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assignment => write!(f, "assignment"),
            Self::Exam => write!(f, "exam"),
            Self::Reading => write!(f, "reading"),
            Self::Milestone => write!(f, "milestone"),
        }
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assignment" => Ok(Self::Assignment),
            "exam" => Ok(Self::Exam),
            "reading" => Ok(Self::Reading),
            "milestone" => Ok(Self::Milestone),
            _ => Err(format!("Unknown event type: {}", s)),
        }
    }
}
