//! Schema validation of extracted payloads
//!
//! The model reply is untrusted input: every field is checked explicitly
//! before it is read. Only two things are fatal here - a payload that is
//! not a JSON object, and a root without a usable `courseName` (the roadmap
//! has no identity without it). Everything else is an item-level defect:
//! the offending item is dropped and the defect recorded for the caller.

use serde_json::Value;

use super::error::PipelineError;
use super::types::{EventType, Priority, TaskCategory};

/// A structurally-typed but possibly-defective roadmap
///
/// Ids and dates are still raw strings here; the assembler repairs them.
#[derive(Debug)]
pub(crate) struct Draft {
    pub course_name: String,
    pub tasks: Vec<DraftTask>,
    pub study_guides: Vec<DraftGuide>,
    pub timeline: Vec<DraftEvent>,
    /// Ordered item-level defects collected during validation
    pub defects: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct DraftTask {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub priority: Priority,
    pub category: TaskCategory,
    pub subtasks: Vec<DraftSubtask>,
}

#[derive(Debug)]
pub(crate) struct DraftSubtask {
    pub id: Option<String>,
    pub title: String,
    pub completed: bool,
}

#[derive(Debug)]
pub(crate) struct DraftGuide {
    pub topic: String,
    pub content: String,
    pub related_tasks: Vec<String>,
}

#[derive(Debug)]
pub(crate) struct DraftEvent {
    pub id: Option<String>,
    pub title: String,
    pub date: Option<String>,
    pub event_type: EventType,
    pub task_id: Option<String>,
}

/// Parse and validate a candidate payload
pub(crate) fn validate_payload(payload: &str) -> Result<Draft, PipelineError> {
    let root: Value = serde_json::from_str(payload)
        .map_err(|e| PipelineError::Validation(format!("payload is not valid JSON: {e}")))?;

    let Some(obj) = root.as_object() else {
        return Err(PipelineError::Validation("payload root is not a JSON object".to_string()));
    };

    // Root identity is the one non-negotiable field
    let course_name = match obj.get("courseName").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            return Err(PipelineError::Validation(
                "missing or non-string courseName".to_string(),
            ));
        }
    };

    let mut defects = Vec::new();

    let tasks = collection(obj.get("tasks"), "tasks", &mut defects, validate_task);
    let study_guides = collection(obj.get("studyGuides"), "studyGuides", &mut defects, validate_guide);
    let timeline = collection(obj.get("timeline"), "timeline", &mut defects, validate_event);

    Ok(Draft {
        course_name,
        tasks,
        study_guides,
        timeline,
        defects,
    })
}

/// Validate a collection field: absent means empty, wrong type is a defect
fn collection<T>(
    value: Option<&Value>,
    field: &str,
    defects: &mut Vec<String>,
    validate_item: fn(usize, &Value, &mut Vec<String>) -> Option<T>,
) -> Vec<T> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| validate_item(idx, item, defects))
            .collect(),
        Some(_) => {
            defects.push(format!("{field} is not a sequence; treated as empty"));
            Vec::new()
        }
    }
}

fn validate_task(idx: usize, value: &Value, defects: &mut Vec<String>) -> Option<DraftTask> {
    let Some(obj) = value.as_object() else {
        defects.push(format!("task #{idx}: not an object; dropped"));
        return None;
    };

    let title = match obj.get("title").and_then(Value::as_str) {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => {
            defects.push(format!("task #{idx}: missing title; dropped"));
            return None;
        }
    };

    let priority = match enum_field::<Priority>(obj.get("priority"), "priority") {
        Ok(p) => p,
        Err(problem) => {
            defects.push(format!("task '{title}': {problem}; dropped"));
            return None;
        }
    };

    let category = match enum_field::<TaskCategory>(obj.get("category"), "category") {
        Ok(c) => c,
        Err(problem) => {
            defects.push(format!("task '{title}': {problem}; dropped"));
            return None;
        }
    };

    let description = optional_string(obj.get("description"), "description", &title, "task", defects);
    let due_date = optional_string(obj.get("dueDate"), "dueDate", &title, "task", defects);

    let subtasks = match obj.get("subtasks") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(sub_idx, item)| validate_subtask(&title, sub_idx, item, defects))
            .collect(),
        Some(_) => {
            defects.push(format!("task '{title}': subtasks is not a sequence; treated as empty"));
            Vec::new()
        }
    };

    Some(DraftTask {
        id: optional_string(obj.get("id"), "id", &title, "task", defects),
        title,
        description,
        due_date,
        priority,
        category,
        subtasks,
    })
}

fn validate_subtask(task_title: &str, idx: usize, value: &Value, defects: &mut Vec<String>) -> Option<DraftSubtask> {
    let Some(obj) = value.as_object() else {
        defects.push(format!("task '{task_title}': subtask #{idx} is not an object; dropped"));
        return None;
    };

    let title = match obj.get("title").and_then(Value::as_str) {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => {
            defects.push(format!("task '{task_title}': subtask #{idx} missing title; dropped"));
            return None;
        }
    };

    let completed = match obj.get("completed") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            defects.push(format!(
                "task '{task_title}': subtask '{title}' has non-boolean completed; defaulted to false"
            ));
            false
        }
    };

    Some(DraftSubtask {
        id: optional_string(obj.get("id"), "id", &title, "subtask", defects),
        title,
        completed,
    })
}

fn validate_guide(idx: usize, value: &Value, defects: &mut Vec<String>) -> Option<DraftGuide> {
    let Some(obj) = value.as_object() else {
        defects.push(format!("study guide #{idx}: not an object; dropped"));
        return None;
    };

    let topic = match obj.get("topic").and_then(Value::as_str) {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => {
            defects.push(format!("study guide #{idx}: missing topic; dropped"));
            return None;
        }
    };

    let Some(content) = obj.get("content").and_then(Value::as_str) else {
        defects.push(format!("study guide '{topic}': missing content; dropped"));
        return None;
    };

    let related_tasks = match obj.get("relatedTasks") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item.as_str() {
                Some(id) => Some(id.to_string()),
                None => {
                    defects.push(format!("study guide '{topic}': non-string task reference; dropped"));
                    None
                }
            })
            .collect(),
        Some(_) => {
            defects.push(format!(
                "study guide '{topic}': relatedTasks is not a sequence; treated as empty"
            ));
            Vec::new()
        }
    };

    Some(DraftGuide {
        topic,
        content: content.to_string(),
        related_tasks,
    })
}

fn validate_event(idx: usize, value: &Value, defects: &mut Vec<String>) -> Option<DraftEvent> {
    let Some(obj) = value.as_object() else {
        defects.push(format!("timeline event #{idx}: not an object; dropped"));
        return None;
    };

    let title = match obj.get("title").and_then(Value::as_str) {
        Some(t) if !t.trim().is_empty() => t.trim().to_string(),
        _ => {
            defects.push(format!("timeline event #{idx}: missing title; dropped"));
            return None;
        }
    };

    let event_type = match enum_field::<EventType>(obj.get("type"), "type") {
        Ok(t) => t,
        Err(problem) => {
            defects.push(format!("timeline event '{title}': {problem}; dropped"));
            return None;
        }
    };

    Some(DraftEvent {
        id: optional_string(obj.get("id"), "id", &title, "timeline event", defects),
        date: optional_string(obj.get("date"), "date", &title, "timeline event", defects),
        task_id: optional_string(obj.get("taskId"), "taskId", &title, "timeline event", defects),
        title,
        event_type,
    })
}

/// Parse a closed-enum field; unrecognized values are failures, never coerced
fn enum_field<T: std::str::FromStr>(value: Option<&Value>, field: &str) -> Result<T, String> {
    match value {
        Some(Value::String(s)) => s
            .parse::<T>()
            .map_err(|_| format!("unrecognized {field} value '{s}'")),
        Some(_) => Err(format!("non-string {field}")),
        None => Err(format!("missing {field}")),
    }
}

/// Read an optional string field, recording a defect (but keeping the item)
/// when it is present with the wrong type
fn optional_string(
    value: Option<&Value>,
    field: &str,
    title: &str,
    kind: &str,
    defects: &mut Vec<String>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(_) => {
            defects.push(format!("{kind} '{title}': non-string {field}; ignored"));
            None
        }
    }
}
