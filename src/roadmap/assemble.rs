//! Repair and assembly of the final roadmap
//!
//! Applies per-item repairs to a validated draft: replacement ids for
//! missing/empty/duplicate ids, date normalization, and referential
//! cleanup. Items that cannot be repaired are dropped with a warning.
//! Warnings are ordered and always returned with a successful roadmap.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::error::PipelineError;
use super::types::{Roadmap, StudyGuide, Subtask, Task, TimelineEvent};
use super::validate::Draft;

/// Date formats accepted for normalization, canonical form first
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Assemble a final roadmap from a draft, repairing what can be repaired
///
/// Fails only when the result would be unusable: a roadmap with no tasks,
/// no study guides, and no timeline events after repair.
pub(crate) fn assemble(draft: Draft) -> Result<(Roadmap, Vec<String>), PipelineError> {
    let mut warnings = draft.defects;

    let mut tasks = Vec::new();
    let mut task_ids: HashSet<String> = HashSet::new();
    for t in draft.tasks {
        let Some(raw_date) = t.due_date else {
            warnings.push(format!("task '{}' dropped: no due date", t.title));
            continue;
        };
        let Some(due_date) = normalize_date(&raw_date) else {
            warnings.push(format!("task '{}' dropped: unparsable due date '{raw_date}'", t.title));
            continue;
        };

        let id = claim_id(t.id, &mut task_ids, "task", &t.title, &mut warnings);

        let mut subtask_ids: HashSet<String> = HashSet::new();
        let subtasks = t
            .subtasks
            .into_iter()
            .map(|s| {
                let id = claim_id(s.id, &mut subtask_ids, "subtask", &s.title, &mut warnings);
                Subtask {
                    id,
                    title: s.title,
                    completed: s.completed,
                }
            })
            .collect();

        tasks.push(Task {
            id,
            title: t.title,
            description: t.description,
            due_date,
            priority: t.priority,
            category: t.category,
            subtasks,
        });
    }

    // Referential fields may only point at tasks that survived repair
    let known_tasks: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

    let mut study_guides = Vec::new();
    for g in draft.study_guides {
        let mut related_tasks = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for reference in g.related_tasks {
            if !known_tasks.contains(reference.as_str()) {
                warnings.push(format!(
                    "study guide '{}': removed dangling task reference '{reference}'",
                    g.topic
                ));
            } else if seen.insert(reference.clone()) {
                related_tasks.push(reference);
            }
        }
        study_guides.push(StudyGuide {
            topic: g.topic,
            content: g.content,
            related_tasks,
        });
    }

    let mut timeline = Vec::new();
    let mut event_ids: HashSet<String> = HashSet::new();
    for e in draft.timeline {
        let Some(raw_date) = e.date else {
            warnings.push(format!("timeline event '{}' dropped: no date", e.title));
            continue;
        };
        let Some(date) = normalize_date(&raw_date) else {
            warnings.push(format!(
                "timeline event '{}' dropped: unparsable date '{raw_date}'",
                e.title
            ));
            continue;
        };

        let task_id = match e.task_id {
            Some(reference) if !known_tasks.contains(reference.as_str()) => {
                warnings.push(format!(
                    "timeline event '{}': cleared dangling task reference '{reference}'",
                    e.title
                ));
                None
            }
            other => other,
        };

        let id = claim_id(e.id, &mut event_ids, "event", &e.title, &mut warnings);

        timeline.push(TimelineEvent {
            id,
            title: e.title,
            date,
            event_type: e.event_type,
            task_id,
        });
    }

    if tasks.is_empty() && study_guides.is_empty() && timeline.is_empty() {
        return Err(PipelineError::Validation(
            "extraction produced no usable tasks, study guides, or timeline events".to_string(),
        ));
    }

    Ok((
        Roadmap {
            course_name: draft.course_name,
            tasks,
            study_guides,
            timeline,
        },
        warnings,
    ))
}

/// Keep a supplied id if it is usable and unclaimed, otherwise generate a
/// fresh one and record a warning
fn claim_id(
    supplied: Option<String>,
    taken: &mut HashSet<String>,
    kind: &str,
    title: &str,
    warnings: &mut Vec<String>,
) -> String {
    let reason = match supplied {
        Some(id) if !id.is_empty() && !taken.contains(&id) => {
            taken.insert(id.clone());
            return id;
        }
        Some(id) => {
            if id.is_empty() {
                "empty id"
            } else {
                "duplicate id"
            }
        }
        None => "missing id",
    };

    let fresh = fresh_id(kind);
    warnings.push(format!("{kind} '{title}': {reason}, assigned '{fresh}'"));
    taken.insert(fresh.clone());
    fresh
}

/// Generate a replacement id: `{kind}-{8-char-hex}` from a v7 uuid
fn fresh_id(kind: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    format!("{}-{}", kind, &uuid.simple().to_string()[..8])
}

/// Normalize a date string to canonical YYYY-MM-DD
fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::types::{EventType, Priority, TaskCategory};
    use crate::roadmap::validate::{DraftEvent, DraftGuide, DraftSubtask, DraftTask};

    fn draft_task(id: Option<&str>, title: &str, due: Option<&str>) -> DraftTask {
        DraftTask {
            id: id.map(str::to_string),
            title: title.to_string(),
            description: None,
            due_date: due.map(str::to_string),
            priority: Priority::High,
            category: TaskCategory::Assignment,
            subtasks: vec![],
        }
    }

    fn empty_draft(name: &str) -> Draft {
        Draft {
            course_name: name.to_string(),
            tasks: vec![],
            study_guides: vec![],
            timeline: vec![],
            defects: vec![],
        }
    }

    #[test]
    fn test_clean_draft_has_no_warnings() {
        let mut draft = empty_draft("CS101");
        draft.tasks.push(draft_task(Some("t1"), "Homework 1", Some("2024-09-15")));

        let (roadmap, warnings) = assemble(draft).unwrap();
        assert_eq!(roadmap.tasks.len(), 1);
        assert_eq!(roadmap.tasks[0].id, "t1");
        assert_eq!(roadmap.tasks[0].due_date, "2024-09-15");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_duplicate_task_ids_both_kept_distinct() {
        let mut draft = empty_draft("CS101");
        draft.tasks.push(draft_task(Some("t1"), "Homework 1", Some("2024-09-15")));
        draft.tasks.push(draft_task(Some("t1"), "Homework 2", Some("2024-09-22")));

        let (roadmap, warnings) = assemble(draft).unwrap();
        assert_eq!(roadmap.tasks.len(), 2);
        assert_ne!(roadmap.tasks[0].id, roadmap.tasks[1].id);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("duplicate id"));
    }

    #[test]
    fn test_missing_and_empty_ids_generated() {
        let mut draft = empty_draft("CS101");
        draft.tasks.push(draft_task(None, "Homework 1", Some("2024-09-15")));
        draft.tasks.push(draft_task(Some(""), "Homework 2", Some("2024-09-22")));

        let (roadmap, warnings) = assemble(draft).unwrap();
        assert_eq!(roadmap.tasks.len(), 2);
        assert!(!roadmap.tasks[0].id.is_empty());
        assert!(!roadmap.tasks[1].id.is_empty());
        assert_ne!(roadmap.tasks[0].id, roadmap.tasks[1].id);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_unparsable_due_date_drops_task_with_warning() {
        let mut draft = empty_draft("CS101");
        draft.tasks.push(draft_task(Some("t1"), "Homework 1", Some("TBD")));
        draft.tasks.push(draft_task(Some("t2"), "Homework 2", Some("2024-09-22")));

        let (roadmap, warnings) = assemble(draft).unwrap();
        assert_eq!(roadmap.tasks.len(), 1);
        assert_eq!(roadmap.tasks[0].id, "t2");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("TBD"));
    }

    #[test]
    fn test_date_normalization_formats() {
        for (raw, expected) in [
            ("2024-09-15", "2024-09-15"),
            ("2024/09/15", "2024-09-15"),
            ("09/15/2024", "2024-09-15"),
            ("9/15/2024", "2024-09-15"),
            ("September 15, 2024", "2024-09-15"),
            ("Sep 15, 2024", "2024-09-15"),
            ("15 September 2024", "2024-09-15"),
            (" 2024-09-15 ", "2024-09-15"),
        ] {
            assert_eq!(normalize_date(raw).as_deref(), Some(expected), "format {raw:?}");
        }

        assert_eq!(normalize_date("TBD"), None);
        assert_eq!(normalize_date("next week"), None);
        assert_eq!(normalize_date("2024-13-40"), None);
    }

    #[test]
    fn test_dangling_guide_reference_removed_guide_kept() {
        let mut draft = empty_draft("CS101");
        draft.tasks.push(draft_task(Some("t1"), "Homework 1", Some("2024-09-15")));
        draft.study_guides.push(DraftGuide {
            topic: "Sorting".to_string(),
            content: "...".to_string(),
            related_tasks: vec!["t1".to_string(), "ghost".to_string()],
        });

        let (roadmap, warnings) = assemble(draft).unwrap();
        assert_eq!(roadmap.study_guides.len(), 1);
        assert_eq!(roadmap.study_guides[0].related_tasks, vec!["t1".to_string()]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("ghost"));
    }

    #[test]
    fn test_duplicate_guide_references_deduped() {
        let mut draft = empty_draft("CS101");
        draft.tasks.push(draft_task(Some("t1"), "Homework 1", Some("2024-09-15")));
        draft.study_guides.push(DraftGuide {
            topic: "Sorting".to_string(),
            content: "...".to_string(),
            related_tasks: vec!["t1".to_string(), "t1".to_string()],
        });

        let (roadmap, _) = assemble(draft).unwrap();
        assert_eq!(roadmap.study_guides[0].related_tasks, vec!["t1".to_string()]);
    }

    #[test]
    fn test_event_dangling_task_id_cleared() {
        let mut draft = empty_draft("CS101");
        draft.tasks.push(draft_task(Some("t1"), "Homework 1", Some("2024-09-15")));
        draft.timeline.push(DraftEvent {
            id: Some("e1".to_string()),
            title: "Homework 1 due".to_string(),
            date: Some("2024-09-15".to_string()),
            event_type: EventType::Assignment,
            task_id: Some("ghost".to_string()),
        });

        let (roadmap, warnings) = assemble(draft).unwrap();
        assert_eq!(roadmap.timeline.len(), 1);
        assert_eq!(roadmap.timeline[0].task_id, None);
        assert!(warnings.iter().any(|w| w.contains("ghost")));
    }

    #[test]
    fn test_event_with_bad_date_dropped() {
        let mut draft = empty_draft("CS101");
        draft.tasks.push(draft_task(Some("t1"), "Homework 1", Some("2024-09-15")));
        draft.timeline.push(DraftEvent {
            id: Some("e1".to_string()),
            title: "Sometime".to_string(),
            date: Some("eventually".to_string()),
            event_type: EventType::Milestone,
            task_id: None,
        });

        let (roadmap, warnings) = assemble(draft).unwrap();
        assert!(roadmap.timeline.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_subtask_ids_unique_within_parent() {
        let mut draft = empty_draft("CS101");
        let mut task = draft_task(Some("t1"), "Homework 1", Some("2024-09-15"));
        task.subtasks = vec![
            DraftSubtask {
                id: Some("s1".to_string()),
                title: "Part A".to_string(),
                completed: false,
            },
            DraftSubtask {
                id: Some("s1".to_string()),
                title: "Part B".to_string(),
                completed: true,
            },
        ];
        draft.tasks.push(task);

        let (roadmap, warnings) = assemble(draft).unwrap();
        let subtasks = &roadmap.tasks[0].subtasks;
        assert_eq!(subtasks.len(), 2);
        assert_ne!(subtasks[0].id, subtasks[1].id);
        assert!(subtasks[1].completed);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_empty_after_repair_is_fatal() {
        let mut draft = empty_draft("CS101");
        draft.tasks.push(draft_task(Some("t1"), "Homework 1", Some("TBD")));

        let result = assemble(draft);
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[test]
    fn test_validator_defects_carried_as_warnings() {
        let mut draft = empty_draft("CS101");
        draft.defects.push("task 'Bad': unrecognized priority value 'urgent'; dropped".to_string());
        draft.tasks.push(draft_task(Some("t1"), "Homework 1", Some("2024-09-15")));

        let (_, warnings) = assemble(draft).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("urgent"));
    }

    #[test]
    fn test_fresh_id_shape() {
        let id = fresh_id("task");
        assert!(id.starts_with("task-"));
        assert_eq!(id.len(), "task-".len() + 8);
    }
}
