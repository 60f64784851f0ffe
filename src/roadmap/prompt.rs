//! Instruction building for the extraction call
//!
//! Pure string rendering, no I/O. The JSON contract rendered here and the
//! serde shapes in [`super::types`] must stay in lockstep.

/// System prompt for the extraction call
pub const SYSTEM_PROMPT: &str = "You are an academic planning assistant. You analyze course \
syllabi and produce comprehensive, actionable semester roadmaps as JSON.";

/// The output contract: the exact JSON structure the model must return
const OUTPUT_CONTRACT: &str = r#"{
  "courseName": "string",
  "tasks": [
    {
      "id": "unique-id",
      "title": "string",
      "description": "string",
      "dueDate": "YYYY-MM-DD",
      "priority": "high" | "medium" | "low",
      "category": "assignment" | "exam" | "reading",
      "subtasks": [
        {
          "id": "unique-id",
          "title": "string",
          "completed": false
        }
      ]
    }
  ],
  "studyGuides": [
    {
      "topic": "string",
      "content": "string (detailed study guide content)",
      "relatedTasks": ["task-id-1", "task-id-2"]
    }
  ],
  "timeline": [
    {
      "id": "unique-id",
      "title": "string",
      "date": "YYYY-MM-DD",
      "type": "assignment" | "exam" | "reading" | "milestone",
      "taskId": "task-id (optional)"
    }
  ]
}"#;

/// Render the extraction instruction for a syllabus
///
/// Embeds the source text verbatim plus the full output contract.
/// Deterministic: the same source text always yields the same instruction.
pub fn build_instruction(source_text: &str) -> String {
    format!(
        "Analyze the following syllabus and create a comprehensive semester roadmap.\n\
        \n\
        SYLLABUS:\n\
        {source_text}\n\
        \n\
        Please extract and structure the following information:\n\
        \n\
        1. Course name\n\
        2. All assignments, exams, and readings with their due dates\n\
        3. Prioritize tasks based on deadlines and importance\n\
        4. Create study guides for major topics/units\n\
        5. Generate a timeline with key milestones\n\
        \n\
        Return your response as a JSON object matching this exact structure:\n\
        {OUTPUT_CONTRACT}\n\
        \n\
        Be thorough and create actionable subtasks for each major assignment or exam. \
        Generate study guides for all major topics covered in the course."
    )
}

/// Render the follow-up instruction for the single corrective re-invocation
///
/// Carries the defective reply and what was wrong with it so the model can
/// produce a corrected payload.
pub fn corrective_instruction(source_text: &str, defective_reply: &str, problem: &str) -> String {
    format!(
        "Your previous response to the roadmap extraction request could not be used.\n\
        \n\
        Problem: {problem}\n\
        \n\
        Your previous response was:\n\
        {defective_reply}\n\
        \n\
        The original syllabus was:\n\
        {source_text}\n\
        \n\
        Return ONLY a corrected JSON object matching this exact structure, with no \
        surrounding prose:\n\
        {OUTPUT_CONTRACT}"
    )
}
