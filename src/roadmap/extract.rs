//! Payload recovery from raw model replies
//!
//! Replies may be bare JSON, JSON inside a fenced code block (with or
//! without a language tag), or JSON buried in explanatory prose. The
//! extractor isolates the candidate payload string; it does not parse it.

use super::error::PipelineError;

/// Recover the candidate payload from a raw reply
///
/// Fence delimiters are stripped wherever they appear rather than assuming
/// the fence spans the whole reply. Idempotent: extracting an already
/// extracted payload returns it unchanged.
pub(crate) fn extract_payload(reply: &str) -> Result<String, PipelineError> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::extraction("reply is empty", reply));
    }

    let stripped = strip_fences(trimmed);
    let candidate = stripped.trim();

    if candidate.is_empty() {
        return Err(PipelineError::extraction("fence markers contained no payload", reply));
    }

    if candidate.starts_with('{') && candidate.ends_with('}') {
        return Ok(candidate.to_string());
    }

    // Payload embedded in prose: take the outermost object braces
    match (candidate.find('{'), candidate.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(candidate[start..=end].to_string()),
        _ => Err(PipelineError::extraction("no JSON object delimiters found", reply)),
    }
}

/// Remove fence delimiters (``` plus an optional language tag) wherever
/// they appear in the text
fn strip_fences(text: &str) -> String {
    const FENCE: &str = "```";

    if !text.contains(FENCE) {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + FENCE.len()..];
        // Opening markers may carry a language tag; drop it with the marker
        let tag_len: usize = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .map(|c| c.len_utf8())
            .sum();
        rest = &rest[tag_len..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{"courseName":"CS101","tasks":[]}"#;

    #[test]
    fn test_raw_payload() {
        assert_eq!(extract_payload(PAYLOAD).unwrap(), PAYLOAD);
    }

    #[test]
    fn test_tagged_fence() {
        let reply = format!("```json\n{PAYLOAD}\n```");
        assert_eq!(extract_payload(&reply).unwrap(), PAYLOAD);
    }

    #[test]
    fn test_untagged_fence() {
        let reply = format!("```\n{PAYLOAD}\n```");
        assert_eq!(extract_payload(&reply).unwrap(), PAYLOAD);
    }

    #[test]
    fn test_all_fencing_variants_agree() {
        let raw = extract_payload(PAYLOAD).unwrap();
        let tagged = extract_payload(&format!("```json\n{PAYLOAD}\n```")).unwrap();
        let untagged = extract_payload(&format!("```\n{PAYLOAD}\n```")).unwrap();
        assert_eq!(raw, tagged);
        assert_eq!(tagged, untagged);
    }

    #[test]
    fn test_fence_wrapped_in_prose() {
        let reply = format!("Here is your roadmap:\n\n```json\n{PAYLOAD}\n```\n\nLet me know if it helps!");
        assert_eq!(extract_payload(&reply).unwrap(), PAYLOAD);
    }

    #[test]
    fn test_bare_payload_in_prose() {
        let reply = format!("Here is the JSON you asked for: {PAYLOAD} Hope that works.");
        assert_eq!(extract_payload(&reply).unwrap(), PAYLOAD);
    }

    #[test]
    fn test_leading_trailing_whitespace() {
        let reply = format!("\n\n   {PAYLOAD}   \n");
        assert_eq!(extract_payload(&reply).unwrap(), PAYLOAD);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let reply = format!("```json\n{PAYLOAD}\n```");
        let once = extract_payload(&reply).unwrap();
        let twice = extract_payload(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_fence_fails() {
        let result = extract_payload("```json\n```");
        assert!(matches!(result, Err(PipelineError::Extraction { .. })));
    }

    #[test]
    fn test_prose_only_reply_fails() {
        let result = extract_payload("Sorry, I cannot process this.");
        match result {
            Err(PipelineError::Extraction { snippet, .. }) => {
                assert!(snippet.contains("Sorry"));
            }
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_reply_fails() {
        assert!(matches!(
            extract_payload("   \n  "),
            Err(PipelineError::Extraction { .. })
        ));
    }

    #[test]
    fn test_strip_fences_leaves_plain_text_alone() {
        assert_eq!(strip_fences("no fences here"), "no fences here");
    }
}
