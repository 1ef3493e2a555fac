//! Fixed instructions and generation policy for both endpoint calls.
//!
//! Centralising every prompt and sampling constant here serves two purposes:
//!
//! 1. **Single source of truth** — the grounding contract ("answer only from
//!    the summary") is wording-sensitive; changing it requires editing
//!    exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the built prompt text
//!    directly without a live endpoint.
//!
//! The sampling values are deliberately not configurable: summaries use a
//! mildly creative temperature so the model compresses rather than quotes,
//! while answers run cold and short to stay extractive.

/// Fixed instruction sent as the first text part of every summarize request.
pub const SUMMARIZE_INSTRUCTION: &str = "You are a helpful assistant specialized in summarizing \
technical documentation. Summarize the following knowledge article concisely, highlighting key \
troubleshooting steps and resolutions. Focus on actionable advice.";

/// Maximum tokens the model may generate for a summary.
pub const SUMMARY_MAX_OUTPUT_TOKENS: u32 = 200;

/// Sampling temperature for summaries.
pub const SUMMARY_TEMPERATURE: f32 = 0.7;

/// Maximum tokens the model may generate for an answer.
pub const ANSWER_MAX_OUTPUT_TOKENS: u32 = 150;

/// Sampling temperature for answers. Lower than summaries: answers should be
/// factual extractions from the summary, not prose.
pub const ANSWER_TEMPERATURE: f32 = 0.2;

/// Build the second text part of a summarize request.
pub fn summarize_request_text(document: &str) -> String {
    format!("Summarize this knowledge article:\n\n{document}")
}

/// Wrap a question in the grounding template.
///
/// The summary is embedded verbatim and the model is told to answer only
/// from it, stating inability when the summary lacks the information. This
/// wrapper is applied to the newest question on every turn — earlier turns
/// replay in history with their original, unwrapped text — so the grounding
/// context is always fresh even as the conversation grows.
pub fn grounded_question(summary: &str, question: &str) -> String {
    format!(
        "Based ONLY on the following summary, answer the question. If the information is not in \
         the summary, state that you cannot answer based on the provided text.\n\n\
         Summary:\n\"{summary}\"\n\nQuestion: \"{question}\""
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grounded_question_embeds_summary_and_question_verbatim() {
        let text = grounded_question("X is broken, fix: restart.", "How do I fix X?");
        assert!(text.contains("X is broken, fix: restart."));
        assert!(text.contains("How do I fix X?"));
        assert!(text.contains("Based ONLY on the following summary"));
    }

    #[test]
    fn summarize_request_text_appends_document() {
        let text = summarize_request_text("article body");
        assert!(text.starts_with("Summarize this knowledge article:"));
        assert!(text.ends_with("article body"));
    }

    #[test]
    fn answers_run_colder_and_shorter_than_summaries() {
        assert!(ANSWER_TEMPERATURE < SUMMARY_TEMPERATURE);
        assert!(ANSWER_MAX_OUTPUT_TOKENS < SUMMARY_MAX_OUTPUT_TOKENS);
    }
}
