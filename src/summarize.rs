//! Summarization: one generateContent call over the loaded document.
//!
//! Intentionally thin — the prompt text and sampling policy live in
//! [`crate::prompts`], the wire handling in [`crate::gemini`]. What remains
//! here is the session contract:
//!
//! * preconditions (non-blank document, present credential) are checked
//!   before any network I/O;
//! * a successful summary invalidates the previous conversation in the same
//!   step it is stored, so stale turns can never refer to a newer summary;
//! * a failure records its message on the session verbatim and changes
//!   nothing else.

use crate::error::SummarizeError;
use crate::gemini::{Content, GeminiClient, GenerationConfig, Part};
use crate::prompts;
use crate::session::Session;
use tracing::info;

/// Summarize the session's document text.
///
/// On success the trimmed summary replaces `session.summary` and the turn
/// log, pending question and answer error are reset. The document text is
/// never modified.
///
/// # Errors
/// * [`SummarizeError::EmptyInput`] — blank document; no request is made.
/// * [`SummarizeError::MissingCredential`] — no API key; no request is made.
/// * [`SummarizeError::ApiError`] / [`SummarizeError::EmptyResponse`] — the
///   call failed; the message is recorded in `session.summary_error`.
pub async fn summarize(
    session: &mut Session,
    client: &GeminiClient,
) -> Result<String, SummarizeError> {
    session.summary_error = None;

    if session.document_text.trim().is_empty() {
        return Err(fail(session, SummarizeError::EmptyInput));
    }
    if !client.has_credential() {
        return Err(fail(session, SummarizeError::MissingCredential));
    }

    let contents = vec![Content::user(vec![
        Part::text(prompts::SUMMARIZE_INSTRUCTION),
        Part::text(prompts::summarize_request_text(&session.document_text)),
    ])];
    let config = GenerationConfig {
        max_output_tokens: prompts::SUMMARY_MAX_OUTPUT_TOKENS,
        temperature: prompts::SUMMARY_TEMPERATURE,
    };

    match client.generate(contents, config).await {
        Ok(summary) => {
            // A fresh summary makes any prior conversation stale: both are
            // replaced in the same step.
            session.turns.clear();
            session.pending_question.clear();
            session.answer_error = None;
            session.summary = Some(summary.clone());
            info!(summary_len = summary.len(), "document summarized");
            Ok(summary)
        }
        Err(e) => Err(fail(session, e.into())),
    }
}

/// Record the error message on the session, then hand the error back.
fn fail(session: &mut Session, err: SummarizeError) -> SummarizeError {
    session.summary_error = Some(err.to_string());
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_document_fails_without_credential_check() {
        // Even with no credential configured, EmptyInput wins: the document
        // check comes first, as it did for the user-facing flow.
        let client = GeminiClient::new("");
        let mut session = Session::new();
        session.document_text = "   \n\t ".into();

        let err = summarize(&mut session, &client).await.unwrap_err();

        assert!(matches!(err, SummarizeError::EmptyInput));
        assert!(session.summary_error.is_some());
        assert!(session.summary.is_none());
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        let client = GeminiClient::new("").with_base_url("http://127.0.0.1:1");
        let mut session = Session::new();
        session.document_text = "some content".into();

        let err = summarize(&mut session, &client).await.unwrap_err();

        assert!(matches!(err, SummarizeError::MissingCredential));
        assert_eq!(session.document_text, "some content");
    }
}
