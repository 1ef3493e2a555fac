//! Conversation manager: grounded question/answer turns over the summary.
//!
//! Each call to [`ask`] replays the entire turn log to the endpoint in
//! order, mapped to `user`/`model` roles. Only the newest message — the
//! question being asked — is rewritten through the grounding template,
//! which re-embeds the current summary verbatim on every turn. Earlier
//! turns travel with their original, unwrapped text, so the conversation
//! context accumulates naturally while the grounding context stays fresh.
//!
//! The user turn is appended optimistically, before the request is issued:
//! the caller's view shows the question immediately regardless of network
//! latency. If the call then fails — transport fault, API error, or an
//! empty reply — exactly that one turn is removed again before the error is
//! surfaced, so the log never carries an unanswered question that would
//! block retyping.

use crate::error::AskError;
use crate::gemini::{Content, GeminiClient, GenerationConfig, Part};
use crate::prompts;
use crate::session::{Session, Speaker, Turn};
use tracing::{debug, info};

/// Ask a question about the session's summary.
///
/// On success the answer (trimmed) is appended as an assistant turn and
/// returned; the turn log has grown by exactly two entries. On failure the
/// log is exactly as it was before the call.
///
/// # Errors
/// * [`AskError::NoSummary`] / [`AskError::EmptyQuestion`] /
///   [`AskError::MissingCredential`] — precondition failures; nothing is
///   sent and the turn log is untouched.
/// * [`AskError::ApiError`] / [`AskError::EmptyResponse`] — the call
///   failed; the optimistic user turn has been rolled back and the message
///   recorded in `session.answer_error`.
pub async fn ask(
    session: &mut Session,
    client: &GeminiClient,
    question: &str,
) -> Result<String, AskError> {
    session.answer_error = None;

    let summary = match session.summary.as_deref() {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => return Err(fail(session, AskError::NoSummary)),
    };
    if question.trim().is_empty() {
        return Err(fail(session, AskError::EmptyQuestion));
    }
    if !client.has_credential() {
        return Err(fail(session, AskError::MissingCredential));
    }

    // Optimistic update: the raw question enters the log and the draft is
    // cleared before the request is even built.
    let len_before = session.turns.len();
    session.turns.push(Turn::user(question));
    session.pending_question.clear();

    let contents = build_contents(&session.turns, &summary, question);
    let config = GenerationConfig {
        max_output_tokens: prompts::ANSWER_MAX_OUTPUT_TOKENS,
        temperature: prompts::ANSWER_TEMPERATURE,
    };

    debug!(turns = session.turns.len(), "asking grounded question");

    match client.generate(contents, config).await {
        Ok(answer) => {
            session.turns.push(Turn::assistant(answer.clone()));
            info!(answer_len = answer.len(), "question answered");
            Ok(answer)
        }
        Err(e) => {
            rollback(session, len_before);
            Err(fail(session, e.into()))
        }
    }
}

/// Map the turn log to wire messages, wrapping only the final question in
/// the grounding template.
fn build_contents(turns: &[Turn], summary: &str, question: &str) -> Vec<Content> {
    let mut contents: Vec<Content> = turns
        .iter()
        .map(|turn| match turn.speaker {
            Speaker::User => Content::user(vec![Part::text(turn.text.as_str())]),
            Speaker::Assistant => Content::model(vec![Part::text(turn.text.as_str())]),
        })
        .collect();

    // The last message is always the question appended by this call.
    if let Some(last) = contents.last_mut() {
        last.parts = vec![Part::text(prompts::grounded_question(summary, question))];
    }

    contents
}

/// Remove the optimistic user turn appended by this call — and only that.
///
/// The pop is guarded on the log still ending with exactly the turn this
/// call appended; anything else means the log is not in the state this call
/// left it in, and removing someone else's turn would be worse than leaving
/// the log alone.
fn rollback(session: &mut Session, len_before: usize) {
    let is_own_optimistic_turn = session.turns.len() == len_before + 1
        && session
            .turns
            .last()
            .is_some_and(|t| t.speaker == Speaker::User);
    if is_own_optimistic_turn {
        session.turns.pop();
    }
}

/// Record the error message on the session, then hand the error back.
fn fail(session: &mut Session, err: AskError) -> AskError {
    session.answer_error = Some(err.to_string());
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_summary() -> Session {
        let mut s = Session::new();
        s.document_text = "doc".into();
        s.summary = Some("X is broken, fix: restart.".into());
        s
    }

    #[tokio::test]
    async fn no_summary_is_rejected_before_any_append() {
        let client = GeminiClient::new("AIzaTest");
        let mut session = Session::new();
        session.pending_question = "draft".into();

        let err = ask(&mut session, &client, "anything?").await.unwrap_err();

        assert!(matches!(err, AskError::NoSummary));
        assert!(session.turns.is_empty());
        // Precondition failures never touch the draft.
        assert_eq!(session.pending_question, "draft");
    }

    #[tokio::test]
    async fn blank_question_is_rejected() {
        let client = GeminiClient::new("AIzaTest");
        let mut session = session_with_summary();

        let err = ask(&mut session, &client, "  \n ").await.unwrap_err();

        assert!(matches!(err, AskError::EmptyQuestion));
        assert!(session.turns.is_empty());
    }

    #[tokio::test]
    async fn missing_credential_is_rejected_before_the_optimistic_append() {
        let client = GeminiClient::new("").with_base_url("http://127.0.0.1:1");
        let mut session = session_with_summary();

        let err = ask(&mut session, &client, "why?").await.unwrap_err();

        assert!(matches!(err, AskError::MissingCredential));
        assert!(session.turns.is_empty());
        assert!(session.answer_error.is_some());
    }

    #[test]
    fn only_the_final_message_carries_the_grounding_wrapper() {
        let turns = vec![
            Turn::user("first question"),
            Turn::assistant("first answer"),
            Turn::user("second question"),
        ];
        let contents = build_contents(&turns, "the summary", "second question");

        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[0].parts[0].text, "first question");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[1].parts[0].text, "first answer");
        assert_eq!(contents[2].role, "user");
        assert!(contents[2].parts[0].text.contains("the summary"));
        assert!(contents[2].parts[0].text.contains("second question"));
    }

    #[test]
    fn rollback_pops_only_its_own_user_turn() {
        let mut session = session_with_summary();
        session.turns.push(Turn::user("q"));
        rollback(&mut session, 0);
        assert!(session.turns.is_empty());

        // A log that does not end with this call's optimistic turn is left
        // alone rather than truncated.
        session.turns.push(Turn::user("q"));
        session.turns.push(Turn::assistant("a"));
        rollback(&mut session, 1);
        assert_eq!(session.turns.len(), 2);
    }
}
