//! Session state: one document, one summary, one conversation.
//!
//! [`Session`] is the single mutable unit of state for an active
//! document-plus-conversation. Every operation in this crate takes
//! `&mut Session`, which gives two guarantees for free:
//!
//! 1. **Exclusivity** — an async operation holds the borrow across its await
//!    points, so a second summarize/ask cannot start while one is in flight.
//!    This is the "single in-flight request" rule, enforced at compile time
//!    instead of by disabled buttons.
//! 2. **Atomic resets** — document, summary and conversation are coupled:
//!    loading new content invalidates the summary, and a fresh summary
//!    invalidates the conversation. The reset helpers here are the only code
//!    that clears this state, so a partial reset cannot be written by
//!    accident elsewhere.
//!
//! The invariant to keep in mind when touching this module: `turns` is only
//! ever non-empty while `summary` is `Some`.

use serde::{Deserialize, Serialize};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// One message in the conversation log.
///
/// Turns are append-only, with a single exception: a failed ask removes the
/// optimistic user turn it appended (see [`crate::chat::ask`]). Ordering is
/// significant — the sequence is replayed to the endpoint verbatim on every
/// new question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// The complete in-memory state for one active document + conversation.
///
/// Created once (per CLI run, per test) and threaded through
/// [`crate::loader::DocumentLoader::load`], [`crate::summarize::summarize`]
/// and [`crate::chat::ask`]. There is no persistence: the session lives and
/// dies with the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Raw extracted document text. Empty until a load or direct entry.
    pub document_text: String,

    /// The generated summary, once a summarize call has succeeded.
    pub summary: Option<String>,

    /// Ordered conversation log. Non-empty only while `summary` is set.
    pub turns: Vec<Turn>,

    /// In-progress question draft (cleared when the question is asked).
    pub pending_question: String,

    /// Last summarization error, surfaced verbatim to the user.
    pub summary_error: Option<String>,

    /// Last answering error, surfaced verbatim to the user.
    pub answer_error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a summary exists and questions can be asked.
    pub fn has_summary(&self) -> bool {
        self.summary.is_some()
    }

    /// Direct text entry: replaces the document and invalidates any prior
    /// summary and conversation in the same step.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.reset_conversation();
        self.document_text = text.into();
    }

    /// Empty the whole session: document text plus the conversation reset.
    ///
    /// Idempotent — clearing an already-empty session is a no-op.
    pub fn clear(&mut self) {
        self.reset_conversation();
        self.document_text.clear();
    }

    /// Drop everything derived from the current document: summary, turns,
    /// pending question and both error fields, in one step.
    ///
    /// This is the only reset primitive; loads, direct entry and clear all
    /// route through it so the coupling between document and conversation
    /// can never be partially applied.
    pub(crate) fn reset_conversation(&mut self) {
        self.summary = None;
        self.turns.clear();
        self.pending_question.clear();
        self.summary_error = None;
        self.answer_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_session() -> Session {
        let mut s = Session::new();
        s.document_text = "router keeps rebooting".into();
        s.summary = Some("Restart fixes it.".into());
        s.turns.push(Turn::user("why?"));
        s.turns.push(Turn::assistant("Firmware bug."));
        s.pending_question = "half-typed".into();
        s.summary_error = Some("old error".into());
        s.answer_error = Some("old error".into());
        s
    }

    #[test]
    fn set_text_resets_conversation_but_keeps_new_document() {
        let mut s = populated_session();
        s.set_text("fresh content");

        assert_eq!(s.document_text, "fresh content");
        assert!(s.summary.is_none());
        assert!(s.turns.is_empty());
        assert!(s.pending_question.is_empty());
        assert!(s.summary_error.is_none());
        assert!(s.answer_error.is_none());
    }

    #[test]
    fn clear_empties_everything() {
        let mut s = populated_session();
        s.clear();

        assert!(s.document_text.is_empty());
        assert!(s.summary.is_none());
        assert!(s.turns.is_empty());
        assert!(s.pending_question.is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut once = populated_session();
        once.clear();

        let mut twice = populated_session();
        twice.clear();
        twice.clear();

        assert_eq!(
            serde_json::to_value(&once).unwrap(),
            serde_json::to_value(&twice).unwrap()
        );
    }

    #[test]
    fn speaker_serialises_lowercase() {
        let json = serde_json::to_string(&Turn::user("hi")).unwrap();
        assert!(json.contains(r#""speaker":"user""#), "got: {json}");
    }
}
