//! Error types for the sumchat library.
//!
//! One enum per operation, mirroring the three entry points a caller can
//! invoke:
//!
//! * [`LoadError`] — document loading (`.txt` read, PDF extraction, type
//!   dispatch). Never caused by the network.
//! * [`SummarizeError`] — the summarization call.
//! * [`AskError`] — a conversation turn.
//!
//! All errors are terminal for the triggering call: there is no retry or
//! backoff, recovery is user-initiated (re-upload, retype, resend). The only
//! automatic corrective action in the whole crate is the single-turn rollback
//! performed by [`crate::chat::ask`] on failure.
//!
//! [`GenerateError`] is the wire-level error of [`crate::gemini::GeminiClient`];
//! it is folded into the two operation enums via `From` so callers only ever
//! see the operation-level taxonomy.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while turning a file into document text.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A PDF was selected but no PDF extraction backend is wired up.
    #[error("PDF support is not available in this loader.\nConstruct the loader with a PDF extractor to read .pdf files.")]
    ParserNotReady,

    /// The PDF backend failed (corrupt file, unsupported structure).
    #[error("Failed to extract text from PDF '{path}': {detail}\nThe file may be corrupted or image-only; try another PDF or a .txt file.")]
    ExtractionFailed { path: PathBuf, detail: String },

    /// Anything other than `.txt` or `.pdf`.
    #[error("Unsupported file type: '{path}'\nOnly .txt and .pdf files are accepted.")]
    UnsupportedType { path: PathBuf },

    /// The file could not be read from disk.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors produced by [`crate::summarize::summarize`].
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The document text is empty or whitespace-only. No request is made.
    #[error("Nothing to summarize: enter some content or load a document first.")]
    EmptyInput,

    /// No API key is configured. No request is made.
    #[error("No Gemini API key configured. Set GEMINI_API_KEY or pass --api-key.")]
    MissingCredential,

    /// The endpoint rejected the request or the transport failed.
    #[error("Failed to summarize: {0}")]
    ApiError(String),

    /// HTTP success but no usable candidate text in the response.
    #[error("No summary received from the API. Please try again.")]
    EmptyResponse,
}

/// Errors produced by [`crate::chat::ask`].
#[derive(Debug, Error)]
pub enum AskError {
    /// Questions are only meaningful once a summary exists.
    #[error("Generate a summary first before asking questions.")]
    NoSummary,

    /// The question is empty or whitespace-only. No request is made.
    #[error("Type a question about the summary.")]
    EmptyQuestion,

    /// No API key is configured. No request is made.
    #[error("No Gemini API key configured. Set GEMINI_API_KEY or pass --api-key.")]
    MissingCredential,

    /// The endpoint rejected the request or the transport failed.
    /// The optimistic user turn has already been rolled back.
    #[error("Failed to get answer: {0}")]
    ApiError(String),

    /// HTTP success but no usable candidate text in the response.
    /// The optimistic user turn has already been rolled back.
    #[error("No answer received from the API. Please try again.")]
    EmptyResponse,
}

/// Wire-level errors from the generateContent client.
///
/// Internal currency of [`crate::gemini`]; converted into
/// [`SummarizeError`] / [`AskError`] at the operation boundary.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The client holds no usable API key.
    #[error("missing API credential")]
    MissingCredential,

    /// Non-success HTTP status or transport failure. The message is the
    /// response body's `error.message` when one was parseable, otherwise a
    /// status- or transport-derived fallback.
    #[error("{0}")]
    Api(String),

    /// HTTP 200 but no candidates, no parts, or blank text.
    #[error("response contained no candidate text")]
    EmptyResponse,
}

impl From<GenerateError> for SummarizeError {
    fn from(e: GenerateError) -> Self {
        match e {
            GenerateError::MissingCredential => SummarizeError::MissingCredential,
            GenerateError::Api(msg) => SummarizeError::ApiError(msg),
            GenerateError::EmptyResponse => SummarizeError::EmptyResponse,
        }
    }
}

impl From<GenerateError> for AskError {
    fn from(e: GenerateError) -> Self {
        match e {
            GenerateError::MissingCredential => AskError::MissingCredential,
            GenerateError::Api(msg) => AskError::ApiError(msg),
            GenerateError::EmptyResponse => AskError::EmptyResponse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_display_names_the_file() {
        let e = LoadError::UnsupportedType {
            path: PathBuf::from("report.docx"),
        };
        let msg = e.to_string();
        assert!(msg.contains("report.docx"), "got: {msg}");
        assert!(msg.contains(".txt"), "got: {msg}");
    }

    #[test]
    fn extraction_failed_display_carries_detail() {
        let e = LoadError::ExtractionFailed {
            path: PathBuf::from("scan.pdf"),
            detail: "unexpected object stream".into(),
        };
        assert!(e.to_string().contains("unexpected object stream"));
    }

    #[test]
    fn api_error_message_is_surfaced_verbatim() {
        let e = SummarizeError::ApiError("API key not valid".into());
        assert!(e.to_string().contains("API key not valid"));
    }

    #[test]
    fn generate_error_maps_into_both_taxonomies() {
        let s: SummarizeError = GenerateError::Api("boom".into()).into();
        assert!(matches!(s, SummarizeError::ApiError(m) if m == "boom"));

        let a: AskError = GenerateError::EmptyResponse.into();
        assert!(matches!(a, AskError::EmptyResponse));

        let a: AskError = GenerateError::MissingCredential.into();
        assert!(matches!(a, AskError::MissingCredential));
    }
}
