//! Document loading: turn a file into session document text.
//!
//! Two input shapes are accepted:
//!
//! * `.txt` — raw bytes decoded as UTF-8 (lossily, the way a browser text
//!   reader would) so a stray byte never blocks a whole document.
//! * `.pdf` — per-page text extraction through a [`PdfTextExtractor`]
//!   backend. Extraction is CPU-bound and runs on the blocking pool.
//!
//! Loading is coupled to the conversation: any load attempt, successful or
//! not, invalidates the previous summary and turn log (a new document makes
//! both stale). `document_text` itself is only replaced on success — a
//! failed extraction never leaves a half-populated document behind.
//!
//! The PDF backend sits behind a trait for two reasons: tests substitute a
//! deterministic extractor, and a loader built without one reports
//! [`LoadError::ParserNotReady`] instead of failing somewhere inside a PDF
//! library.

use crate::error::LoadError;
use crate::session::Session;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Per-page plain-text extraction from PDF bytes.
///
/// Implementations return one string per page, in page order starting at
/// page 1, with text fragments inside a page joined by single spaces.
pub trait PdfTextExtractor: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, String>;
}

/// Default backend: the `pdf-extract` crate.
#[derive(Debug, Default)]
pub struct PdfExtractBackend;

impl PdfTextExtractor for PdfExtractBackend {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, String> {
        pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| e.to_string())
    }
}

/// Loads documents into a [`Session`].
pub struct DocumentLoader {
    pdf: Option<Arc<dyn PdfTextExtractor>>,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader {
    /// Loader with the default `pdf-extract` backend.
    pub fn new() -> Self {
        Self {
            pdf: Some(Arc::new(PdfExtractBackend)),
        }
    }

    /// Loader that rejects PDFs with [`LoadError::ParserNotReady`].
    pub fn without_pdf_support() -> Self {
        Self { pdf: None }
    }

    /// Loader with an injected PDF backend.
    pub fn with_pdf_extractor(extractor: Arc<dyn PdfTextExtractor>) -> Self {
        Self {
            pdf: Some(extractor),
        }
    }

    /// Load a `.txt` or `.pdf` file into the session's document text.
    ///
    /// Every attempt — including failures — resets the summary, turn log,
    /// pending question and error fields first: the previous conversation
    /// was about the previous document. On failure `document_text` keeps
    /// its prior value.
    pub async fn load(&self, session: &mut Session, path: &Path) -> Result<(), LoadError> {
        session.reset_conversation();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|source| LoadError::ReadFailed {
                        path: path.to_path_buf(),
                        source,
                    })?;
                session.document_text = String::from_utf8_lossy(&bytes).into_owned();
                info!(
                    path = %path.display(),
                    chars = session.document_text.len(),
                    "loaded text document"
                );
                Ok(())
            }
            "pdf" => {
                // Readiness is checked before touching the file so the error
                // is about the missing backend, not the document.
                let extractor = self.pdf.as_ref().ok_or(LoadError::ParserNotReady)?;

                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|source| LoadError::ReadFailed {
                        path: path.to_path_buf(),
                        source,
                    })?;

                let extractor = Arc::clone(extractor);
                let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&bytes))
                    .await
                    .map_err(|e| LoadError::ExtractionFailed {
                        path: path.to_path_buf(),
                        detail: format!("extraction task failed: {e}"),
                    })?
                    .map_err(|detail| LoadError::ExtractionFailed {
                        path: path.to_path_buf(),
                        detail,
                    })?;

                debug!(path = %path.display(), pages = pages.len(), "extracted PDF pages");

                // Assembled off to the side, then swapped in whole: a fault
                // above has already returned and cannot leave partial text.
                let mut text = String::new();
                for page in &pages {
                    text.push_str(page);
                    text.push('\n');
                }
                session.document_text = text;
                info!(
                    path = %path.display(),
                    pages = pages.len(),
                    chars = session.document_text.len(),
                    "loaded PDF document"
                );
                Ok(())
            }
            _ => Err(LoadError::UnsupportedType {
                path: path.to_path_buf(),
            }),
        }
    }
}
