//! # sumchat
//!
//! Summarize a document, then chat with the summary.
//!
//! ## What this crate does
//!
//! Point it at a `.txt` or `.pdf` file (or hand it raw text), and it makes
//! exactly two kinds of calls to the Gemini generateContent endpoint: one to
//! produce a concise, troubleshooting-focused summary, and one per follow-up
//! question. Answers are *grounded*: every question is wrapped in a template
//! that embeds the current summary verbatim and instructs the model to
//! answer only from it, stating inability when the summary lacks the
//! information.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document (.txt / .pdf / raw text)
//!  │
//!  ├─ 1. Load       read text, or extract PDF pages (spawn_blocking)
//!  ├─ 2. Summarize  one generateContent call, fixed instruction
//!  └─ 3. Ask        grounded Q&A turns, optimistic append + rollback
//! ```
//!
//! All state lives in one [`Session`] value that every operation takes by
//! `&mut` — which doubles as the concurrency model: at most one operation is
//! ever in flight per session, enforced by the borrow checker rather than by
//! flags.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sumchat::{ask, summarize, DocumentLoader, GeminiClient, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::from_env().expect("set GEMINI_API_KEY");
//!     let loader = DocumentLoader::new();
//!     let mut session = Session::new();
//!
//!     loader.load(&mut session, "runbook.pdf".as_ref()).await?;
//!     let summary = summarize(&mut session, &client).await?;
//!     println!("{summary}");
//!
//!     let answer = ask(&mut session, &client, "How do I fix the router?").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `sumchat` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! sumchat = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod chat;
pub mod error;
pub mod gemini;
pub mod loader;
pub mod prompts;
pub mod session;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use chat::ask;
pub use error::{AskError, GenerateError, LoadError, SummarizeError};
pub use gemini::{GeminiClient, DEFAULT_MODEL};
pub use loader::{DocumentLoader, PdfTextExtractor};
pub use session::{Session, Speaker, Turn};
pub use summarize::summarize;
