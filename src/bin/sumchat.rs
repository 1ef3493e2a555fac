//! CLI binary for sumchat.
//!
//! A thin shim over the library crate: load a document, summarize it, then
//! answer questions — from `--question` flags or an interactive stdin loop.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use sumchat::{ask, summarize, DocumentLoader, GeminiClient, Session};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Summarize a document and chat about it interactively
  sumchat runbook.pdf

  # Summarize only
  sumchat notes.txt --summary-only

  # Paste the document on stdin, ask scripted questions
  cat incident.txt | sumchat -q "What was the root cause?" -q "How was it fixed?"

  # Machine-readable transcript of the whole exchange
  sumchat runbook.pdf -q "Which service restarts?" --json > transcript.json

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY   Google Gemini API key (required)
  SUMCHAT_MODEL    Override the model ID (default: gemini-2.0-flash)

SETUP:
  1. Get an API key from https://aistudio.google.com/apikey
  2. export GEMINI_API_KEY=AIza...
  3. sumchat document.pdf
"#;

/// Summarize a document and chat with the summary.
#[derive(Parser, Debug)]
#[command(
    name = "sumchat",
    version,
    about = "Summarize .txt/.pdf documents and ask grounded follow-up questions",
    long_about = "Summarize a plain-text or PDF document with the Gemini API, then ask \
follow-up questions that are answered strictly from the generated summary. \
With no INPUT the document is read from stdin.",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to a .txt or .pdf document. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Model ID.
    #[arg(long, env = "SUMCHAT_MODEL", default_value = sumchat::DEFAULT_MODEL)]
    model: String,

    /// Print the summary and exit without entering the question loop.
    #[arg(long)]
    summary_only: bool,

    /// Ask a question non-interactively (repeatable, asked in order).
    #[arg(short, long = "question")]
    questions: Vec<String>,

    /// Print the final session (document, summary, turns) as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all decoration; only summary, answers and errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    if !GeminiClient::is_valid_api_key_format(&cli.api_key) && !cli.quiet {
        eprintln!(
            "{}",
            dim("note: the API key does not look like a Google key (expected an 'AIza…' prefix)")
        );
    }

    let client = GeminiClient::new(&cli.api_key).with_model(&cli.model);
    let loader = DocumentLoader::new();
    let mut session = Session::new();

    // ── Load the document ────────────────────────────────────────────────
    let document_from_stdin = cli.input.is_none();
    match &cli.input {
        Some(path) => {
            loader
                .load(&mut session, path)
                .await
                .with_context(|| format!("Failed to load '{}'", path.display()))?;
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read document from stdin")?;
            session.set_text(text);
        }
    }

    // ── Summarize ────────────────────────────────────────────────────────
    let show_spinner = !cli.quiet;
    let bar = show_spinner.then(|| spinner("Summarizing…"));
    let summary_result = summarize(&mut session, &client).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    let summary = summary_result.context("Summarization failed")?;

    if !cli.json {
        if !cli.quiet {
            eprintln!("{}", cyan(&bold("Summary")));
        }
        println!("{summary}");
    }

    // ── Question loop ────────────────────────────────────────────────────
    if !cli.summary_only {
        if !cli.questions.is_empty() {
            for question in &cli.questions {
                ask_and_print(&mut session, &client, question, &cli).await;
            }
        } else if document_from_stdin {
            // The document consumed stdin; there is nothing left to read
            // questions from.
            if !cli.quiet {
                eprintln!(
                    "{}",
                    dim("document came from stdin — pass -q/--question to ask questions")
                );
            }
        } else {
            interactive_loop(&mut session, &client, &cli).await?;
        }
    }

    // ── Transcript dump ──────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&session).context("Failed to serialise session")?;
        println!("{json}");
    }

    Ok(())
}

/// Read questions from stdin until EOF or an empty line.
async fn interactive_loop(session: &mut Session, client: &GeminiClient, cli: &Cli) -> Result<()> {
    if !cli.quiet {
        eprintln!();
        eprintln!(
            "{}",
            dim("Ask questions about the summary. Empty line or Ctrl-D to quit.")
        );
    }

    let stdin = io::stdin();
    loop {
        eprint!("{} ", cyan("?"));
        io::stderr().flush().ok();

        let mut line = String::new();
        let read = stdin.lock().read_line(&mut line).context("Failed to read question")?;
        if read == 0 || line.trim().is_empty() {
            break;
        }

        ask_and_print(session, client, line.trim(), cli).await;
    }
    Ok(())
}

/// Ask one question; print the answer or the error. A failed ask keeps the
/// loop alive — the turn has already been rolled back, so the user can just
/// rephrase.
async fn ask_and_print(session: &mut Session, client: &GeminiClient, question: &str, cli: &Cli) {
    let bar = (!cli.quiet).then(|| spinner("Thinking…"));
    let result = ask(session, client, question).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    match result {
        Ok(answer) => {
            if cli.json {
                // The transcript dump at the end carries the turns.
                return;
            }
            if !cli.quiet {
                eprintln!("{} {}", dim("Q:"), question);
            }
            println!("{answer}");
        }
        Err(e) => {
            eprintln!("{} {}", red("✗"), e);
        }
    }
}

/// A steady-tick spinner on stderr while a request is in flight.
fn spinner(msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message(msg.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}
