//! Terminal UI — spinner, stage outcomes, and the final summary.
//!
//! # Design goals
//!
//! - **Clean by default.**  While a stage is running the user sees only a
//!   spinner and a short label; azcopy output goes through `tracing` and is
//!   hidden unless `--verbose` (or `RUST_LOG`) asks for it.
//! - **Informative on failure.**  A failed stage replays the captured
//!   azcopy stderr in full so the operator can diagnose the problem without
//!   re-running manually.
//! - **Decoupled from execution.**  Stages are arbitrary library futures;
//!   this module only renders their results.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use azbackup::BackupError;

// ─── Icons ───────────────────────────────────────────────────────────────────

/// Braille spinner frames — same style as indicatif's default.
static SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Green ✓  — printed when a stage succeeds.
fn icon_ok() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}
/// Red ✗    — printed when a stage fails.
fn icon_err() -> console::StyledObject<&'static str> {
    style("✗").red().bold()
}
/// Cyan ✓   — printed next to the final success summary.
fn icon_done() -> console::StyledObject<&'static str> {
    style("✓").cyan().bold()
}

// ─── Stage result ─────────────────────────────────────────────────────────────

/// The outcome of a single pipeline stage.
///
/// Carries the stage label plus whatever azcopy wrote to stderr so it can
/// be replayed to the terminal when something goes wrong.
#[derive(Debug)]
pub struct StageOutcome {
    /// Human-readable stage label, e.g. `"Tables (2)"`.
    pub label: String,
    /// Whether the stage completed without error.
    pub success: bool,
    /// The external tool's captured stderr, when it failed.
    pub stderr: String,
    /// The error message, if any.
    pub error: Option<String>,
}

impl StageOutcome {
    /// Print the one-line summary (✓/✗ + label) to stdout.
    ///
    /// On failure, also prints the error message and the captured stderr so
    /// the operator has everything they need without re-running.
    pub fn print(&self) {
        if self.success {
            println!("  {}  {}", icon_ok(), style(&self.label).bold());
        } else {
            println!("  {}  {}", icon_err(), style(&self.label).bold());

            if let Some(ref msg) = self.error {
                eprintln!();
                eprintln!("  {} {}", style("Error:").red().bold(), msg);
            }

            // Replay what azcopy said so the operator can see the cause.
            if !self.stderr.is_empty() {
                eprintln!();
                eprintln!("  {} azcopy stderr:", style("►").dim());
                for line in self.stderr.lines() {
                    eprintln!("    {line}");
                }
            }
        }
    }

    /// Returns `true` if the stage did not succeed.
    pub const fn failed(&self) -> bool {
        !self.success
    }
}

// ─── Spinner ──────────────────────────────────────────────────────────────────

/// Create and start an indeterminate spinner for `label`.
///
/// The spinner ticks at ~80 ms and is automatically cleared when
/// [`ProgressBar::finish_and_clear`] is called.
fn make_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan}  {msg}")
            .unwrap()
            .tick_chars(SPINNER_CHARS),
    );
    pb.set_message(format!("{}", style(label).dim()));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ─── Stage runner ─────────────────────────────────────────────────────────────

/// Run a pipeline stage behind a spinner, returning a [`StageOutcome`].
///
/// The spinner is cleared before the outcome line is printed, so the
/// terminal always shows a clean, static summary when the stage finishes.
pub async fn run_stage<F>(label: &str, stage: F) -> StageOutcome
where
    F: Future<Output = azbackup::Result<()>>,
{
    let spinner = make_spinner(label);
    let result = stage.await;
    spinner.finish_and_clear();

    match result {
        Ok(()) => StageOutcome {
            label: label.to_string(),
            success: true,
            stderr: String::new(),
            error: None,
        },
        Err(BackupError::ExternalTool { stderr, code }) => StageOutcome {
            label: label.to_string(),
            success: false,
            stderr,
            error: Some(match code {
                Some(code) => format!("azcopy failed (exit code {code})"),
                None => "azcopy failed".into(),
            }),
        },
        Err(e) => StageOutcome {
            label: label.to_string(),
            success: false,
            stderr: String::new(),
            error: Some(e.to_string()),
        },
    }
}

/// Like [`run_stage`] but for stages that are logically skipped (e.g.
/// because `--no-tables` was passed or the resource list is empty).
///
/// Returns a synthetic success outcome so the pipeline does not need
/// special-case logic for optional stages.
pub fn skipped_stage(label: &str) -> StageOutcome {
    StageOutcome {
        label: format!("{label} (skipped)"),
        success: true,
        stderr: String::new(),
        error: None,
    }
}

// ─── Summary banner ───────────────────────────────────────────────────────────

/// Print the final summary after all stages have run.
///
/// Shows a success banner when all stages passed, or a failure banner
/// listing the stages that failed.
pub fn print_summary(outcomes: &[StageOutcome]) {
    let failed: Vec<&StageOutcome> = outcomes.iter().filter(|o| o.failed()).collect();
    println!();
    if failed.is_empty() {
        println!(
            "  {} {}",
            icon_done(),
            style("All stages completed successfully.").cyan().bold()
        );
    } else {
        eprintln!("  {}  {}", icon_err(), style("Backup failed.").red().bold());
        for o in &failed {
            eprintln!("    {} {}", icon_err(), style(&o.label).red());
        }
    }
    println!();
}

// ─── Tests ────────────────────────────────────────────────────────────────────
