//! Progress reporting and output
//!
//! Count lines go to stdout. Everything else (spinner, header, summary) goes
//! to stderr, so the counts can be piped cleanly.

use crate::engine::CountResult;
use crate::table::WordCount;
use console::{style, Term};
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Spinner showing run status on stderr
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish and clear the spinner
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .rev()
                .map(|&b| b as char)
                .collect::<String>()
        })
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Write one line per word: count right-justified in 8 columns, `": "`, word
pub fn write_counts<W: Write>(out: &mut W, counts: &[WordCount]) -> io::Result<()> {
    for wc in counts {
        writeln!(out, "{}", wc)?;
    }
    out.flush()
}

/// Print a header at the start of the run
pub fn print_header(sources: usize, mode: &str, store: &str) {
    let term = Term::stderr();
    let source_desc = if sources == 0 {
        "standard input".to_string()
    } else {
        format_number(sources as u64)
    };

    let _ = term.write_line("");
    let _ = term.write_line(&format!(
        "{} {}",
        style("wordct").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    ));
    let _ = term.write_line(&format!("{}", style("─".repeat(50)).dim()));
    let _ = term.write_line(&format!("  {} {}", style("Sources:").bold(), source_desc));
    let _ = term.write_line(&format!("  {} {}", style("Mode:").bold(), mode));
    let _ = term.write_line(&format!("  {} {}", style("Store:").bold(), store));
    let _ = term.write_line("");
}

/// Print a summary of the run results
pub fn print_summary(result: &CountResult) {
    let term = Term::stderr();
    let duration_secs = result.duration.as_secs_f64();

    let _ = term.write_line("");
    let _ = term.write_line(&format!("{}", style("Count Complete").green().bold()));
    let _ = term.write_line(&format!("{}", style("─".repeat(50)).dim()));
    let _ = term.write_line(&format!(
        "  {} {} of {}",
        style("Sources:").bold(),
        format_number(result.sources_opened as u64),
        format_number(result.sources_requested.max(result.sources_opened) as u64)
    ));
    let _ = term.write_line(&format!(
        "  {} {}",
        style("Words:").bold(),
        format_number(result.words_counted)
    ));
    let _ = term.write_line(&format!(
        "  {} {}",
        style("Distinct:").bold(),
        format_number(result.table.len() as u64)
    ));
    let _ = term.write_line(&format!(
        "  {} {}",
        style("Input Size:").bold(),
        format_size(result.bytes_read, BINARY)
    ));
    let _ = term.write_line(&format!(
        "  {} {:.3}s ({:.0} words/sec)",
        style("Duration:").bold(),
        duration_secs,
        result.words_per_second()
    ));

    let failed = result.failed_sources();
    if !failed.is_empty() {
        let _ = term.write_line(&format!(
            "  {} {}",
            style("Skipped:").yellow().bold(),
            failed.join(", ")
        ));
    }
    if result.read_errors > 0 {
        let _ = term.write_line(&format!(
            "  {} {}",
            style("Truncated:").yellow().bold(),
            format_number(result.read_errors)
        ));
    }
    let _ = term.write_line("");
}
