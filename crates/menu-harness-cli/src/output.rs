//! Output formatting and status reporting

use crate::error::CliResult;
use console::{style, Style, Term};
use menu_harness::MatchResult;
use std::time::Duration;

/// Status line printer on stderr
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    fn line(&self, symbol: &str, label: &str, paint: Style, message: &str) {
        let prefix = if self.use_color {
            paint.bold().apply_to(symbol).to_string()
        } else {
            label.to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.line("✓", "PASS", Style::new().green(), message);
        }
    }

    /// Print a failure message, even in quiet mode
    pub fn failure(&self, message: &str) {
        self.line("✗", "FAIL", Style::new().red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            self.line("⚠", "WARN", Style::new().yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.line("ℹ", "INFO", Style::new().blue(), message);
        }
    }
}

/// Human-readable report of a finished match
///
/// ```text
/// Failed expectations:
///  0 0 Expected toggled = true, but found false
///
/// FAILED /org/test/menu: 1 failure(s) at 1 location(s) in 0.10s
/// ```
#[must_use]
pub fn render_text_report(
    result: &MatchResult,
    menu_path: &str,
    expectations: usize,
    elapsed: Duration,
    use_color: bool,
) -> String {
    let secs = elapsed.as_secs_f64();
    if result.success() {
        let status = paint("PASSED", Style::new().green().bold(), use_color);
        return format!("{status} {menu_path}: {expectations} expectation(s) matched in {secs:.2}s\n");
    }
    let mut out = String::new();
    for line in result.concat_failures().lines() {
        if use_color && line.starts_with(' ') {
            out.push_str(&colorize_failure_line(line));
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    let status = paint("FAILED", Style::new().red().bold(), use_color);
    out.push_str(&format!(
        "\n{status} {menu_path}: {} failure(s) at {} location(s) in {secs:.2}s\n",
        result.failure_count(),
        result.failures().count()
    ));
    out
}

/// Pretty-printed JSON report of a finished match
pub fn render_json_report(result: &MatchResult) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(&result.report())?)
}

fn paint(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        style.apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

/// Dim the location prefix of a rendered failure line
fn colorize_failure_line(line: &str) -> String {
    let split = line
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || c == ' '))
        .map_or(line.len(), |(i, _)| i);
    let (prefix, message) = line.split_at(split);
    format!("{}{message}", style(prefix).cyan())
}
