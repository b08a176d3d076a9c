//! Output rendering: JSON for pipes, coloured text for terminals.
//!
//! Command data goes to stdout in both modes. Pretty mode adds coloured
//! headlines and check lists built with ariadne's colour helpers.

use std::io::{self, IsTerminal};

use ariadne::{Color, Fmt};
use serde::Serialize;

use labeldesk_health::Classification;

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, human-oriented output.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, else pretty on a TTY and JSON on a pipe.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── JSON ────────────────────────────────────────────────────────────────

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).expect("response serialization cannot fail");
    println!("{json}");
}

/// Print `value` as JSON in JSON mode; otherwise hand it to `pretty`.
pub(crate) fn emit<T: Serialize>(format: Format, value: &T, pretty: impl FnOnce(&T)) {
    match format {
        Format::Json => print_json(value),
        Format::Pretty => pretty(value),
    }
}

/// Report a failed command: a `{success: false, error}` envelope on stdout
/// in JSON mode, a red `error:` line on stderr otherwise.
pub(crate) fn error_envelope(format: Format, message: &str) {
    match format {
        Format::Json => print_json(&serde_json::json!({
            "success": false,
            "error": message,
        })),
        Format::Pretty => eprintln!("{}: {message}", "error".fg(Color::Red)),
    }
}

// ── Pretty helpers ──────────────────────────────────────────────────────

/// A coloured verdict word.
pub(crate) fn verdict(status: Classification) -> String {
    match status {
        Classification::Healthy => format!("{}", "HEALTHY".fg(Color::Green)),
        Classification::Degraded => format!("{}", "DEGRADED".fg(Color::Yellow)),
    }
}

/// A coloured pass/fail mark.
pub(crate) fn mark(ok: bool) -> String {
    if ok {
        format!("{}", "✓".fg(Color::Green))
    } else {
        format!("{}", "✗".fg(Color::Red))
    }
}

/// One line of a check list.
pub(crate) struct CheckLine {
    pub(crate) kind: &'static str,
    pub(crate) target: String,
    pub(crate) ok: bool,
    pub(crate) detail: Option<String>,
}

/// Print a verdict headline followed by one line per check.
pub(crate) fn print_checklist(status: Classification, lines: impl IntoIterator<Item = CheckLine>) {
    println!("{}", verdict(status));
    for line in lines {
        let detail = line
            .detail
            .map(|d| format!("  {}", d.fg(Color::White)))
            .unwrap_or_default();
        println!("  {} {:<8} {}{detail}", mark(line.ok), line.kind, line.target);
    }
}

/// Bytes as MiB with one decimal.
pub(crate) fn mebibytes(bytes: u64) -> String {
    format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_format_wins() {
        assert_eq!(Format::resolve_or_detect(Some("json")), Format::Json);
        assert_eq!(Format::resolve_or_detect(Some("pretty")), Format::Pretty);
    }

    #[test]
    fn mebibytes_formatting() {
        assert_eq!(mebibytes(0), "0.0 MiB");
        assert_eq!(mebibytes(3 * 1024 * 1024 / 2), "1.5 MiB");
    }
}
