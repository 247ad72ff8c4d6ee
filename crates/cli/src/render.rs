//! Terminal and JSON output for command results.
//!
//! Pretty output goes to stdout as aligned plain text; JSON output is one
//! pretty-printed document per command on stdout. Errors use the
//! `{"success": false, "error": ..., "message": ...}` envelope in JSON mode.

use std::io::{self, IsTerminal};

use serde_json::{Value, json};
use serial_label_render::{FieldOutcome, RenderReport};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Human-readable text.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, or detect from whether stdout is a TTY.
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

// ── Emitters ────────────────────────────────────────────────────────────

/// Print a JSON document to stdout.
pub(crate) fn print_json(value: &Value) {
    // Serializing a `Value` cannot fail.
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    );
}

/// Report a failed command in the selected format.
pub(crate) fn print_error(format: Format, err: &anyhow::Error) {
    match format {
        Format::Pretty => eprintln!("error: {err:#}"),
        Format::Json => print_json(&json!({
            "success": false,
            "error": "command_failed",
            "message": format!("{err:#}"),
        })),
    }
}

/// Print `key: value` rows with the keys padded to a common width.
pub(crate) fn print_table<'a, I>(rows: I)
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let rows: Vec<_> = rows.into_iter().collect();
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in rows {
        println!("  {key:<width$}  {value}");
    }
}

/// Per-part outcomes of a render, one line each.
pub(crate) fn print_report_pretty(report: &RenderReport) {
    let mut rows = vec![("logo", report.logo().to_string())];
    rows.extend(report.fields().map(|(id, outcome)| (id.caption(), outcome.to_string())));
    print_table(rows);
    if !report.is_complete() {
        let degraded = report
            .fields()
            .filter(|(_, o)| !matches!(o, FieldOutcome::Rendered))
            .count();
        eprintln!(
            "warning: label rendered with {degraded} degraded field(s){}",
            if report.logo().is_rendered() { "" } else { " and a degraded logo" }
        );
    }
}
