//! Rendering shared by every command: plain tables or a JSON envelope.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Output mode picked by the global `--json` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Output {
    json: bool,
}

impl Output {
    pub(crate) fn new(json: bool) -> Self {
        Self { json }
    }

    pub(crate) fn is_json(self) -> bool {
        self.json
    }
}

#[derive(Debug, Serialize)]
struct Envelope<'a, T: Serialize> {
    command: &'a str,
    generated_at: DateTime<Utc>,
    source: &'a str,
    warnings: &'a [String],
    data: &'a T,
}

/// Print `data` wrapped with the command name, timestamp, data source and
/// any partial-fetch warnings.
pub(crate) fn print_json<T: Serialize>(
    command: &str,
    source: &str,
    warnings: &[String],
    data: &T,
) -> anyhow::Result<()> {
    let envelope = Envelope {
        command,
        generated_at: Utc::now(),
        source,
        warnings,
        data,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Warnings go to stderr so tables stay clean when piped.
pub(crate) fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

/// Format an optional euro amount; `None` renders as a dash.
pub(crate) fn fmt_eur(value: Option<f64>) -> String {
    value.map_or_else(|| "\u{2014}".to_string(), |v| format!("\u{20ac}{v:.2}"))
}

pub(crate) fn fmt_percent(value: Option<f64>) -> String {
    value.map_or_else(|| "\u{2014}".to_string(), |v| format!("{v:+.1}%"))
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}\u{2026}")
}
