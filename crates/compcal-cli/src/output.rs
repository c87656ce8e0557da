//! Output layer shared by every `compcal` command.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `[output] format` from the config file
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use compcal_core::model::event::{CalendarEvent, EventKind};
use compcal_core::style::{StyleDescriptor, classify, style_of};
use serde::Serialize;
use std::io::{self, IsTerminal, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, aligned columns).
    Pretty,
    /// Tab-separated rows for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "text" => Some(Self::Text),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    config_format: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }
    if json_flag {
        return OutputMode::Json;
    }
    if let Some(mode) = format_env.and_then(OutputMode::parse) {
        return mode;
    }
    if let Some(mode) = config_format.and_then(OutputMode::parse) {
        return mode;
    }
    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, config, and TTY defaults.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    config_format: Option<&str>,
) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(format_flag, json_flag, env_val.as_deref(), config_format, is_tty)
}

/// JSON shape of one event as handed to a renderer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow<'a> {
    pub id: &'a str,
    pub entity_id: Option<&'a str>,
    pub title: &'a str,
    pub kind: EventKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub status: &'a str,
    pub priority: Option<&'a str>,
    pub description: &'a str,
    pub style: StyleDescriptor,
}

impl<'a> From<&'a CalendarEvent> for EventRow<'a> {
    fn from(event: &'a CalendarEvent) -> Self {
        Self {
            id: &event.id,
            entity_id: event.entity_id(),
            title: &event.title,
            kind: classify(event),
            start: event.start,
            end: event.end,
            all_day: event.all_day,
            status: &event.status,
            priority: event.priority.as_deref(),
            description: &event.description,
            style: style_of(event),
        }
    }
}

/// Date/time column for human output, in local time.
pub fn when(event: &CalendarEvent) -> String {
    let start = event.start.with_timezone(&Local);
    let end = event.end.with_timezone(&Local);
    if event.all_day {
        if start.date_naive() == end.date_naive() {
            start.format("%Y-%m-%d").to_string()
        } else {
            format!("{} → {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
        }
    } else if start.date_naive() == end.date_naive() {
        format!("{}–{}", start.format("%Y-%m-%d %H:%M"), end.format("%H:%M"))
    } else {
        format!("{} → {}", start.format("%Y-%m-%d %H:%M"), end.format("%Y-%m-%d %H:%M"))
    }
}

/// Write events in the requested mode.
///
/// Pretty mode prints `heading` and a kind summary; text mode prints one
/// tab-separated row per event; JSON wraps rows under `"events"` alongside
/// any extra top-level fields in `meta`.
pub fn write_events(
    w: &mut dyn Write,
    mode: OutputMode,
    heading: &str,
    events: &[CalendarEvent],
    meta: serde_json::Map<String, serde_json::Value>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let rows: Vec<EventRow<'_>> = events.iter().map(EventRow::from).collect();
            let mut body = meta;
            body.insert("count".to_string(), events.len().into());
            body.insert("events".to_string(), serde_json::to_value(rows)?);
            serde_json::to_writer_pretty(&mut *w, &body)?;
            writeln!(w)?;
        }
        OutputMode::Text => {
            for event in events {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    event.id,
                    classify(event),
                    event.start.to_rfc3339(),
                    event.end.to_rfc3339(),
                    event.status,
                    event.title
                )?;
            }
        }
        OutputMode::Pretty => {
            pretty_section(w, heading)?;
            if events.is_empty() {
                writeln!(w, "No events.")?;
                return Ok(());
            }
            for event in events {
                writeln!(
                    w,
                    "{:<25} {:<12} {}  ({})",
                    when(event),
                    format!("[{}]", classify(event)),
                    event.title,
                    if event.status.is_empty() {
                        "no status"
                    } else {
                        event.status.as_str()
                    }
                )?;
            }
            pretty_rule(w)?;
            let summary: Vec<String> = compcal_core::model::event::kind_counts(events)
                .into_iter()
                .map(|(kind, count)| format!("{count} {kind}"))
                .collect();
            writeln!(w, "{} events: {}", events.len(), summary.join(", "))?;
        }
    }
    Ok(())
}
