//! Subcommand implementations and the plumbing they share.

pub mod agenda;
pub mod events;
pub mod show;
pub mod view;

use chrono::{DateTime, Utc};
use clap::Args;
use compcal_core::config::CalendarConfig;
use compcal_core::error::ErrorCode;
use compcal_core::model::entity::parse_timestamp;
use compcal_core::model::event::EventKind;
use compcal_core::nav::Granularity;
use compcal_core::source::JsonFileSource;
use compcal_core::{CalendarEngine, EventFilter};
use std::path::PathBuf;

use crate::output::OutputMode;

/// Settings resolved once in `main` and handed to every command.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: CalendarConfig,
    pub now: DateTime<Utc>,
    pub output: OutputMode,
}

impl RunContext {
    /// Build an engine from the components file.
    ///
    /// A missing or malformed file is reported on stderr and leaves an
    /// empty calendar; the command still runs.
    pub fn engine(&self, source: &SourceArgs, filter: &FilterArgs) -> CalendarEngine {
        let mut engine = CalendarEngine::from_config(&self.config, self.now);
        engine.load(&JsonFileSource::new(&source.file), self.now);
        if let Some(notice) = engine.notice() {
            eprintln!("warning: [{}] {}", notice.code, notice.message);
            if let Some(hint) = notice.hint {
                eprintln!("  hint: {hint}");
            }
        }
        engine.set_filter(filter.to_filter());
        engine
    }
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// JSON file holding the component snapshot (an array of records).
    #[arg(short, long)]
    pub file: PathBuf,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Case-insensitive text matched against title or description.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact component status, e.g. "In Review".
    #[arg(long)]
    pub status: Option<String>,

    /// Event kind: deadline, review, development, meeting, other.
    #[arg(short, long, value_parser = parse_kind)]
    pub kind: Option<EventKind>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> EventFilter {
        EventFilter {
            search: self.search.clone().unwrap_or_default(),
            status: self.status.clone(),
            kind: self.kind,
        }
    }
}

pub fn parse_kind(raw: &str) -> Result<EventKind, String> {
    raw.parse()
        .map_err(|err| format!("{}: {err}", ErrorCode::InvalidEnumValue))
}

pub fn parse_granularity(raw: &str) -> Result<Granularity, String> {
    raw.parse()
        .map_err(|err| format!("{}: {err}", ErrorCode::InvalidEnumValue))
}

pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(raw).ok_or_else(|| {
        format!(
            "{}: {} '{raw}'",
            ErrorCode::InvalidTimestamp,
            ErrorCode::InvalidTimestamp.message()
        )
    })
}

/// JSON metadata shared by list-style commands.
pub fn filter_meta(filter: &EventFilter) -> serde_json::Map<String, serde_json::Value> {
    let mut meta = serde_json::Map::new();
    if let Ok(value) = serde_json::to_value(filter) {
        meta.insert("filter".to_string(), value);
    }
    meta
}

pub fn heading_with_filter(base: &str, filter: &EventFilter) -> String {
    if filter.is_empty() {
        return base.to_string();
    }
    let mut parts = Vec::new();
    if !filter.search.is_empty() {
        parts.push(format!("search \"{}\"", filter.search));
    }
    if let Some(ref status) = filter.status {
        parts.push(format!("status {status}"));
    }
    if let Some(kind) = filter.kind {
        parts.push(format!("kind {kind}"));
    }
    format!("{base} ({})", parts.join(", "))
}
