use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalize;

/// A tracked component as handed over by the entity source.
///
/// Read-only input. Every field is defaulted so partially filled records
/// still decode; an empty or unparseable `last_modified` is clamped to "now"
/// at synthesis time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityRecord {
    pub id: String,
    pub name: String,
    pub status: String,
    pub priority: Option<String>,
    pub last_modified: Option<String>,
}

impl EntityRecord {
    /// Convenience constructor used by sources and tests.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: impl Into<String>,
        last_modified: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: status.into(),
            priority: None,
            last_modified: Some(last_modified.into()),
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Parsed lifecycle status of this record.
    #[must_use]
    pub fn lifecycle(&self) -> LifecycleStatus {
        LifecycleStatus::parse(&self.status)
    }

    /// The last-modified instant, or `now` when missing or unparseable.
    #[must_use]
    pub fn last_modified_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.last_modified.as_deref() {
            Some(raw) => parse_timestamp(raw).unwrap_or_else(|| {
                tracing::warn!(
                    entity = %self.id,
                    last_modified = raw,
                    "unparseable lastModified, using current time"
                );
                now
            }),
            None => {
                tracing::warn!(entity = %self.id, "missing lastModified, using current time");
                now
            }
        }
    }
}

/// Parse the timestamp shapes components are exported with.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC), a bare
/// `YYYY-MM-DD` date (midnight UTC), or integer epoch milliseconds.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

/// The lifecycle vocabulary components move through.
///
/// The source vocabulary is open-ended; anything not listed here is
/// [`LifecycleStatus::Unrecognized`] and gets the default style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    Completed,
    InDevelopment,
    InDesign,
    InReview,
    InProgress,
    NotStarted,
    Unrecognized,
}

impl LifecycleStatus {
    pub const ALL: [Self; 7] = [
        Self::Completed,
        Self::InDevelopment,
        Self::InDesign,
        Self::InReview,
        Self::InProgress,
        Self::NotStarted,
        Self::Unrecognized,
    ];

    /// Lenient parse. Never fails: unknown text maps to `Unrecognized`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match normalize(raw).as_str() {
            "completed" => Self::Completed,
            "indevelopment" => Self::InDevelopment,
            "indesign" => Self::InDesign,
            "inreview" | "underreview" => Self::InReview,
            "inprogress" => Self::InProgress,
            "notstarted" => Self::NotStarted,
            _ => Self::Unrecognized,
        }
    }

    /// Statuses that get a development span on the calendar.
    #[must_use]
    pub const fn is_in_progress_family(self) -> bool {
        matches!(self, Self::InDevelopment | Self::InDesign | Self::InProgress)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InDevelopment => "In Development",
            Self::InDesign => "In Design",
            Self::InReview => "In Review",
            Self::InProgress => "In Progress",
            Self::NotStarted => "Not Started",
            Self::Unrecognized => "Unrecognized",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
