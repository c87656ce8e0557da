use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, normalize};

/// The closed classification of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Deadline,
    Review,
    Development,
    Meeting,
    Other,
}

impl EventKind {
    pub const ALL: [Self; 5] = [
        Self::Deadline,
        Self::Review,
        Self::Development,
        Self::Meeting,
        Self::Other,
    ];

    /// Slug used in event ids and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deadline => "deadline",
            Self::Review => "review",
            Self::Development => "development",
            Self::Meeting => "meeting",
            Self::Other => "other",
        }
    }

    /// Title-case label appended to the component name in event titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Deadline => "Deadline",
            Self::Review => "Review",
            Self::Development => "Development",
            Self::Meeting => "Meeting",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "deadline" => Ok(Self::Deadline),
            "review" => Ok(Self::Review),
            "development" | "dev" => Ok(Self::Development),
            "meeting" => Ok(Self::Meeting),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError {
                expected: "kind",
                got: s.to_string(),
            }),
        }
    }
}

/// A derived, read-only projection of one component onto the calendar.
///
/// `kind` is optional only for ad hoc events built outside the synthesizer;
/// [`classify`](crate::style::classify) infers it from the title in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub status: String,
    pub priority: Option<String>,
    pub description: String,
    #[serde(default)]
    pub kind: Option<EventKind>,
}

impl CalendarEvent {
    /// Deterministic id for the `kind` event of `entity_id`.
    #[must_use]
    pub fn derive_id(entity_id: &str, kind: EventKind) -> String {
        format!("{entity_id}-{}", kind.as_str())
    }

    /// Id of the component this event was derived from.
    ///
    /// Strips the trailing `-<kind>` suffix; component ids may themselves
    /// contain dashes. Returns `None` for ids without a known suffix.
    #[must_use]
    pub fn entity_id(&self) -> Option<&str> {
        EventKind::ALL.iter().find_map(|kind| {
            self.id
                .strip_suffix(kind.as_str())
                .and_then(|rest| rest.strip_suffix('-'))
        })
    }
}

/// Per-kind totals, in [`EventKind::ALL`] order, skipping empty kinds.
#[must_use]
pub fn kind_counts(events: &[CalendarEvent]) -> Vec<(EventKind, usize)> {
    EventKind::ALL
        .into_iter()
        .map(|kind| {
            let count = events
                .iter()
                .filter(|event| crate::style::classify(event) == kind)
                .count();
            (kind, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect()
}
