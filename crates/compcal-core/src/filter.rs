use serde::{Deserialize, Serialize};

use crate::model::event::{CalendarEvent, EventKind};
use crate::style::classify;

/// Filter criteria applied to the synthesized event set.
///
/// All active criteria must match. An empty search and `None` status/kind
/// match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    /// Free-text query, matched case-insensitively against title or
    /// description. Whitespace is part of the query.
    pub search: String,
    /// Exact component status, e.g. "In Review".
    pub status: Option<String>,
    /// Exact classified kind.
    pub kind: Option<EventKind>,
}

impl EventFilter {
    #[must_use]
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Returns true if no filter criteria are active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.kind.is_none() && self.search.is_empty()
    }

    /// Apply this filter to a list of events.
    ///
    /// Returns a new vec with only matching events, in input order.
    #[must_use]
    pub fn apply(&self, events: &[CalendarEvent]) -> Vec<CalendarEvent> {
        let query = self.normalized_query();
        events
            .iter()
            .filter(|event| self.matches_with(event, query.as_deref()))
            .cloned()
            .collect()
    }

    /// Returns true if the event satisfies all active filter criteria.
    #[must_use]
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        self.matches_with(event, self.normalized_query().as_deref())
    }

    fn normalized_query(&self) -> Option<String> {
        (!self.search.is_empty()).then(|| self.search.to_lowercase())
    }

    fn matches_with(&self, event: &CalendarEvent, query: Option<&str>) -> bool {
        if let Some(ref status) = self.status {
            if event.status != *status {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if classify(event) != kind {
                return false;
            }
        }
        if let Some(q) = query {
            if !event.title.to_lowercase().contains(q)
                && !event.description.to_lowercase().contains(q)
            {
                return false;
            }
        }
        true
    }
}
