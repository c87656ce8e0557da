//! Event classification and color lookup.
//!
//! Both tables are closed and hard-coded. Background comes from the event
//! kind, the accent border from the component status.

use serde::Serialize;

use crate::model::entity::LifecycleStatus;
use crate::model::event::{CalendarEvent, EventKind};

/// Colors handed to the renderer for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    pub background: &'static str,
    pub border: &'static str,
    pub text_color: &'static str,
}

pub const TEXT_COLOR: &str = "#ffffff";

/// Accent used for statuses outside the known vocabulary.
pub const DEFAULT_STATUS_COLOR: &str = "#6b7280";

/// Kind inference order for events without an explicit kind.
const TITLE_MARKERS: [EventKind; 4] = [
    EventKind::Deadline,
    EventKind::Review,
    EventKind::Development,
    EventKind::Meeting,
];

/// The event's kind, inferred from its title when not set.
///
/// Title matching is case-insensitive and checks Deadline, Review,
/// Development, Meeting in that order; no match is [`EventKind::Other`].
#[must_use]
pub fn classify(event: &CalendarEvent) -> EventKind {
    if let Some(kind) = event.kind {
        return kind;
    }
    let title = event.title.to_lowercase();
    TITLE_MARKERS
        .into_iter()
        .find(|kind| title.contains(kind.as_str()))
        .unwrap_or(EventKind::Other)
}

#[must_use]
pub const fn kind_color(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Deadline => "#ef4444",
        EventKind::Review => "#f59e0b",
        EventKind::Development => "#3b82f6",
        EventKind::Meeting => "#8b5cf6",
        EventKind::Other => "#6b7280",
    }
}

#[must_use]
pub const fn status_color(status: LifecycleStatus) -> &'static str {
    match status {
        LifecycleStatus::Completed => "#10b981",
        LifecycleStatus::InDevelopment => "#3b82f6",
        LifecycleStatus::InDesign => "#a855f7",
        LifecycleStatus::InReview => "#f59e0b",
        LifecycleStatus::InProgress => "#06b6d4",
        LifecycleStatus::NotStarted => "#9ca3af",
        LifecycleStatus::Unrecognized => DEFAULT_STATUS_COLOR,
    }
}

/// Style for an event of `kind` whose component has the raw `status`.
#[must_use]
pub fn style_for(kind: EventKind, status: &str) -> StyleDescriptor {
    StyleDescriptor {
        background: kind_color(kind),
        border: status_color(LifecycleStatus::parse(status)),
        text_color: TEXT_COLOR,
    }
}

/// Classify then style in one step.
#[must_use]
pub fn style_of(event: &CalendarEvent) -> StyleDescriptor {
    style_for(classify(event), &event.status)
}
