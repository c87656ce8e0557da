//! Calendar orchestration.
//!
//! Explicit recompute-on-change: a new snapshot resynthesizes everything,
//! a filter change only refilters. Event ids therefore stay stable across
//! filter edits.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::CalendarConfig;
use crate::error::{ErrorCode, SourceError};
use crate::filter::EventFilter;
use crate::model::entity::EntityRecord;
use crate::model::event::{CalendarEvent, EventKind};
use crate::nav::{self, NavAction, NavState};
use crate::source::EntitySource;
use crate::style::{self, StyleDescriptor};
use crate::synth::Synthesizer;

/// Recoverable notice for the presentation layer after a source failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceNotice {
    pub code: &'static str,
    pub message: String,
    pub hint: Option<&'static str>,
}

impl From<&SourceError> for SourceNotice {
    fn from(err: &SourceError) -> Self {
        let code: ErrorCode = err.code();
        Self {
            code: code.code(),
            message: err.to_string(),
            hint: code.hint(),
        }
    }
}

#[derive(Debug)]
pub struct CalendarEngine {
    synthesizer: Synthesizer,
    entities: Vec<EntityRecord>,
    events: Vec<CalendarEvent>,
    filter: EventFilter,
    filtered: Vec<CalendarEvent>,
    nav: NavState,
    notice: Option<SourceNotice>,
}

impl CalendarEngine {
    /// Empty calendar showing the month of `now`.
    #[must_use]
    pub fn new(synthesizer: Synthesizer, now: DateTime<Utc>) -> Self {
        Self {
            synthesizer,
            entities: Vec::new(),
            events: Vec::new(),
            filter: EventFilter::default(),
            filtered: Vec::new(),
            nav: NavState::today(now),
            notice: None,
        }
    }

    #[must_use]
    pub fn from_config(config: &CalendarConfig, now: DateTime<Utc>) -> Self {
        Self::new(Synthesizer::from_config(&config.meetings), now)
    }

    /// Pull a fresh snapshot from `source`.
    ///
    /// A failing source leaves an empty calendar and a [`SourceNotice`].
    pub fn load(&mut self, source: &dyn EntitySource, now: DateTime<Utc>) {
        match source.list() {
            Ok(entities) => {
                self.notice = None;
                self.replace_snapshot(entities, now);
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    code = %err.code(),
                    "component source failed, showing empty calendar"
                );
                self.notice = Some(SourceNotice::from(&err));
                self.replace_snapshot(Vec::new(), now);
            }
        }
    }

    /// Replace the snapshot and recompute everything derived from it.
    pub fn replace_snapshot(&mut self, entities: Vec<EntityRecord>, now: DateTime<Utc>) {
        self.entities = entities;
        self.events = self.synthesizer.synthesize(&self.entities, now);
        self.refilter();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
        self.refilter();
    }

    pub fn set_status_filter(&mut self, status: Option<String>) {
        self.filter.status = status;
        self.refilter();
    }

    pub fn set_kind_filter(&mut self, kind: Option<EventKind>) {
        self.filter.kind = kind;
        self.refilter();
    }

    pub fn set_filter(&mut self, filter: EventFilter) {
        self.filter = filter;
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.set_filter(EventFilter::default());
    }

    fn refilter(&mut self) {
        self.filtered = self.filter.apply(&self.events);
        tracing::debug!(
            total = self.events.len(),
            visible = self.filtered.len(),
            "refiltered calendar events"
        );
    }

    pub fn navigate(&mut self, action: NavAction, now: DateTime<Utc>) {
        self.nav.apply(action, now);
    }

    pub fn step(&mut self, delta: i32) {
        self.nav.step(delta);
    }

    #[must_use]
    pub const fn nav(&self) -> &NavState {
        &self.nav
    }

    #[must_use]
    pub const fn filter(&self) -> &EventFilter {
        &self.filter
    }

    #[must_use]
    pub fn entities(&self) -> &[EntityRecord] {
        &self.entities
    }

    /// Full synthesized set, before filtering.
    #[must_use]
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    #[must_use]
    pub fn filtered(&self) -> &[CalendarEvent] {
        &self.filtered
    }

    /// Rolling 7-day agenda over the filtered set.
    #[must_use]
    pub fn agenda(&self, now: DateTime<Utc>) -> Vec<CalendarEvent> {
        nav::agenda(&self.filtered, now)
    }

    /// Filtered events inside the current navigation window.
    ///
    /// The agenda granularity yields the sorted agenda anchored at the
    /// current date.
    #[must_use]
    pub fn visible_events(&self) -> Vec<CalendarEvent> {
        let window = self.nav.visible_range();
        if window.inclusive_end {
            return nav::agenda(&self.filtered, window.start);
        }
        nav::events_in_range(&self.filtered, &window)
    }

    /// Event-detail hand-off. Looks in the full set so a selection survives
    /// a filter change.
    #[must_use]
    pub fn select(&self, event_id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|event| event.id == event_id)
    }

    /// The source record behind an event.
    #[must_use]
    pub fn source_entity(&self, event: &CalendarEvent) -> Option<&EntityRecord> {
        let entity_id = event.entity_id()?;
        self.entities.iter().find(|entity| entity.id == entity_id)
    }

    /// Filtered events paired with their render style.
    #[must_use]
    pub fn styled(&self) -> Vec<(&CalendarEvent, StyleDescriptor)> {
        self.filtered
            .iter()
            .map(|event| (event, style::style_of(event)))
            .collect()
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&SourceNotice> {
        self.notice.as_ref()
    }
}
