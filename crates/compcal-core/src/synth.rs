//! Event synthesis: component snapshot → calendar events.
//!
//! Every component yields one deadline and one review. Components in the
//! in-progress family also get a development span from their last
//! modification to the deadline. A configurable share of components get a
//! meeting on a random day inside the review/deadline fortnight.
//!
//! Apart from meetings, output is a pure function of the snapshot: the same
//! record always yields the same ids, starts, and ends.

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::fmt;

use crate::config::MeetingConfig;
use crate::model::entity::EntityRecord;
use crate::model::event::{CalendarEvent, EventKind};

/// Days from last modification to the review.
pub const REVIEW_OFFSET_DAYS: i64 = 7;
/// Days from last modification to the deadline.
pub const DEADLINE_OFFSET_DAYS: i64 = 14;

const MEETING_SLOT_MINUTES: u32 = 30;

/// Builds calendar events from component records.
///
/// Owns the randomness behind meeting events so everything else stays
/// deterministic. Use [`Synthesizer::without_meetings`] or a seeded
/// constructor where output must be reproducible.
pub struct Synthesizer {
    meetings: Option<MeetingGenerator>,
}

struct MeetingGenerator {
    config: MeetingConfig,
    rng: Box<dyn RngCore + Send>,
}

impl fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synthesizer")
            .field("meetings", &self.meetings.as_ref().map(|m| &m.config))
            .finish()
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::from_config(&MeetingConfig::default())
    }
}

impl Synthesizer {
    /// Synthesizer honouring a meeting config. A configured seed makes
    /// meetings reproducible; otherwise the RNG is seeded from entropy.
    #[must_use]
    pub fn from_config(config: &MeetingConfig) -> Self {
        if !config.enabled {
            return Self::without_meetings();
        }
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self::with_rng(config, rng)
    }

    /// Deterministic synthesizer: never emits meetings.
    #[must_use]
    pub const fn without_meetings() -> Self {
        Self { meetings: None }
    }

    /// Default meeting settings driven by a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(&MeetingConfig::default(), StdRng::seed_from_u64(seed))
    }

    /// Inject an arbitrary randomness source.
    pub fn with_rng(config: &MeetingConfig, rng: impl RngCore + Send + 'static) -> Self {
        let config = config.clamped();
        if !config.enabled {
            return Self::without_meetings();
        }
        Self {
            meetings: Some(MeetingGenerator {
                config,
                rng: Box::new(rng),
            }),
        }
    }

    #[must_use]
    pub const fn meetings_enabled(&self) -> bool {
        self.meetings.is_some()
    }

    /// Derive the full event set for a snapshot.
    ///
    /// Records with a missing or unparseable `lastModified` are anchored at
    /// `now`. The input is never modified.
    pub fn synthesize(
        &mut self,
        entities: &[EntityRecord],
        now: DateTime<Utc>,
    ) -> Vec<CalendarEvent> {
        let mut events = Vec::with_capacity(entities.len() * 3);
        for entity in entities {
            self.events_for_into(entity, now, &mut events);
        }
        tracing::debug!(
            entities = entities.len(),
            events = events.len(),
            "synthesized calendar events"
        );
        events
    }

    /// Events derived from a single record.
    pub fn events_for(
        &mut self,
        entity: &EntityRecord,
        now: DateTime<Utc>,
    ) -> Vec<CalendarEvent> {
        let mut events = Vec::with_capacity(4);
        self.events_for_into(entity, now, &mut events);
        events
    }

    fn events_for_into(
        &mut self,
        entity: &EntityRecord,
        now: DateTime<Utc>,
        out: &mut Vec<CalendarEvent>,
    ) {
        let mut modified = entity.last_modified_at(now);
        // Timestamps at the edge of the representable range fall back to now.
        if modified
            .checked_add_signed(Duration::days(DEADLINE_OFFSET_DAYS + 1))
            .is_none()
        {
            tracing::warn!(entity = %entity.id, "lastModified out of range, using current time");
            modified = now;
        }
        let deadline = modified + Duration::days(DEADLINE_OFFSET_DAYS);
        let review = modified + Duration::days(REVIEW_OFFSET_DAYS);

        out.push(all_day(
            entity,
            EventKind::Deadline,
            deadline,
            format!("Deadline for {}", entity.name),
        ));
        out.push(all_day(
            entity,
            EventKind::Review,
            review,
            format!("Scheduled review of {}", entity.name),
        ));

        // Multi-day span, so timed rather than all-day.
        if entity.lifecycle().is_in_progress_family() {
            out.push(timed(
                entity,
                EventKind::Development,
                modified,
                deadline,
                format!("{} is {}", entity.name, entity.status),
            ));
        }

        if let Some(generator) = self.meetings.as_mut() {
            out.extend(generator.maybe_meeting(entity, modified));
        }
    }
}

/// Derive events with default meeting behaviour (fresh entropy).
#[must_use]
pub fn synthesize(entities: &[EntityRecord], now: DateTime<Utc>) -> Vec<CalendarEvent> {
    Synthesizer::default().synthesize(entities, now)
}

impl MeetingGenerator {
    fn maybe_meeting(
        &mut self,
        entity: &EntityRecord,
        modified: DateTime<Utc>,
    ) -> Option<CalendarEvent> {
        if !self.rng.gen_bool(self.config.probability) {
            return None;
        }

        let day_offset = self.rng.gen_range(1..DEADLINE_OFFSET_DAYS);
        let day = modified.with_timezone(&Local).date_naive() + Duration::days(day_offset);

        let window = (self.config.last_hour - self.config.first_hour) * 60;
        let latest_start = window - self.config.duration_minutes;
        let slot = self.rng.gen_range(0..=latest_start / MEETING_SLOT_MINUTES);
        let start_minute = self.config.first_hour * 60 + slot * MEETING_SLOT_MINUTES;

        let start_naive = day.and_hms_opt(start_minute / 60, start_minute % 60, 0)?;
        let end_naive = start_naive + Duration::minutes(i64::from(self.config.duration_minutes));

        let (Some(start), Some(end)) = (local_to_utc(start_naive), local_to_utc(end_naive)) else {
            tracing::debug!(entity = %entity.id, %day, "meeting falls in a DST gap, skipped");
            return None;
        };

        Some(timed(
            entity,
            EventKind::Meeting,
            start,
            end,
            format!("Sync on {} progress", entity.name),
        ))
    }
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Single-day marker: `start == end`.
fn all_day(
    entity: &EntityRecord,
    kind: EventKind,
    at: DateTime<Utc>,
    description: String,
) -> CalendarEvent {
    CalendarEvent {
        all_day: true,
        ..timed(entity, kind, at, at, description)
    }
}

fn timed(
    entity: &EntityRecord,
    kind: EventKind,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    description: String,
) -> CalendarEvent {
    CalendarEvent {
        id: CalendarEvent::derive_id(&entity.id, kind),
        title: title(entity, kind),
        start,
        end,
        all_day: false,
        status: entity.status.clone(),
        priority: entity.priority.clone(),
        description: describe(entity, description),
        kind: Some(kind),
    }
}

fn title(entity: &EntityRecord, kind: EventKind) -> String {
    format!("{} {}", entity.name, kind.label())
}

fn describe(entity: &EntityRecord, base: String) -> String {
    match entity.priority.as_deref() {
        Some(priority) if !priority.trim().is_empty() => {
            format!("{base} (priority: {priority})")
        }
        _ => base,
    }
}
