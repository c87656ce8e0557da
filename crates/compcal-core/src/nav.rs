//! Navigation state and time windows.
//!
//! `NavState` tracks the displayed date and granularity. Day, week, and
//! month views step by one unit; the agenda view is a rolling 7-day window
//! that does not step.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::model::event::CalendarEvent;
use crate::model::{ParseEnumError, normalize};

/// Length of the rolling agenda window.
pub const AGENDA_WINDOW_DAYS: i64 = 7;

/// Display unit controlling date stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
    Agenda,
}

impl Granularity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Agenda => "agenda",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "agenda" => Ok(Self::Agenda),
            _ => Err(ParseEnumError {
                expected: "granularity",
                got: s.to_string(),
            }),
        }
    }
}

/// Navigation input from the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Prev,
    Next,
    Today,
    SetGranularity(Granularity),
}

/// A span of time shown by a view.
///
/// Day, week, and month windows are half-open `[start, end)`; the agenda
/// window includes `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub inclusive_end: bool,
}

impl TimeWindow {
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && (at < self.end || (self.inclusive_end && at == self.end))
    }

    /// True when `[start, end]` of an event touches this window.
    #[must_use]
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let before_end = if self.inclusive_end {
            start <= self.end
        } else {
            start < self.end
        };
        before_end && end >= self.start
    }
}

/// Currently displayed date and granularity.
///
/// Not persisted: a fresh shell starts at [`NavState::today`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavState {
    pub current: DateTime<Utc>,
    pub granularity: Granularity,
}

impl NavState {
    /// Month view on `now`.
    #[must_use]
    pub fn today(now: DateTime<Utc>) -> Self {
        Self {
            current: now,
            granularity: Granularity::Month,
        }
    }

    /// Apply one action. Changing granularity keeps the current date.
    pub fn apply(&mut self, action: NavAction, now: DateTime<Utc>) {
        match action {
            NavAction::Prev => self.step(-1),
            NavAction::Next => self.step(1),
            NavAction::Today => self.current = now,
            NavAction::SetGranularity(granularity) => self.granularity = granularity,
        }
        tracing::trace!(
            current = %self.current,
            granularity = %self.granularity,
            ?action,
            "navigated"
        );
    }

    /// Move `delta` units of the current granularity. Agenda ignores stepping.
    ///
    /// Stepping past the representable range leaves the date unchanged.
    pub fn step(&mut self, delta: i32) {
        let magnitude = delta.unsigned_abs();
        let stepped = match self.granularity {
            Granularity::Agenda => return,
            Granularity::Month => {
                if delta >= 0 {
                    self.current.checked_add_months(Months::new(magnitude))
                } else {
                    self.current.checked_sub_months(Months::new(magnitude))
                }
            }
            Granularity::Week => Duration::try_days(i64::from(delta) * 7)
                .and_then(|d| self.current.checked_add_signed(d)),
            Granularity::Day => Duration::try_days(i64::from(delta))
                .and_then(|d| self.current.checked_add_signed(d)),
        };
        if let Some(current) = stepped {
            self.current = current;
        }
    }

    /// The window this state displays.
    ///
    /// Weeks start on Monday. Calendar boundaries are taken in UTC.
    #[must_use]
    pub fn visible_range(&self) -> TimeWindow {
        let date = self.current.date_naive();
        let (start, end) = match self.granularity {
            Granularity::Agenda => return agenda_window(self.current),
            Granularity::Day => (Some(date), date.succ_opt()),
            Granularity::Week => {
                let offset = i64::from(date.weekday().num_days_from_monday());
                let monday = date.checked_sub_signed(Duration::days(offset));
                (monday, monday.and_then(|m| m.checked_add_signed(Duration::days(7))))
            }
            Granularity::Month => {
                let first = date.with_day(1);
                (first, first.and_then(|f| f.checked_add_months(Months::new(1))))
            }
        };
        TimeWindow {
            start: start.map_or(DateTime::<Utc>::MIN_UTC, midnight),
            end: end.map_or(DateTime::<Utc>::MAX_UTC, midnight),
            inclusive_end: false,
        }
    }

    /// Human label for the displayed window.
    #[must_use]
    pub fn title(&self) -> String {
        let date = self.current.date_naive();
        match self.granularity {
            Granularity::Month => date.format("%B %Y").to_string(),
            Granularity::Week => {
                let start = self.visible_range().start.date_naive();
                format!("Week of {}", start.format("%Y-%m-%d"))
            }
            Granularity::Day => date.format("%A, %Y-%m-%d").to_string(),
            Granularity::Agenda => format!("Agenda from {}", date.format("%Y-%m-%d")),
        }
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// The rolling `[now, now + 7 days]` window.
#[must_use]
pub fn agenda_window(now: DateTime<Utc>) -> TimeWindow {
    TimeWindow {
        start: now,
        end: now
            .checked_add_signed(Duration::days(AGENDA_WINDOW_DAYS))
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
        inclusive_end: true,
    }
}

/// Events starting within the next 7 days, sorted by start.
///
/// Ties keep input order. Callers pass the filtered set.
#[must_use]
pub fn agenda(events: &[CalendarEvent], now: DateTime<Utc>) -> Vec<CalendarEvent> {
    let window = agenda_window(now);
    let mut upcoming: Vec<CalendarEvent> = events
        .iter()
        .filter(|event| window.contains(event.start))
        .cloned()
        .collect();
    upcoming.sort_by_key(|event| event.start);
    upcoming
}

/// Events overlapping `window`, in input order.
#[must_use]
pub fn events_in_range(events: &[CalendarEvent], window: &TimeWindow) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|event| window.overlaps(event.start, event.end))
        .cloned()
        .collect()
}
