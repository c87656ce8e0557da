use chrono::{DateTime, Duration, TimeZone, Utc};
use compcal_core::filter::EventFilter;
use compcal_core::model::entity::parse_timestamp;
use compcal_core::model::event::{CalendarEvent, EventKind};
use compcal_core::nav::agenda;
use compcal_core::synth::{DEADLINE_OFFSET_DAYS, REVIEW_OFFSET_DAYS, Synthesizer};
use proptest::prelude::*;

use generators::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn of_kind<'a>(
    events: &'a [CalendarEvent],
    entity_id: &str,
    kind: EventKind,
) -> Vec<&'a CalendarEvent> {
    let id = CalendarEvent::derive_id(entity_id, kind);
    events.iter().filter(|e| e.id == id).collect()
}

fn without_meetings(events: Vec<CalendarEvent>) -> Vec<CalendarEvent> {
    events
        .into_iter()
        .filter(|e| e.kind != Some(EventKind::Meeting))
        .collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn every_entity_gets_one_deadline_and_one_review(
        entities in arb_entities(),
        seed in any::<u64>(),
    ) {
        let events = Synthesizer::seeded(seed).synthesize(&entities, now());
        let deadlines = events.iter().filter(|e| e.kind == Some(EventKind::Deadline)).count();
        let reviews = events.iter().filter(|e| e.kind == Some(EventKind::Review)).count();
        prop_assert_eq!(deadlines, entities.len());
        prop_assert_eq!(reviews, entities.len());
        for entity in &entities {
            prop_assert_eq!(of_kind(&events, &entity.id, EventKind::Deadline).len(), 1);
            prop_assert_eq!(of_kind(&events, &entity.id, EventKind::Review).len(), 1);
        }
    }

    #[test]
    fn offsets_are_fixed(entities in arb_entities()) {
        let events = Synthesizer::without_meetings().synthesize(&entities, now());
        for entity in &entities {
            let modified = parse_timestamp(entity.last_modified.as_deref().unwrap()).unwrap();
            let deadline = of_kind(&events, &entity.id, EventKind::Deadline)[0];
            let review = of_kind(&events, &entity.id, EventKind::Review)[0];
            prop_assert_eq!(deadline.start - modified, Duration::days(DEADLINE_OFFSET_DAYS));
            prop_assert_eq!(review.start - modified, Duration::days(REVIEW_OFFSET_DAYS));
        }
    }

    #[test]
    fn development_span_iff_in_progress_family(entities in arb_entities()) {
        let events = Synthesizer::without_meetings().synthesize(&entities, now());
        for entity in &entities {
            let dev = of_kind(&events, &entity.id, EventKind::Development);
            if entity.lifecycle().is_in_progress_family() {
                prop_assert_eq!(dev.len(), 1);
                let deadline = of_kind(&events, &entity.id, EventKind::Deadline)[0];
                let modified = parse_timestamp(entity.last_modified.as_deref().unwrap()).unwrap();
                prop_assert_eq!(dev[0].start, modified);
                prop_assert_eq!(dev[0].end, deadline.start);
                prop_assert!(!dev[0].all_day);
            } else {
                prop_assert!(dev.is_empty());
            }
        }
    }

    #[test]
    fn start_never_after_end(entities in arb_entities(), seed in any::<u64>()) {
        for event in Synthesizer::seeded(seed).synthesize(&entities, now()) {
            prop_assert!(event.start <= event.end, "{} starts after it ends", event.id);
        }
    }

    #[test]
    fn all_day_events_start_and_end_on_one_day(entities in arb_entities(), seed in any::<u64>()) {
        for event in Synthesizer::seeded(seed).synthesize(&entities, now()) {
            if event.all_day {
                prop_assert_eq!(
                    event.start.date_naive(),
                    event.end.date_naive(),
                    "{} is all-day but spans several days",
                    event.id
                );
            }
        }
    }

    #[test]
    fn resynthesis_is_idempotent_outside_meetings(
        entities in arb_entities(),
        a in any::<u64>(),
        b in any::<u64>(),
    ) {
        let first = without_meetings(Synthesizer::seeded(a).synthesize(&entities, now()));
        let second = without_meetings(Synthesizer::seeded(b).synthesize(&entities, now()));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn filters_compose(
        events in arb_events(),
        query in "[a-z]{0,3}",
        status in arb_status(),
        kind in arb_kind(),
    ) {
        let staged = EventFilter::default()
            .with_status(status.clone())
            .apply(&EventFilter::search(query.clone()).apply(&events));
        let combined = EventFilter::search(query.clone())
            .with_status(status.clone())
            .apply(&events);
        prop_assert_eq!(&staged, &combined);

        let reordered = EventFilter::search(query.clone())
            .apply(&EventFilter::default().with_kind(kind).apply(&events));
        let together = EventFilter::search(query).with_kind(kind).apply(&events);
        prop_assert_eq!(reordered, together);
    }

    #[test]
    fn filter_preserves_input_order(events in arb_events(), query in "[a-z]{0,2}") {
        let filtered = EventFilter::search(query).apply(&events);
        let mut cursor = events.iter();
        for kept in &filtered {
            prop_assert!(cursor.any(|e| e == kept));
        }
    }

    #[test]
    fn agenda_is_a_sorted_window(events in arb_events(), now in arb_instant()) {
        let upcoming = agenda(&events, now);
        let horizon = now + Duration::days(7);
        for event in &upcoming {
            prop_assert!(event.start >= now && event.start <= horizon);
        }
        for pair in upcoming.windows(2) {
            prop_assert!(pair[0].start <= pair[1].start);
        }
        let expected = events
            .iter()
            .filter(|e| e.start >= now && e.start <= horizon)
            .count();
        prop_assert_eq!(upcoming.len(), expected);
    }
}
