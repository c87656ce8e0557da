//! compcal-core library.
//!
//! Derives a calendar from a snapshot of tracked components: every component
//! yields a deadline, a review, an optional development span, and sometimes a
//! meeting. The derived set can be filtered, styled, and windowed for display.
//!
//! # Conventions
//!
//! - **Errors**: derivation is total and never returns `Result`. Only the
//!   entity source seam ([`source`]) and config loading ([`config`]) fail,
//!   and callers degrade to an empty calendar.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod model;
pub mod nav;
pub mod source;
pub mod style;
pub mod synth;

pub use engine::CalendarEngine;
pub use filter::EventFilter;
pub use model::entity::{EntityRecord, LifecycleStatus};
pub use model::event::{CalendarEvent, EventKind};
pub use nav::{Granularity, NavAction, NavState, agenda};
pub use source::EntitySource;
pub use style::{StyleDescriptor, classify, style_for};
pub use synth::{Synthesizer, synthesize};
