//! `compcal show`: full details of one event and its component.

use crate::cmd::{FilterArgs, RunContext, SourceArgs};
use crate::output::{EventRow, OutputMode, pretty_kv, pretty_rule, pretty_section, when};
use clap::Args;
use compcal_core::error::ErrorCode;
use compcal_core::model::entity::EntityRecord;
use serde::Serialize;
use std::io::Write;

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Event ID to display, e.g. "42-deadline".
    pub id: String,
}

#[derive(Debug, Serialize)]
struct ShowEvent<'a> {
    #[serde(flatten)]
    event: EventRow<'a>,
    component: Option<&'a EntityRecord>,
}

pub fn run_show(args: &ShowArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let engine = ctx.engine(&args.source, &FilterArgs::default());
    let Some(event) = engine.select(&args.id) else {
        anyhow::bail!(
            "{}: {} '{}'\n  hint: {}",
            ErrorCode::EventNotFound,
            ErrorCode::EventNotFound.message(),
            args.id,
            ErrorCode::EventNotFound.hint().unwrap_or_default()
        );
    };
    let component = engine.source_entity(event);
    let row = EventRow::from(event);

    let mut out = std::io::stdout().lock();
    match ctx.output {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, &ShowEvent { event: row, component })?;
            writeln!(out)?;
        }
        OutputMode::Text => {
            writeln!(out, "id\t{}", row.id)?;
            writeln!(out, "title\t{}", row.title)?;
            writeln!(out, "kind\t{}", row.kind)?;
            writeln!(out, "start\t{}", row.start.to_rfc3339())?;
            writeln!(out, "end\t{}", row.end.to_rfc3339())?;
            writeln!(out, "all_day\t{}", row.all_day)?;
            writeln!(out, "status\t{}", row.status)?;
            writeln!(out, "priority\t{}", row.priority.unwrap_or_default())?;
            writeln!(out, "description\t{}", row.description)?;
        }
        OutputMode::Pretty => {
            pretty_section(&mut out, &format!("{} ({})", row.title, row.id))?;
            pretty_kv(&mut out, "Kind", row.kind.label())?;
            pretty_kv(&mut out, "When", when(event))?;
            pretty_kv(&mut out, "All day", if row.all_day { "yes" } else { "no" })?;
            pretty_kv(&mut out, "Status", row.status)?;
            if let Some(priority) = row.priority {
                pretty_kv(&mut out, "Priority", priority)?;
            }
            pretty_kv(&mut out, "Color", row.style.background)?;
            pretty_rule(&mut out)?;
            writeln!(out, "{}", row.description)?;
            if let Some(component) = component {
                pretty_rule(&mut out)?;
                pretty_kv(&mut out, "Component", &component.name)?;
                pretty_kv(&mut out, "ID", &component.id)?;
                pretty_kv(
                    &mut out,
                    "Modified",
                    component.last_modified.as_deref().unwrap_or("unknown"),
                )?;
            }
        }
    }
    Ok(())
}
