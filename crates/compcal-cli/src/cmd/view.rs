//! `compcal view`: one navigation window of the calendar.

use crate::cmd::{
    FilterArgs, RunContext, SourceArgs, filter_meta, heading_with_filter, parse_granularity,
    parse_instant,
};
use crate::output::write_events;
use chrono::{DateTime, Utc};
use clap::Args;
use compcal_core::nav::{Granularity, NavAction};

#[derive(Args, Debug)]
pub struct ViewArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Window size: day, week, month, or agenda.
    #[arg(short, long, default_value = "month", value_parser = parse_granularity)]
    pub granularity: Granularity,

    /// Date to center the view on. Defaults to `--now`.
    #[arg(short, long, value_parser = parse_instant)]
    pub date: Option<DateTime<Utc>>,

    /// Move this many windows forward (negative for back).
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub step: i32,
}

pub fn run_view(args: &ViewArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let mut engine = ctx.engine(&args.source, &args.filter);
    engine.navigate(NavAction::SetGranularity(args.granularity), ctx.now);
    engine.navigate(NavAction::Today, args.date.unwrap_or(ctx.now));
    engine.step(args.step);

    let nav = *engine.nav();
    let window = nav.visible_range();
    let events = engine.visible_events();

    let mut meta = filter_meta(engine.filter());
    meta.insert("title".to_string(), nav.title().into());
    meta.insert("granularity".to_string(), nav.granularity.as_str().into());
    meta.insert("from".to_string(), serde_json::to_value(window.start)?);
    meta.insert("to".to_string(), serde_json::to_value(window.end)?);

    let heading = heading_with_filter(&nav.title(), engine.filter());
    write_events(&mut std::io::stdout().lock(), ctx.output, &heading, &events, meta)
}
