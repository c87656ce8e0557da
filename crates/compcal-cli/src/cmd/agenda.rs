//! `compcal agenda`: the rolling week ahead.

use crate::cmd::{FilterArgs, RunContext, SourceArgs, filter_meta, heading_with_filter};
use crate::output::write_events;
use clap::Args;
use compcal_core::nav::agenda_window;

#[derive(Args, Debug)]
pub struct AgendaArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run_agenda(args: &AgendaArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let engine = ctx.engine(&args.source, &args.filter);
    let events = engine.agenda(ctx.now);
    let window = agenda_window(ctx.now);

    let mut meta = filter_meta(engine.filter());
    meta.insert("from".to_string(), serde_json::to_value(window.start)?);
    meta.insert("to".to_string(), serde_json::to_value(window.end)?);

    let heading = heading_with_filter(
        &format!(
            "Agenda {} to {}",
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d")
        ),
        engine.filter(),
    );
    write_events(&mut std::io::stdout().lock(), ctx.output, &heading, &events, meta)
}
