//! `compcal events`: every synthesized event that passes the filter.

use crate::cmd::{FilterArgs, RunContext, SourceArgs, filter_meta, heading_with_filter};
use crate::output::write_events;
use clap::Args;

#[derive(Args, Debug)]
pub struct EventsArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub fn run_events(args: &EventsArgs, ctx: &RunContext) -> anyhow::Result<()> {
    let engine = ctx.engine(&args.source, &args.filter);
    let heading = heading_with_filter("Events", engine.filter());
    let meta = filter_meta(engine.filter());
    write_events(
        &mut std::io::stdout().lock(),
        ctx.output,
        &heading,
        engine.filtered(),
        meta,
    )
}
