#![forbid(unsafe_code)]

mod cmd;
mod output;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use compcal_core::config::resolve_config;
use output::{OutputMode, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "compcal: calendar view over component tracking data",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the per-user one.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Emit JSON output (shorthand for `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Reference instant, RFC 3339 or YYYY-MM-DD. Defaults to the current time.
    #[arg(long, global = true, value_parser = cmd::parse_instant)]
    now: Option<DateTime<Utc>>,

    /// Seed for reproducible meeting placement.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Do not generate meeting events.
    #[arg(long, global = true)]
    no_meetings: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "List calendar events",
        long_about = "Synthesize calendar events from a component snapshot and list them in order.",
        after_help = "EXAMPLES:\n    # Every event for the snapshot\n    compcal events --file components.json\n\n    # Reviews mentioning the navbar\n    compcal events --file components.json --kind review --search navbar\n\n    # Emit machine-readable output\n    compcal events --file components.json --format json"
    )]
    Events(cmd::events::EventsArgs),

    #[command(
        about = "Show the upcoming week",
        long_about = "Events starting within the next seven days, soonest first.",
        after_help = "EXAMPLES:\n    # The week ahead\n    compcal agenda --file components.json\n\n    # As of a fixed date\n    compcal --now 2024-01-03 agenda --file components.json"
    )]
    Agenda(cmd::agenda::AgendaArgs),

    #[command(
        about = "Show a day, week, or month",
        long_about = "Events inside one navigation window of the calendar.",
        after_help = "EXAMPLES:\n    # This month\n    compcal view --file components.json\n\n    # Next week\n    compcal view --file components.json --granularity week --step 1\n\n    # A specific day\n    compcal view --file components.json --granularity day --date 2024-01-15"
    )]
    View(cmd::view::ViewArgs),

    #[command(
        about = "Show one event",
        long_about = "Show full details for a single event and the component behind it.",
        after_help = "EXAMPLES:\n    # Show a deadline\n    compcal show --file components.json 42-deadline"
    )]
    Show(cmd::show::ShowArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("COMPCAL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "compcal=debug,info"
        } else {
            "compcal=info,warn"
        })
    });

    let format = env::var("COMPCAL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let mut config = resolve_config(cli.config.as_deref()).context("loading configuration")?;
    if cli.seed.is_some() {
        config.meetings.seed = cli.seed;
    }
    if cli.no_meetings {
        config.meetings.enabled = false;
    }

    let output = resolve_output_mode(cli.format, cli.json, config.output.format.as_deref());
    let ctx = cmd::RunContext {
        config,
        now: cli.now.unwrap_or_else(Utc::now),
        output,
    };

    match cli.command {
        Commands::Events(ref args) => cmd::events::run_events(args, &ctx),
        Commands::Agenda(ref args) => cmd::agenda::run_agenda(args, &ctx),
        Commands::View(ref args) => cmd::view::run_view(args, &ctx),
        Commands::Show(ref args) => cmd::show::run_show(args, &ctx),
    }
}
