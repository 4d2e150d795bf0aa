//! Almanac command-line entry point

use std::path::PathBuf;

use almanac::Config;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// Almanac: time-zone-aware appointment calendar views
#[derive(Parser, Debug)]
#[command(name = "almanac")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable JSON logging format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place appointments onto a month grid
    Month {
        /// Month to show (YYYY-MM)
        month: String,
        /// JSON file containing an array of appointment records
        #[arg(short, long)]
        file: PathBuf,
    },
    /// List appointments grouped by day
    Days {
        /// JSON file containing an array of appointment records
        #[arg(short, long)]
        file: PathBuf,
        /// Group by start date only instead of every day touched
        #[arg(long)]
        by_start: bool,
    },
    /// Show the Sunday-first week containing a date
    Week {
        /// Any date in the week (YYYY-MM-DD)
        date: String,
        /// JSON file containing an array of appointment records
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Convert a wall-clock reading between time zones
    Convert {
        /// Date and time (YYYY-MM-DDTHH:MM)
        datetime: String,
        /// Source zone (defaults to the configured default zone)
        #[arg(long)]
        from: Option<String>,
        /// Target zone (defaults to calendar.display_zone)
        #[arg(long)]
        to: Option<String>,
    },
}

fn init_logging(config: &Config, json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_ascii_lowercase()));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    init_logging(&config, args.json_logs);
    config.apply()?;

    match args.command {
        Command::Month { month, file } => cli::run_month(&file, &month, args.json),
        Command::Days { file, by_start } => cli::run_days(&file, by_start, args.json),
        Command::Week { date, file } => cli::run_week(&file, &date, args.json),
        Command::Convert { datetime, from, to } => cli::run_convert(
            &config,
            &datetime,
            from.as_deref(),
            to.as_deref(),
            args.json,
        ),
    }
}
