mod commands;
mod logging;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use touhou_calendar_core::Settings;

#[derive(Parser)]
#[command(name = "touhou-calendar")]
#[command(version)]
#[command(about = "Build a subscribable .ics calendar from Touhou day records")]
struct Cli {
    /// Config file (defaults to ./touhou-calendar.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing 1.yaml .. 12.yaml (overrides the config)
    #[arg(long, global = true)]
    days_dir: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the calendar file (the default)
    Build {
        /// Where to write the .ics file (overrides the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate the day records without writing anything
    Check,
    /// Print the loaded day records
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config {
        /// Write a commented default config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Must work without a loadable config
    if let Some(Commands::Config { init: true }) = cli.command {
        logging::init("info", cli.verbose);
        return commands::config::init(cli.config.as_deref());
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(days_dir) = cli.days_dir {
        settings.days_dir = days_dir;
    }

    logging::init(&settings.log_level, cli.verbose);
    tracing::debug!(?settings, "Settings loaded");

    match cli.command.unwrap_or(Commands::Build { output: None }) {
        Commands::Build { output } => {
            if let Some(output) = output {
                settings.output = output;
            }
            commands::build::run(&settings)
        }
        Commands::Check => commands::check::run(&settings),
        Commands::List { json } => commands::list::run(&settings, json),
        Commands::Config { .. } => commands::config::show(&settings, cli.config.as_deref()),
    }
}
