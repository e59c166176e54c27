use clap::{ArgAction, Parser, Subcommand};
use commands::{check, key, ttl};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "gmt")]
#[command(about = "Inspect global tombstone suppression decisions")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to a daily-rotated file instead of stderr (defaults to logs/gmt.log in the config directory)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical tombstone key of an entity
    #[command(long_about = "Read an entity record (JSON with an `ids` object and optional type, title and year) and print the key tombstones are recorded under. Use '-' to read the record from stdin.")]
    Key {
        /// Entity JSON file, or '-' for stdin
        #[arg(value_name = "ENTITY")]
        entity: String,

        /// Normalize identifiers and parse provider GUIDs before keying
        #[arg(long, action = ArgAction::SetTrue)]
        normalize: bool,
    },
    /// Show the effective quarantine window per feature
    #[command(long_about = "Resolve the quarantine window for each feature from the configuration file, applying per-feature seconds, per-feature days, the global day count and the built-in defaults in that order.")]
    Ttl {
        /// Config file (defaults to the standard config location)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Feature to resolve (repeatable; defaults to all known features)
        #[arg(long = "feature", value_name = "FEATURE")]
        features: Vec<String>,
    },
    /// Evaluate whether a positive write would be suppressed
    #[command(long_about = "Evaluate the suppression decision for one entity and write against a tombstone document. The decision is read-only; nothing is written back.")]
    Check(check::CheckArgs),
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .map(|path| path.unwrap_or_else(|| commands::default_paths().log_file()));
    logging::init_logging(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Key { entity, normalize } => key::run_key(&entity, normalize, &output),
        Commands::Ttl { config, features } => ttl::run_ttl(config, features, &output),
        Commands::Check(args) => check::run_check(args, &output),
    }
}
