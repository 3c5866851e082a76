// Headless CLI for instructor name resolution

mod exit_codes;
mod names;
mod resolve;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use exit_codes::{EXIT_RESOLVE_RUNTIME, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "profmatch")]
#[command(about = "Match instructor rating records to course catalog names")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Debug logging (RUST_LOG still wins when set)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Only warnings and errors; no human summary
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every source record against the reference catalog
    #[command(after_help = "\
Examples:
  profmatch run catalog.resolve.toml
  profmatch run catalog.resolve.toml --json
  profmatch run catalog.resolve.toml --output result.json
  profmatch run catalog.resolve.toml --strict --quiet")]
    Run {
        /// Path to the .resolve.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit 62 when any record is left unmatched
        #[arg(long)]
        strict: bool,
    },

    /// Validate a resolve config without running
    #[command(after_help = "\
Examples:
  profmatch validate catalog.resolve.toml")]
    Validate {
        /// Path to the .resolve.toml config file
        config: PathBuf,
    },

    /// Print the canonical form and variations of raw names
    #[command(after_help = "\
Examples:
  profmatch normalize 'Dr. Debra (Deb) Smith'
  profmatch normalize 'Prof. Ana Maria Lopez' 'John O'\\''Brien Jr.' --json")]
    Normalize {
        /// Raw names to clean
        #[arg(required = true)]
        names: Vec<String>,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Match one name against the instructors column of a CSV
    #[command(after_help = "\
Examples:
  profmatch match 'Jon Smith' --pool sections.csv
  profmatch match 'Smith, John' --pool sections.csv --column teachers --cutoff 70
  profmatch match 'Ana Lopez' --pool sections.csv --exhaustive --json")]
    Match {
        /// Raw name to resolve
        name: String,

        /// CSV file holding the reference names
        #[arg(long)]
        pool: PathBuf,

        /// Column with the comma-separated instructor list
        #[arg(long, default_value = "instructors")]
        column: String,

        /// Separator between names inside one cell
        #[arg(long)]
        separator: Option<String>,

        /// Minimum fuzzy score (default 80)
        #[arg(long)]
        cutoff: Option<u8>,

        /// Score every variation instead of stopping at the first strong hit
        #[arg(long)]
        exhaustive: bool,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  profmatch-resolve ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  profmatch-resolve ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: profmatch <command> [options]");
            eprintln!("       profmatch --help for more information");
            Ok(())
        }
        Some(Commands::Run { config, json, output, strict }) => {
            resolve::cmd_run(config, json, output, strict, cli.quiet)
        }
        Some(Commands::Validate { config }) => resolve::cmd_validate(config),
        Some(Commands::Normalize { names, json }) => names::cmd_normalize(names, json),
        Some(Commands::Match { name, pool, column, separator, cutoff, exhaustive, json }) => {
            names::cmd_match(names::MatchArgs { name, pool, column, separator, cutoff, exhaustive, json })
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_RESOLVE_RUNTIME, message: msg.into(), hint: None }
    }
}
