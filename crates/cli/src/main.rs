mod commands;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// blockMeshDict parsing and validation toolchain.
#[derive(Parser)]
#[command(
    name = "hexdict",
    version,
    about = "blockMeshDict parsing and validation toolchain"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a dictionary and print the resulting model
    Parse {
        /// Path to the blockMeshDict file
        file: PathBuf,
    },

    /// Parse and validate a dictionary; non-zero exit on any diagnostic
    Validate {
        /// Path to the blockMeshDict file
        file: PathBuf,
    },

    /// Print vertex/edge/face/block counts for a dictionary
    Stats {
        /// Path to the blockMeshDict file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Parse { file } => commands::parse::cmd_parse(&file, cli.output, cli.quiet),
        Commands::Validate { file } => {
            commands::validate::cmd_validate(&file, cli.output, cli.quiet)
        }
        Commands::Stats { file } => commands::stats::cmd_stats(&file, cli.output, cli.quiet),
    }
}

/// Read the dictionary file, exiting with a boundary error on I/O failure.
pub(crate) fn read_dict(path: &Path, output: OutputFormat, quiet: bool) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            report_error(
                &format!("error reading file '{}': {}", path.display(), e),
                output,
                quiet,
            );
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(message: &str, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": message }));
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("{}", message);
            }
        }
    }
}
