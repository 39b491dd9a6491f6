use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use plumb_core::enums::Location;

pub mod global;

pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `plumb` binary.
#[derive(Debug, Parser)]
#[command(
    name = "plumb",
    version,
    about = "Plumbing Forensics - guided root cause analysis for water leaks"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, text
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// OpenAI API key for this run (overrides config and environment)
    #[arg(long, global = true)]
    pub api_key: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            api_key: self.api_key.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Walk through a case interactively.
    Run(RunArgs),
    /// Resolve an address against the property table.
    Lookup {
        /// Street address, matched case-insensitively.
        address: String,
    },
    /// Print the diagnosis prompt for a case without calling the service.
    Compose(CaseArgs),
    /// Diagnose a case described entirely by flags.
    Diagnose(CaseArgs),
    /// Print the effective configuration (API key redacted).
    Config,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Ask for the property address during intake.
    #[arg(long)]
    pub lookup: bool,

    /// Ask follow-up questions before diagnosing.
    #[arg(long)]
    pub interview: bool,
}

/// A complete case given on the command line.
#[derive(Debug, Args)]
pub struct CaseArgs {
    /// Where the water shows up: ceiling, floor, wall
    #[arg(long)]
    pub location: Location,

    /// Year the property was built (defaults to the looked-up or configured year)
    #[arg(long)]
    pub year: Option<i32>,

    /// What is directly above a ceiling leak
    #[arg(long)]
    pub above: Option<String>,

    /// Leak timing, water temperature, or wall condition depending on location
    #[arg(long)]
    pub character: Option<String>,

    /// Smells, sounds, or shared fixtures
    #[arg(long)]
    pub symptoms: Option<String>,

    /// Homeowner's own description
    #[arg(long)]
    pub description: Option<String>,

    /// Photo or video of the damage
    #[arg(long)]
    pub media: Option<PathBuf>,

    /// Property address to look up
    #[arg(long)]
    pub address: Option<String>,

    /// Floor plan among the looked-up candidates
    #[arg(long, requires = "address")]
    pub floor_plan: Option<String>,
}
