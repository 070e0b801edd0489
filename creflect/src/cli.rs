//! Command-line interface definitions for creflect.

use clap::{Parser, ValueEnum};
use creflect_core::OutputFormat;
use std::path::PathBuf;

/// creflect - generate name lookup tables for annotated C enumerations
#[derive(Parser, Debug)]
#[command(name = "creflect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source file to scan for annotated enums
    pub input: PathBuf,

    /// Path to creflect.toml configuration file
    #[arg(short, long, env = "CREFLECT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write generated code to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Annotation macro name (overrides config file)
    #[arg(long)]
    pub annotation: Option<String>,

    /// Output format (overrides config file)
    #[arg(long, value_enum)]
    pub format: Option<Format>,

    /// Enable verbose logging on stderr (-v, -vv, -vvv for increasing verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Declarations followed by C name tables
    C,
    /// JSON description of the reflected enums
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::C => OutputFormat::C,
            Format::Json => OutputFormat::Json,
        }
    }
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
