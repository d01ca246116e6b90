//! Command-line interface definition.

use std::path::PathBuf;

use calbridge_core::tracing::LogFormat;
use clap::{Parser, Subcommand};

/// calbridge - Convert calendar events between iCalendar and JSCalendar
#[derive(Debug, Parser)]
#[command(name = "calbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALBRIDGE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    /// Carry JSCalendar-only fields through X- properties
    #[arg(long, global = true)]
    pub preserve_extensions: bool,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    /// Log line format: compact, pretty or json
    #[arg(long, global = true, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert a legacy event (JSON or .ics) to a JSCalendar object
    ToJscal {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Read the input as iCalendar regardless of its extension
        #[arg(long)]
        ics: bool,
    },

    /// Convert a JSCalendar object to a legacy event
    ToLegacy {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Write iCalendar instead of JSON
        #[arg(long)]
        ics: bool,
    },

    /// Convert a legacy event to JSCalendar and back, showing what survives
    Roundtrip {
        /// Input file, or `-` for stdin
        input: PathBuf,

        /// Read the input as iCalendar regardless of its extension
        #[arg(long)]
        ics: bool,
    },

    /// Tell whether a URL is a known virtual meeting link
    Classify {
        /// The URL to inspect
        url: String,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}
