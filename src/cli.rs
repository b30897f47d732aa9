//! Command-line interface for mailer-ses using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{DEFAULT_CONFIG_PATH, DEFAULT_SECTION};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format for log aggregation.
    Json,
}

/// Mail a monitoring event through Amazon SES.
#[derive(Parser, Debug)]
#[command(name = "mailer-ses")]
#[command(version)]
#[command(about = "Mail a monitoring event through Amazon SES")]
pub struct Cli {
    /// Path to the settings file (JSON, or YAML by extension).
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH, env = "MAILER_SES_CONFIG")]
    pub config: PathBuf,

    /// Name of the settings section to read.
    #[arg(short = 'j', long = "json-config", default_value = DEFAULT_SECTION)]
    pub json_config: String,

    /// Read the event from a file instead of stdin.
    #[arg(long = "event")]
    pub event: Option<PathBuf>,

    /// Log format: text or json.
    #[arg(long = "log-format", value_enum, default_value_t = LogFormat::Text, env = "LOG_FORMAT")]
    pub log_format: LogFormat,
}
