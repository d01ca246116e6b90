//! Logging setup for calbridge
//!
//! The converters only emit `tracing` events. [`init_tracing`] installs the
//! stderr subscriber used by the `calbridge` binary; `RUST_LOG` replaces the
//! configured level when set.
//!
//! ```ignore
//! use calbridge_core::tracing::{LogFormat, TracingConfig, init_tracing};
//!
//! init_tracing(TracingConfig::cli_debug().with_format(LogFormat::Pretty))?;
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan, prelude::*};

/// Target prefix shared by every calbridge crate.
const TARGET_PREFIX: &str = "calbridge";

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Shape of each log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, indented records.
    Pretty,
    /// One short line per event.
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown log format '{}' (expected pretty, compact or json)",
                other
            )),
        }
    }
}

/// What the subscriber prints and how much of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level applied to calbridge targets when `RUST_LOG` is unset.
    pub level: Level,
    pub format: LogFormat,
    /// Print file and line of each event.
    pub source_locations: bool,
    pub timestamps: bool,
    /// Log span creation and close.
    pub span_events: bool,
}

impl Default for TracingConfig {
    /// Warnings only, compact lines without timestamps.
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            source_locations: false,
            timestamps: false,
            span_events: false,
        }
    }
}

impl TracingConfig {
    /// Every degraded field, with the source location that reported it.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            source_locations: true,
            ..Self::default()
        }
    }

    /// JSON lines with timestamps and spans, for runs whose logs are
    /// collected by another tool.
    #[must_use]
    pub fn batch() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Json,
            source_locations: true,
            timestamps: true,
            span_events: true,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Filter directive used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> String {
        format!("{}={}", TARGET_PREFIX, self.level)
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

/// Installs the global subscriber. Call once, before any conversion.
///
/// # Errors
///
/// Fails when a global subscriber is already set.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.source_locations)
        .with_line_number(config.source_locations)
        .with_span_events(span_events);

    let layer = match (config.format, config.timestamps) {
        (LogFormat::Pretty, _) => layer.pretty().boxed(),
        (LogFormat::Json, _) => layer.json().boxed(),
        (LogFormat::Compact, true) => layer.compact().boxed(),
        (LogFormat::Compact, false) => layer.compact().without_time().boxed(),
    };

    let subscriber = tracing_subscriber::registry()
        .with(config.env_filter())
        .with(layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod presets {
        use super::*;

        #[test]
        fn default_is_quiet() {
            let config = TracingConfig::default();
            assert_eq!(config.level, Level::WARN);
            assert_eq!(config.format, LogFormat::Compact);
            assert!(!config.source_locations);
            assert!(!config.timestamps);
        }

        #[test]
        fn cli_debug_adds_locations() {
            let config = TracingConfig::cli_debug();
            assert_eq!(config.level, Level::DEBUG);
            assert_eq!(config.format, LogFormat::Compact);
            assert!(config.source_locations);
            assert!(!config.span_events);
        }

        #[test]
        fn batch_is_json_with_spans() {
            let config = TracingConfig::batch();
            assert_eq!(config.level, Level::INFO);
            assert_eq!(config.format, LogFormat::Json);
            assert!(config.timestamps);
            assert!(config.span_events);
        }

        #[test]
        fn builders_override_one_field() {
            let config = TracingConfig::batch()
                .with_level(Level::TRACE)
                .with_format(LogFormat::Pretty);
            assert_eq!(config.level, Level::TRACE);
            assert_eq!(config.format, LogFormat::Pretty);
            assert!(config.span_events);
        }

        #[test]
        fn directive_covers_every_crate() {
            let directive = TracingConfig::cli_debug().default_directive();
            assert_eq!(directive, "calbridge=DEBUG");
        }
    }

    mod format {
        use super::*;

        #[test]
        fn parses_names_case_insensitively() {
            assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
            assert_eq!("Pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
            assert_eq!("COMPACT".parse::<LogFormat>(), Ok(LogFormat::Compact));
        }

        #[test]
        fn rejects_unknown_names() {
            let err = "xml".parse::<LogFormat>().unwrap_err();
            assert!(err.contains("xml"));
        }

        #[test]
        fn display_matches_parse() {
            for format in [LogFormat::Pretty, LogFormat::Compact, LogFormat::Json] {
                assert_eq!(format.to_string().parse::<LogFormat>(), Ok(format));
            }
        }
    }
}
