//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calbridge/config.toml` by default.

use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use calbridge_core::datetime::lookup_time_zone;
use calbridge_core::tracing::{LogFormat, TracingConfig};
use tracing::Level;

/// Configuration for the calbridge client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Output settings.
    #[serde(default)]
    pub output: OutputSettings,

    /// Conversion settings.
    #[serde(default)]
    pub conversion: ConversionSettings,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Output settings for rendered JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Conversion settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Carry JSCalendar-only fields through `X-` properties.
    pub preserve_extensions: bool,

    /// IANA zone applied to floating iCalendar start times.
    pub default_time_zone: Option<String>,
}

impl ConversionSettings {
    /// Resolves `default_time_zone`, or `None` when unset.
    pub fn time_zone(&self) -> Result<Option<Tz>, String> {
        match self.default_time_zone.as_deref() {
            None => Ok(None),
            Some(name) => lookup_time_zone(name)
                .map(Some)
                .ok_or_else(|| format!("unknown time zone: {}", name)),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `compact`, `pretty` or `json`.
    pub format: LogFormat,
}

impl ClientConfig {
    /// Builds the logging setup. `debug` and `format` come from the command
    /// line and win over the file.
    pub fn tracing_config(&self, debug: bool, format: Option<LogFormat>) -> TracingConfig {
        let debug = debug || self.debug;
        let format = format.unwrap_or(self.logging.format);
        let base = match format {
            LogFormat::Json => TracingConfig::batch(),
            _ if debug => TracingConfig::cli_debug(),
            _ => TracingConfig::default(),
        }
        .with_format(format);

        if debug {
            base.with_level(Level::DEBUG)
        } else {
            base
        }
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calbridge")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert!(!config.debug);
        assert!(config.output.pretty);
        assert!(!config.conversion.preserve_extensions);
        assert!(config.conversion.default_time_zone.is_none());
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert!(config.output.pretty);
        assert!(!config.conversion.preserve_extensions);
    }

    #[test]
    fn toml_sections() {
        let toml_content = r#"
debug = true

[output]
pretty = false

[conversion]
preserve_extensions = true
default_time_zone = "Europe/Paris"
"#;
        let config: ClientConfig = toml::from_str(toml_content).unwrap();
        assert!(config.debug);
        assert!(!config.output.pretty);
        assert!(config.conversion.preserve_extensions);
        assert_eq!(
            config.conversion.time_zone().unwrap(),
            Some(Tz::Europe__Paris)
        );
    }

    #[test]
    fn logging_section() {
        let config: ClientConfig = toml::from_str("[logging]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);

        let err = toml::from_str::<ClientConfig>("[logging]\nformat = \"xml\"\n").unwrap_err();
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn unknown_time_zone_errors() {
        let settings = ConversionSettings {
            default_time_zone: Some("Mars/Olympus".to_string()),
            ..Default::default()
        };
        let err = settings.time_zone().unwrap_err();
        assert!(err.contains("Mars/Olympus"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\npretty = false\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert!(!config.output.pretty);
    }

    #[test]
    fn load_from_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(err.contains("failed to read config"));
    }

    #[test]
    fn load_from_invalid_toml_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "debug = [").unwrap();
        let err = ClientConfig::load_from(&path).unwrap_err();
        assert!(err.contains("failed to parse config"));
    }

    #[test]
    fn dump_roundtrips_through_toml() {
        let mut config = ClientConfig::default();
        config.conversion.default_time_zone = Some("UTC".to_string());
        let text = toml::to_string_pretty(&config).unwrap();
        let back: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.conversion.default_time_zone.as_deref(), Some("UTC"));
    }

    mod logging {
        use super::*;

        #[test]
        fn defaults_to_quiet_compact_lines() {
            let config = ClientConfig::default().tracing_config(false, None);
            assert_eq!(config, TracingConfig::default());
        }

        #[test]
        fn debug_from_flag_or_file() {
            let from_flag = ClientConfig::default().tracing_config(true, None);
            assert_eq!(from_flag, TracingConfig::cli_debug());

            let config = ClientConfig {
                debug: true,
                ..Default::default()
            };
            assert_eq!(config.tracing_config(false, None), TracingConfig::cli_debug());
        }

        #[test]
        fn json_uses_batch_preset() {
            let mut config = ClientConfig::default();
            config.logging.format = LogFormat::Json;
            assert_eq!(config.tracing_config(false, None), TracingConfig::batch());

            let debug = config.tracing_config(true, None);
            assert_eq!(debug.format, LogFormat::Json);
            assert_eq!(debug.level, Level::DEBUG);
            assert!(debug.span_events);
        }

        #[test]
        fn flag_overrides_file_format() {
            let mut config = ClientConfig::default();
            config.logging.format = LogFormat::Json;
            let setup = config.tracing_config(false, Some(LogFormat::Pretty));
            assert_eq!(setup.format, LogFormat::Pretty);
            assert_eq!(setup.level, Level::WARN);
            assert!(!setup.span_events);
        }
    }
}
