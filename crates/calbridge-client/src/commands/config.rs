//! Configuration commands.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", ClientConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    if let Some(tz) = config.conversion.time_zone().map_err(ClientError::Config)? {
        println!("Floating times will be read in {}.", tz.name());
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> ClientResult<()> {
    let config_path = ClientConfig::default_path();
    println!("config: {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_defaults() {
        assert!(validate(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn validate_rejects_unknown_zone() {
        let mut config = ClientConfig::default();
        config.conversion.default_time_zone = Some("Nowhere/Special".to_string());
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("unknown time zone"));
    }
}
