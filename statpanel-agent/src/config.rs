//! Configuration loading
//!
//! The agent reads one TOML file at startup. Every key has a default
//! except the interface name; the parsed configuration is validated
//! before it is returned.

use std::fmt;
use std::io;
use std::path::Path;

use log::{debug, info};
use statpanel_core::config::{ConfigError, PanelConfig};

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigLoadError {
    /// File could not be read
    Read(io::Error),
    /// TOML syntax or type error
    Parse(toml::de::Error),
    /// Values parsed but can't be run with
    Invalid(ConfigError),
}

impl From<io::Error> for ConfigLoadError {
    fn from(e: io::Error) -> Self {
        ConfigLoadError::Read(e)
    }
}

impl From<toml::de::Error> for ConfigLoadError {
    fn from(e: toml::de::Error) -> Self {
        ConfigLoadError::Parse(e)
    }
}

impl From<ConfigError> for ConfigLoadError {
    fn from(e: ConfigError) -> Self {
        ConfigLoadError::Invalid(e)
    }
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLoadError::Read(e) => write!(f, "cannot read config: {e}"),
            ConfigLoadError::Parse(e) => write!(f, "invalid config: {e}"),
            ConfigLoadError::Invalid(ConfigError::MissingInterface) => {
                f.write_str("config: `interface` is required")
            }
            ConfigLoadError::Invalid(ConfigError::TickTooShort {
                tick_ms,
                blocking_ms,
            }) => write!(
                f,
                "config: tick_interval_ms = {tick_ms} must exceed {blocking_ms} ms of sensor time"
            ),
            ConfigLoadError::Invalid(ConfigError::InvalidLuxThreshold) => {
                f.write_str("config: dimming.lux_min must be a non-negative number")
            }
        }
    }
}

impl std::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigLoadError::Read(e) => Some(e),
            ConfigLoadError::Parse(e) => Some(e),
            ConfigLoadError::Invalid(_) => None,
        }
    }
}

/// Parse and validate a configuration document
pub fn parse_config(text: &str) -> Result<PanelConfig, ConfigLoadError> {
    let config: PanelConfig = toml::from_str(text)?;
    config.validate()?;
    log_config_summary(&config);
    Ok(config)
}

/// Load, parse and validate the configuration file at `path`
pub fn load_config(path: impl AsRef<Path>) -> Result<PanelConfig, ConfigLoadError> {
    let path = path.as_ref();
    info!("loading configuration from {}", path.display());

    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}

/// Log a summary of the loaded configuration
fn log_config_summary(config: &PanelConfig) {
    info!("configuration loaded for interface {}", config.interface);
    debug!("  tick {} ms", config.tick_interval_ms);
    debug!(
        "  lux check {} -> {}, min {} lx",
        config.dimming.from, config.dimming.to, config.dimming.lux_min
    );
    debug!(
        "  light {:?} / {} ms",
        config.light.gain,
        config.light.integration.millis()
    );
}
