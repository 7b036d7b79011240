//! Configuration types
//!
//! Everything the agent reads at startup. Timing and threshold values live
//! here instead of in the drivers so the core stays testable without a
//! wall clock or real hardware.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum network interface name length (IFNAMSIZ without the NUL)
pub const MAX_IFNAME_LEN: usize = 15;

/// Blocking conversion time of the temperature/humidity sensor (ms)
pub const CLIMATE_CONVERSION_MS: u32 = 10;

/// Extra settling time after a light integration period (ms)
pub const LIGHT_SETTLE_MS: u32 = 20;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No interface name given
    MissingInterface,
    /// Tick period is shorter than the blocking work done per tick
    TickTooShort {
        /// Configured tick period (ms)
        tick_ms: u32,
        /// Worst-case blocking time per tick (ms)
        blocking_ms: u32,
    },
    /// Lux threshold is negative or not a number
    InvalidLuxThreshold,
}

/// Complete panel configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    /// Network interface whose counters are shown
    pub interface: String<MAX_IFNAME_LEN>,
    /// Driver loop period (ms)
    pub tick_interval_ms: u32,
    pub dimming: DimmingWindow,
    pub light: LightConfig,
    pub display: DisplayHwConfig,
    pub bus: BusHwConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            interface: String::new(),
            tick_interval_ms: 1000,
            dimming: DimmingWindow::default(),
            light: LightConfig::default(),
            display: DisplayHwConfig::default(),
            bus: BusHwConfig::default(),
        }
    }
}

impl PanelConfig {
    /// Worst-case time one tick spends blocked in sensor conversions (ms)
    pub fn blocking_ms(&self) -> u32 {
        self.light.integration.millis() + LIGHT_SETTLE_MS + CLIMATE_CONVERSION_MS
    }

    /// Check the configuration for values the agent can't run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interface.is_empty() {
            return Err(ConfigError::MissingInterface);
        }

        let blocking_ms = self.blocking_ms();
        if self.tick_interval_ms <= blocking_ms {
            return Err(ConfigError::TickTooShort {
                tick_ms: self.tick_interval_ms,
                blocking_ms,
            });
        }

        let lux_min = self.dimming.lux_min;
        if lux_min.is_nan() || lux_min < 0.0 {
            return Err(ConfigError::InvalidLuxThreshold);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(interface: &str) -> PanelConfig {
        let mut config = PanelConfig::default();
        config.interface.push_str(interface).unwrap();
        config
    }

    #[test]
    fn test_default_is_valid_with_interface() {
        assert_eq!(config_for("eth0").validate(), Ok(()));
    }

    #[test]
    fn test_missing_interface() {
        assert_eq!(
            PanelConfig::default().validate(),
            Err(ConfigError::MissingInterface)
        );
    }

    #[test]
    fn test_blocking_time() {
        let mut config = config_for("eth0");
        assert_eq!(config.blocking_ms(), 130);

        config.light.integration = IntegrationTime::Ms600;
        assert_eq!(config.blocking_ms(), 630);
    }

    #[test]
    fn test_tick_too_short() {
        let mut config = config_for("eth0");
        config.light.integration = IntegrationTime::Ms600;
        config.tick_interval_ms = 600;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TickTooShort {
                tick_ms: 600,
                blocking_ms: 630
            })
        );
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let mut config = config_for("eth0");
        config.dimming.lux_min = f32::NAN;
        assert_eq!(config.validate(), Err(ConfigError::InvalidLuxThreshold));
    }
}
