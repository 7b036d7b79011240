//! Hardware configuration types
//!
//! Adapter pins and bus modes. The defaults match the reference wiring:
//! SSD1306 reset on GPIO5 (second chip-select), D/C on GPIO1 (MISO, unused
//! by the write-only display link) and the adapter's activity LED on GPIO4.

use statpanel_hal::{I2cConfig, Pin, SpiConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Display wiring and panel settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayHwConfig {
    /// Hardware reset line
    pub reset_pin: Pin,
    /// Data/command select line (high = data)
    pub dc_pin: Pin,
    /// Contrast register value
    pub contrast: u8,
}

impl Default for DisplayHwConfig {
    fn default() -> Self {
        Self {
            reset_pin: Pin::Gpio5,
            dc_pin: Pin::Gpio1,
            contrast: 0x00,
        }
    }
}

/// Bus adapter setup applied before any driver runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BusHwConfig {
    pub i2c: I2cConfig,
    pub spi: SpiConfig,
    /// Activity LED, driven high (off) at startup
    pub activity_led: Option<Pin>,
}

impl Default for BusHwConfig {
    fn default() -> Self {
        Self {
            i2c: I2cConfig::HIGH_SPEED,
            spi: SpiConfig::default(),
            activity_led: Some(Pin::Gpio4),
        }
    }
}
