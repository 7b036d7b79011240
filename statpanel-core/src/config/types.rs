//! Configuration type definitions
//!
//! Sensor settings and the lux-check window. Everything here is plain data;
//! the drivers and the scheduler interpret it.

use chrono::NaiveTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Light sensor analog gain
///
/// Discriminants are the AGAIN field bits of the TSL2591 control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Gain {
    /// 1x
    Low = 0x00,
    /// 25x
    Medium = 0x10,
    /// 428x
    #[default]
    High = 0x20,
    /// 9876x
    Max = 0x30,
}

impl Gain {
    /// Control register bits
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Nominal multiplication factor used by the lux formula
    pub const fn factor(self) -> f32 {
        match self {
            Gain::Low => 1.0,
            Gain::Medium => 25.0,
            Gain::High => 428.0,
            Gain::Max => 9876.0,
        }
    }
}

/// Light sensor integration (ADC accumulation) time
///
/// Discriminants are the ATIME field bits of the TSL2591 control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum IntegrationTime {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "100ms"))]
    Ms100 = 0,
    #[cfg_attr(feature = "serde", serde(rename = "200ms"))]
    Ms200 = 1,
    #[cfg_attr(feature = "serde", serde(rename = "300ms"))]
    Ms300 = 2,
    #[cfg_attr(feature = "serde", serde(rename = "400ms"))]
    Ms400 = 3,
    #[cfg_attr(feature = "serde", serde(rename = "500ms"))]
    Ms500 = 4,
    #[cfg_attr(feature = "serde", serde(rename = "600ms"))]
    Ms600 = 5,
}

impl IntegrationTime {
    /// Control register bits
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Integration time in milliseconds: (steps + 1) * 100
    pub const fn millis(self) -> u32 {
        (self as u32 + 1) * 100
    }
}

/// Light sensor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LightConfig {
    pub gain: Gain,
    pub integration: IntegrationTime,
}

/// Daily lux-check window
///
/// Ambient light gates display power from `from` until `to` the next
/// morning. Outside the window the display is forced on.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DimmingWindow {
    /// Lux check starts at this time of day
    pub from: NaiveTime,
    /// Lux check ends at this time of day
    pub to: NaiveTime,
    /// Display stays on at or above this lux while the check is active
    pub lux_min: f32,
}

impl Default for DimmingWindow {
    fn default() -> Self {
        Self {
            from: NaiveTime::from_hms_opt(20, 30, 0).unwrap_or_default(),
            to: NaiveTime::from_hms_opt(7, 30, 0).unwrap_or_default(),
            lux_min: 0.15,
        }
    }
}
