//! GPIO pin abstractions
//!
//! The adapter exposes a handful of general purpose pins. Each write sets
//! both the direction (output enable) and the level in one request.

use crate::ErrorType;

/// Adapter GPIO pin identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Pin {
    Gpio0,
    /// Shared with SPI MISO; free when the SPI peripheral is write-only
    Gpio1,
    Gpio2,
    Gpio3,
    /// Activity LED on most adapter boards (active low)
    Gpio4,
    /// Shared with the second SPI chip-select
    Gpio5,
    Gpio6,
    Gpio7,
}

impl Pin {
    /// Pin index as used on the wire
    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// GPIO access through the bus adapter
pub trait GpioBus: ErrorType {
    /// Drive a pin
    ///
    /// # Arguments
    /// * `pin` - Pin to drive
    /// * `output` - Enable the output driver (false leaves the pin floating)
    /// * `high` - Output level
    fn write_pin(&mut self, pin: Pin, output: bool, high: bool) -> Result<(), Self::Error>;
}
