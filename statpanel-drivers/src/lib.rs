//! Peripheral driver implementations
//!
//! Drivers for the devices wired to the panel's bus adapter:
//!
//! - SSD1306 128x64 OLED over SPI (with GPIO reset and D/C lines)
//! - SHT4x temperature/humidity sensor over I2C
//! - TSL2591 ambient light sensor over I2C
//!
//! No driver owns the bus. Each operation takes `&mut B` for the length of
//! the call, which keeps access to the shared adapter serialized.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod sensor;

#[cfg(test)]
pub(crate) mod testing {
    use embedded_hal::delay::DelayNs;

    /// Delay that records requested milliseconds instead of sleeping
    #[derive(Debug, Default)]
    pub struct RecordingDelay {
        pub calls_ms: Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.calls_ms.push(ns / 1_000_000);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.calls_ms.push(ms);
        }
    }
}
