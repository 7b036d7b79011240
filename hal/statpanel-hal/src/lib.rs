//! Statpanel Hardware Abstraction Layer
//!
//! This crate defines the bus transport contract shared by every peripheral
//! driver. The panel hangs all of its devices off a single USB bus adapter
//! that exposes I2C, SPI, chip-select and GPIO primitives, so one transport
//! object implements every trait here.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  statpanel-agent (tick orchestration)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  statpanel-drivers (SSD1306, SHT4x,     │
//! │  TSL2591) take `&mut bus` per call      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  statpanel-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!          USB adapter transport (external)
//! ```
//!
//! # Exclusive access
//!
//! Drivers never store the bus. Every operation borrows it mutably for the
//! duration of the call, so two drivers can't interleave transactions on the
//! same adapter without the borrow checker objecting.
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C master operations
//! - [`spi::SpiBus`], [`spi::ChipSelect`] - SPI transfers and CS control
//! - [`gpio::GpioBus`] - Adapter GPIO pins
//! - [`BusConfigure`] - Bus speed/mode setup

#![cfg_attr(not(any(test, feature = "mock")), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod spi;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use gpio::{GpioBus, Pin};
pub use i2c::{I2cBus, I2cConfig};
pub use spi::{ChipSelect, SpiBus, SpiConfig};

/// Error type shared by every bus operation of a transport
///
/// One adapter backs all the traits in this crate, so they report failures
/// through the same associated type.
pub trait ErrorType {
    /// Error type for bus operations
    type Error: core::fmt::Debug;
}

/// Bus mode configuration
///
/// Applied once at startup, before any driver touches the bus.
pub trait BusConfigure: ErrorType {
    /// Configure the I2C master speed
    fn configure_i2c(&mut self, config: I2cConfig) -> Result<(), Self::Error>;

    /// Configure the SPI mode, clock and bit order
    fn configure_spi(&mut self, config: SpiConfig) -> Result<(), Self::Error>;
}
