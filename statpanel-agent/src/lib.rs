//! Statpanel - Desk/NAS Status Panel Agent
//!
//! Ties the drivers, the statistics reader and the dimming scheduler into
//! one tick loop:
//!
//! 1. Read interface counters
//! 2. If the display is on: measure climate, render the status text,
//!    push the frame
//! 3. Re-evaluate the lux-check window, then gate display power on
//!    ambient light while the check is active
//!
//! Per-tick failures are logged and reported in a [`TickReport`]; only
//! initialization failures are fatal. The bus transport itself (USB
//! adapter enumeration) and text rasterization are supplied by the caller.

#![deny(unsafe_code)]

pub mod agent;
pub mod config;
pub mod error;
pub mod time;

pub use agent::Agent;
pub use config::{load_config, parse_config, ConfigLoadError};
pub use error::{AgentError, InitStage, Subsystem, TickReport, TransientRead};
pub use time::{LocalClock, StdDelay};

use statpanel_hal::{BusConfigure, ChipSelect, GpioBus, I2cBus, SpiBus};

/// Everything the panel needs from the bus adapter
pub trait PanelBus: I2cBus + SpiBus + ChipSelect + GpioBus + BusConfigure {}

impl<T> PanelBus for T where T: I2cBus + SpiBus + ChipSelect + GpioBus + BusConfigure {}
