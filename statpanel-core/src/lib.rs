//! Hardware-agnostic core logic for the status panel agent
//!
//! This crate contains all application logic that does not depend on a
//! concrete bus adapter:
//!
//! - Configuration type definitions
//! - Auto-dimming scheduler (lux-check window state machine)
//! - Wall clock and frame renderer traits
//! - Status text formatting (IEC byte counts, sensor readings)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod scheduler;
pub mod status;
pub mod traits;
