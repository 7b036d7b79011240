//! Auto-dimming scheduler
//!
//! Decides, once per tick, whether ambient light gates display power and
//! which power command (if any) the display needs.

pub mod dimming;

pub use dimming::{next_lux_boundary, AutoDimmer, Evaluation, LuxCheck, PowerCommand};
