//! Sensor drivers
//!
//! Both sensors sit on the adapter's I2C bus and block the caller for their
//! conversion time. Readings are returned per call and never cached.

pub mod sht4x;
pub mod tsl2591;

pub use sht4x::{ClimateError, Sht4x};
pub use tsl2591::{LightError, Tsl2591};
