//! Display drivers

pub mod framebuffer;
pub mod ssd1306;

pub use framebuffer::{Framebuffer, Step};
pub use ssd1306::{DisplayError, Ssd1306};
