//! Collaborator traits
//!
//! These traits define the interface between the agent logic and the
//! pieces that live outside the workspace: the wall clock and the text
//! rasterizer.

pub mod clock;
pub mod render;

pub use clock::Clock;
pub use render::{Canvas, FrameRenderer, CANVAS_HEIGHT, CANVAS_LEN, CANVAS_WIDTH};
