//! Frame renderer trait
//!
//! Text shaping and font rasterization are external. The agent hands the
//! formatted [`StatusText`] to a renderer that paints an 8-bit intensity
//! canvas, which the display driver then binarizes.

use crate::status::StatusText;

/// Canvas width in pixels
pub const CANVAS_WIDTH: usize = 128;

/// Canvas height in pixels
pub const CANVAS_HEIGHT: usize = 64;

/// Canvas size in bytes (one intensity byte per pixel, row-major)
pub const CANVAS_LEN: usize = CANVAS_WIDTH * CANVAS_HEIGHT;

/// Row-major intensity bitmap, 0 = black, 255 = white
pub type Canvas = [u8; CANVAS_LEN];

/// Intensity bitmap producer
pub trait FrameRenderer {
    /// Paint the status text onto the canvas
    ///
    /// The canvas is cleared by the caller between frames; renderers only
    /// draw on top of it.
    fn render(&mut self, text: &StatusText, canvas: &mut Canvas);
}
