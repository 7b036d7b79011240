//! Page-organized 1-bit framebuffer with a write cursor
//!
//! Layout matches the SSD1306 horizontal addressing mode: 8 pages of 8 rows,
//! 128 bytes per page, bit `y % 8` of byte `page * 128 + x` is pixel (x, y).
//!
//! Intensity bytes are pushed one at a time in row-major order. The cursor
//! moves right, wraps to the next row after column 127, and wraps back to
//! the origin after row 63; that last wrap is reported as
//! [`Step::FrameComplete`] so the owner can flush the frame.
//!
//! Cursor and pixel data persist across calls. A caller that stops half way
//! through a frame continues from the same position next time; use
//! [`Framebuffer::rewind`] to start over explicitly.

/// Display width in pixels
pub const WIDTH: usize = 128;

/// Display height in pixels
pub const HEIGHT: usize = 64;

/// Number of 8-row pages
pub const PAGES: usize = HEIGHT / 8;

/// Buffer size in bytes
pub const BUFFER_LEN: usize = WIDTH * PAGES;

/// Intensities strictly above this value light the pixel
pub const THRESHOLD: u8 = 64;

/// Outcome of pushing one intensity byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Cursor moved within the current frame
    Advanced,
    /// The last pixel of the frame was written; cursor is back at (0, 0)
    FrameComplete,
}

/// 128x64 monochrome framebuffer
#[derive(Clone)]
pub struct Framebuffer {
    buffer: [u8; BUFFER_LEN],
    x: usize,
    y: usize,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Create an empty framebuffer with the cursor at the origin
    pub const fn new() -> Self {
        Self {
            buffer: [0; BUFFER_LEN],
            x: 0,
            y: 0,
        }
    }

    /// Binarize one intensity byte at the cursor and advance
    pub fn push(&mut self, intensity: u8) -> Step {
        let index = (self.y / 8) * WIDTH + self.x;
        let mask = 1u8 << (self.y % 8);

        if intensity > THRESHOLD {
            self.buffer[index] |= mask;
        } else {
            self.buffer[index] &= !mask;
        }

        self.x += 1;
        if self.x < WIDTH {
            return Step::Advanced;
        }

        self.x = 0;
        self.y += 1;
        if self.y < HEIGHT {
            return Step::Advanced;
        }

        self.y = 0;
        Step::FrameComplete
    }

    /// Current cursor position as (x, y)
    pub fn cursor(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    /// Move the cursor back to the origin, keeping pixel data
    pub fn rewind(&mut self) {
        self.x = 0;
        self.y = 0;
    }

    /// Read back a pixel; out-of-range coordinates read as off
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.buffer[(y / 8) * WIDTH + x] & (1 << (y % 8)) != 0
    }

    /// Raw page data in controller order
    pub fn as_bytes(&self) -> &[u8; BUFFER_LEN] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_threshold_is_exclusive() {
        let mut fb = Framebuffer::new();
        fb.push(64);
        fb.push(65);
        assert!(!fb.pixel(0, 0));
        assert!(fb.pixel(1, 0));
    }

    #[test]
    fn test_page_bit_layout() {
        let mut fb = Framebuffer::new();
        // Light pixel (3, 10): page 1, bit 2
        for i in 0..(10 * WIDTH + 4) {
            fb.push(if i == 10 * WIDTH + 3 { 255 } else { 0 });
        }
        assert_eq!(fb.as_bytes()[WIDTH + 3], 0b0000_0100);
        assert_eq!(fb.cursor(), (4, 10));
    }

    #[test]
    fn test_dark_pixel_clears_previous_bit() {
        let mut fb = Framebuffer::new();
        fb.push(255);
        fb.rewind();
        fb.push(0);
        assert!(!fb.pixel(0, 0));
    }

    #[test]
    fn test_row_wrap() {
        let mut fb = Framebuffer::new();
        for _ in 0..WIDTH {
            assert_eq!(fb.push(0), Step::Advanced);
        }
        assert_eq!(fb.cursor(), (0, 1));
    }

    #[test]
    fn test_frame_complete_on_last_pixel_only() {
        let mut fb = Framebuffer::new();
        for _ in 0..(WIDTH * HEIGHT - 1) {
            assert_eq!(fb.push(0), Step::Advanced);
        }
        assert_eq!(fb.cursor(), (WIDTH - 1, HEIGHT - 1));
        assert_eq!(fb.push(0), Step::FrameComplete);
        assert_eq!(fb.cursor(), (0, 0));
    }

    #[test]
    fn test_out_of_range_pixel_reads_off() {
        let fb = Framebuffer::new();
        assert!(!fb.pixel(WIDTH, 0));
        assert!(!fb.pixel(0, HEIGHT));
    }

    proptest! {
        #[test]
        fn prop_full_frame_matches_threshold(
            pixels in proptest::collection::vec(any::<u8>(), WIDTH * HEIGHT)
        ) {
            let mut fb = Framebuffer::new();
            for &p in &pixels {
                fb.push(p);
            }
            for y in 0..HEIGHT {
                for x in 0..WIDTH {
                    let byte = fb.as_bytes()[(y / 8) * WIDTH + x];
                    let bit = (byte >> (y % 8)) & 1 == 1;
                    prop_assert_eq!(bit, pixels[y * WIDTH + x] > THRESHOLD);
                }
            }
        }
    }
}
