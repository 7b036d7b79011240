//! SSD1306 OLED Display Driver
//!
//! Driver for 128x64 SSD1306-based OLED displays on a write-only SPI link
//! with a GPIO reset line and a GPIO data/command select line.
//!
//! The D/C line idles at "data". Commands switch it to "command" for the
//! duration of one chip-select bracket and restore it afterwards, so frame
//! data can be streamed without touching D/C.

use embedded_hal::delay::DelayNs;
use statpanel_core::config::DisplayHwConfig;
use statpanel_hal::{ChipSelect, GpioBus, Pin, SpiBus};

use super::framebuffer::{Framebuffer, Step};

/// Reset pulse: high hold before pulling low (ms)
const RESET_SETUP_MS: u32 = 1;

/// Reset pulse: low time (ms)
const RESET_LOW_MS: u32 = 10;

/// SSD1306 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_VCOMH_DESELECT: u8 = 0xD8;
    pub const DISPLAY_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_COLUMN_RANGE: u8 = 0x21;
    pub const SET_PAGE_RANGE: u8 = 0x22;
}

/// Errors from display operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// Driving the reset line failed
    Reset(E),
    /// Driving the data/command line failed
    DataCommand(E),
    /// SPI transmission failed
    Spi(E),
}

/// SSD1306 OLED driver
///
/// Owns the framebuffer and cursor; borrows the bus per call.
pub struct Ssd1306<D> {
    delay: D,
    reset_pin: Pin,
    dc_pin: Pin,
    contrast: u8,
    frame: Framebuffer,
}

impl<D: DelayNs> Ssd1306<D> {
    /// Create a new SSD1306 driver
    pub fn new(config: DisplayHwConfig, delay: D) -> Self {
        Self {
            delay,
            reset_pin: config.reset_pin,
            dc_pin: config.dc_pin,
            contrast: config.contrast,
            frame: Framebuffer::new(),
        }
    }

    /// Reset the controller and send the 128x64 initialization sequence
    ///
    /// Any failure leaves the controller in an unknown state; callers
    /// treat it as fatal for the display.
    pub fn init<B>(&mut self, bus: &mut B) -> Result<(), DisplayError<B::Error>>
    where
        B: SpiBus + ChipSelect + GpioBus,
    {
        bus.write_pin(self.reset_pin, true, true)
            .map_err(DisplayError::Reset)?;
        self.delay.delay_ms(RESET_SETUP_MS);
        bus.write_pin(self.reset_pin, true, false)
            .map_err(DisplayError::Reset)?;
        self.delay.delay_ms(RESET_LOW_MS);
        bus.write_pin(self.reset_pin, true, true)
            .map_err(DisplayError::Reset)?;

        let init_cmds: [u8; 31] = [
            cmd::DISPLAY_OFF,
            cmd::SET_CLOCK_DIV,
            0x80, // Default clock
            cmd::SET_MUX_RATIO,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::SET_CHARGE_PUMP,
            0x14, // Enable charge pump
            cmd::SET_MEMORY_MODE,
            0x00,                  // Horizontal addressing
            cmd::SET_SEG_REMAP,    // Flip horizontally
            cmd::SET_COM_SCAN_DEC, // Flip vertically
            cmd::SET_COM_PINS,
            0x12, // Alternative COM config
            cmd::SET_CONTRAST,
            self.contrast,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOMH_DESELECT,
            0x40,
            cmd::DISPLAY_RAM,
            cmd::SET_NORMAL,
            cmd::DISPLAY_ON,
            cmd::SET_COLUMN_RANGE,
            0x00,
            0x7F,
            cmd::SET_PAGE_RANGE,
            0x00,
            0x07,
        ];

        self.write_cmd(bus, &init_cmds)
    }

    /// Binarize intensity bytes into the framebuffer at the cursor
    ///
    /// Every completed 128x64 frame is sent with [`Self::display`] before
    /// the remaining bytes are consumed. Returns the number of bytes taken.
    ///
    /// The cursor and partially written pages persist between calls. If a
    /// flush fails, the error is returned right away; the cursor is already
    /// back at the origin and bytes after the completing one are not
    /// consumed.
    pub fn write<B>(&mut self, bus: &mut B, pixels: &[u8]) -> Result<usize, DisplayError<B::Error>>
    where
        B: SpiBus + ChipSelect,
    {
        for &intensity in pixels {
            if self.frame.push(intensity) == Step::FrameComplete {
                self.display(bus)?;
            }
        }

        Ok(pixels.len())
    }

    /// Send the framebuffer to the controller
    ///
    /// The buffer is left as is.
    pub fn display<B>(&mut self, bus: &mut B) -> Result<(), DisplayError<B::Error>>
    where
        B: SpiBus + ChipSelect,
    {
        bus.set_chip_select(true);
        let result = bus.write(self.frame.as_bytes());
        bus.set_chip_select(false);

        result.map_err(DisplayError::Spi)
    }

    /// Turn the panel on
    pub fn on<B>(&mut self, bus: &mut B) -> Result<(), DisplayError<B::Error>>
    where
        B: SpiBus + ChipSelect + GpioBus,
    {
        self.write_cmd(bus, &[cmd::DISPLAY_ON])
    }

    /// Turn the panel off (RAM content is retained)
    pub fn off<B>(&mut self, bus: &mut B) -> Result<(), DisplayError<B::Error>>
    where
        B: SpiBus + ChipSelect + GpioBus,
    {
        self.write_cmd(bus, &[cmd::DISPLAY_OFF])
    }

    /// Framebuffer and cursor state
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.frame
    }

    /// Mutable framebuffer access, e.g. to rewind an abandoned frame
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.frame
    }

    /// Send command bytes with D/C low inside one chip-select bracket
    ///
    /// Chip-select is released and D/C restored to data even when the
    /// transfer fails.
    fn write_cmd<B>(&mut self, bus: &mut B, cmds: &[u8]) -> Result<(), DisplayError<B::Error>>
    where
        B: SpiBus + ChipSelect + GpioBus,
    {
        bus.write_pin(self.dc_pin, true, false)
            .map_err(DisplayError::DataCommand)?;

        bus.set_chip_select(true);
        let sent = bus.write(cmds);
        bus.set_chip_select(false);

        let restored = bus.write_pin(self.dc_pin, true, true);

        sent.map_err(DisplayError::Spi)?;
        restored.map_err(DisplayError::DataCommand)
    }
}
