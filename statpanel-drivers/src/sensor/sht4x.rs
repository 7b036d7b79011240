//! SHT4x temperature/humidity sensor
//!
//! Single-shot high precision measurement: one command byte, a fixed
//! conversion wait, then a 6-byte read of two big-endian words each
//! followed by a CRC byte.
//!
//! The CRC bytes are read but not checked. A corrupted frame decodes to a
//! plausible but wrong reading.

use embedded_hal::delay::DelayNs;
use statpanel_core::config::CLIMATE_CONVERSION_MS;
use statpanel_core::status::Climate;
use statpanel_hal::I2cBus;

/// Fixed I2C address
pub const ADDRESS: u8 = 0x44;

/// Measure T and RH with high precision
const CMD_MEASURE_HIGH_PRECISION: u8 = 0xFD;

/// Errors from a climate measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClimateError<E> {
    /// Measurement command was not accepted
    Command(E),
    /// Result read failed
    Read(E),
}

/// SHT4x driver
pub struct Sht4x<D> {
    delay: D,
}

impl<D: DelayNs> Sht4x<D> {
    pub fn new(delay: D) -> Self {
        Self { delay }
    }

    /// Run one measurement, blocking for the conversion time
    pub fn measure<B: I2cBus>(&mut self, bus: &mut B) -> Result<Climate, ClimateError<B::Error>> {
        bus.write(ADDRESS, &[CMD_MEASURE_HIGH_PRECISION])
            .map_err(ClimateError::Command)?;

        self.delay.delay_ms(CLIMATE_CONVERSION_MS);

        let mut frame = [0u8; 6];
        bus.read(ADDRESS, &mut frame).map_err(ClimateError::Read)?;

        Ok(decode(&frame))
    }
}

/// Convert a raw measurement frame
pub fn decode(frame: &[u8; 6]) -> Climate {
    let raw_t = u16::from_be_bytes([frame[0], frame[1]]) as f32;
    let raw_rh = u16::from_be_bytes([frame[3], frame[4]]) as f32;

    Climate {
        temperature_c: -45.0 + 175.0 * raw_t / 65535.0,
        humidity_pct: -6.0 + 125.0 * raw_rh / 65535.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDelay;
    use statpanel_hal::mock::{MockBus, Op, Transaction};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_decode_extremes() {
        let low = decode(&[0x00, 0x00, 0x81, 0x00, 0x00, 0x81]);
        assert!(close(low.temperature_c, -45.0));
        assert!(close(low.humidity_pct, -6.0));

        let high = decode(&[0xFF, 0xFF, 0xAC, 0xFF, 0xFF, 0xAC]);
        assert!(close(high.temperature_c, 130.0));
        assert!(close(high.humidity_pct, 119.0));
    }

    #[test]
    fn test_decode_ignores_crc_bytes() {
        let a = decode(&[0x66, 0x66, 0x00, 0x80, 0x00, 0x00]);
        let b = decode(&[0x66, 0x66, 0xFF, 0x80, 0x00, 0xFF]);
        assert_eq!(a, b);
        // 0x6666 -> 25.0 °C, 0x8000 -> 56.5 %
        assert!(close(a.temperature_c, 25.0));
        assert!(close(a.humidity_pct, 56.5));
    }

    #[test]
    fn test_measure_sequence() {
        let mut delay = RecordingDelay::default();
        let mut bus = MockBus::new();
        bus.push_response(&[0x66, 0x66, 0x93, 0x80, 0x00, 0xA2]);

        let climate = Sht4x::new(&mut delay).measure(&mut bus).unwrap();
        assert!(close(climate.temperature_c, 25.0));

        assert_eq!(
            bus.transactions(),
            &[
                Transaction::I2cWrite { address: 0x44, data: vec![0xFD] },
                Transaction::I2cRead { address: 0x44, len: 6 },
            ]
        );
        assert_eq!(delay.calls_ms, vec![10]);
    }

    #[test]
    fn test_command_failure_skips_read() {
        let mut delay = RecordingDelay::default();
        let mut bus = MockBus::new();
        bus.fail_next(Op::I2cWrite);

        let result = Sht4x::new(&mut delay).measure(&mut bus);
        assert!(matches!(result, Err(ClimateError::Command(_))));
        assert_eq!(bus.transactions().len(), 1);
        assert!(delay.calls_ms.is_empty());
    }

    #[test]
    fn test_read_failure() {
        let mut delay = RecordingDelay::default();
        let mut bus = MockBus::new();
        bus.fail_next(Op::I2cRead);

        let result = Sht4x::new(&mut delay).measure(&mut bus);
        assert!(matches!(result, Err(ClimateError::Read(_))));
    }
}
