//! TSL2591 ambient light sensor
//!
//! The sensor is powered up only for the length of a reading: enable,
//! wait one integration period plus settling time, read both channels,
//! power down again.
//!
//! The lux formula needs the gain and integration time currently in the
//! control register. The device is never asked for them; the driver keeps
//! its own copy, updated only after a successful register write.

use embedded_hal::delay::DelayNs;
use statpanel_core::config::{Gain, IntegrationTime, LIGHT_SETTLE_MS};
use statpanel_hal::I2cBus;

/// Fixed I2C address
pub const ADDRESS: u8 = 0x29;

/// Lux coefficient from the datasheet application note
const LUX_DF: f32 = 408.0;

/// Register access
#[allow(dead_code)]
mod reg {
    /// Command bit, normal transaction
    pub const COMMAND: u8 = 0xA0;
    pub const ENABLE: u8 = 0x00;
    pub const CONTROL: u8 = 0x01;
    /// Channel 0 low byte, start of the 4-byte channel block
    pub const C0DATAL: u8 = 0x14;

    /// Power on + ALS enable
    pub const ENABLE_POWERON_AEN: u8 = 0x03;
    pub const ENABLE_POWEROFF: u8 = 0x00;
}

/// Errors from the light sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightError<E> {
    /// Control register write failed; stored settings unchanged
    Configure(E),
    /// Power-up failed
    Enable(E),
    /// Channel read failed; the sensor is left powered
    Read(E),
    /// Power-down after a good read failed
    Disable(E),
}

/// TSL2591 driver
pub struct Tsl2591<D> {
    delay: D,
    gain: Gain,
    integration: IntegrationTime,
}

impl<D: DelayNs> Tsl2591<D> {
    /// Create a driver assuming the power-on register state (1x, 100 ms)
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            gain: Gain::Low,
            integration: IntegrationTime::Ms100,
        }
    }

    /// Gain the lux formula currently uses
    pub fn gain(&self) -> Gain {
        self.gain
    }

    /// Integration time the lux formula currently uses
    pub fn integration(&self) -> IntegrationTime {
        self.integration
    }

    /// Program gain and integration time
    pub fn set_gain_integration<B: I2cBus>(
        &mut self,
        bus: &mut B,
        gain: Gain,
        integration: IntegrationTime,
    ) -> Result<(), LightError<B::Error>> {
        bus.write(
            ADDRESS,
            &[reg::COMMAND | reg::CONTROL, gain.bits() | integration.bits()],
        )
        .map_err(LightError::Configure)?;

        self.gain = gain;
        self.integration = integration;
        Ok(())
    }

    /// Take one lux reading, blocking for the integration period
    pub fn lux<B: I2cBus>(&mut self, bus: &mut B) -> Result<f32, LightError<B::Error>> {
        bus.write(ADDRESS, &[reg::COMMAND | reg::ENABLE, reg::ENABLE_POWERON_AEN])
            .map_err(LightError::Enable)?;

        self.delay
            .delay_ms(self.integration.millis() + LIGHT_SETTLE_MS);

        let mut channels = [0u8; 4];
        bus.write_read(ADDRESS, &[reg::COMMAND | reg::C0DATAL], &mut channels)
            .map_err(LightError::Read)?;

        bus.write(ADDRESS, &[reg::COMMAND | reg::ENABLE, reg::ENABLE_POWEROFF])
            .map_err(LightError::Disable)?;

        let ch0 = u16::from_le_bytes([channels[0], channels[1]]);
        let ch1 = u16::from_le_bytes([channels[2], channels[3]]);

        Ok(compute_lux(self.gain, self.integration, ch0, ch1))
    }
}

/// Lux from raw full-spectrum (`ch0`) and infrared (`ch1`) counts
///
/// A dark full-spectrum channel reads as 0 lux.
pub fn compute_lux(gain: Gain, integration: IntegrationTime, ch0: u16, ch1: u16) -> f32 {
    if ch0 == 0 {
        return 0.0;
    }

    let ch0 = ch0 as f32;
    let ch1 = ch1 as f32;
    let cpl = (integration.millis() as f32 * gain.factor()) / LUX_DF;

    (ch0 - ch1) * (1.0 - ch1 / ch0) / cpl
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDelay;
    use statpanel_hal::mock::{MockBus, Op, Transaction};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_compute_lux() {
        // cpl = 100 * 428 / 408
        let lux = compute_lux(Gain::High, IntegrationTime::Ms100, 1000, 500);
        assert!(close(lux, 500.0 * 0.5 / (42800.0 / 408.0)));
        assert!(close(lux, 2.383));
    }

    #[test]
    fn test_compute_lux_integration_scales() {
        let short = compute_lux(Gain::Low, IntegrationTime::Ms100, 1000, 0);
        let long = compute_lux(Gain::Low, IntegrationTime::Ms600, 1000, 0);
        assert!(close(short / long, 6.0));
    }

    #[test]
    fn test_dark_channel_is_zero_lux() {
        assert_eq!(compute_lux(Gain::Max, IntegrationTime::Ms600, 0, 0), 0.0);
        assert_eq!(compute_lux(Gain::Max, IntegrationTime::Ms600, 0, 1234), 0.0);
    }

    #[test]
    fn test_set_gain_integration() {
        let mut delay = RecordingDelay::default();
        let mut bus = MockBus::new();
        let mut light = Tsl2591::new(&mut delay);

        light
            .set_gain_integration(&mut bus, Gain::High, IntegrationTime::Ms300)
            .unwrap();

        assert_eq!(
            bus.transactions(),
            &[Transaction::I2cWrite { address: 0x29, data: vec![0xA1, 0x22] }]
        );
        assert_eq!(light.gain(), Gain::High);
        assert_eq!(light.integration(), IntegrationTime::Ms300);
    }

    #[test]
    fn test_failed_configure_keeps_settings() {
        let mut delay = RecordingDelay::default();
        let mut bus = MockBus::new();
        let mut light = Tsl2591::new(&mut delay);
        bus.fail_next(Op::I2cWrite);

        let result = light.set_gain_integration(&mut bus, Gain::Max, IntegrationTime::Ms600);
        assert!(matches!(result, Err(LightError::Configure(_))));
        assert_eq!(light.gain(), Gain::Low);
        assert_eq!(light.integration(), IntegrationTime::Ms100);
    }

    #[test]
    fn test_lux_cycle() {
        let mut delay = RecordingDelay::default();
        let mut bus = MockBus::new();
        let mut light = Tsl2591::new(&mut delay);
        light
            .set_gain_integration(&mut bus, Gain::High, IntegrationTime::Ms100)
            .unwrap();
        bus.clear();
        // ch0 = 1000, ch1 = 500, little-endian
        bus.push_response(&[0xE8, 0x03, 0xF4, 0x01]);

        let lux = light.lux(&mut bus).unwrap();
        assert!(close(lux, 2.383));

        assert_eq!(
            bus.transactions(),
            &[
                Transaction::I2cWrite { address: 0x29, data: vec![0xA0, 0x03] },
                Transaction::I2cWriteRead { address: 0x29, data: vec![0xB4], len: 4 },
                Transaction::I2cWrite { address: 0x29, data: vec![0xA0, 0x00] },
            ]
        );
        assert_eq!(delay.calls_ms, vec![120]);
    }

    #[test]
    fn test_enable_failure_skips_read() {
        let mut delay = RecordingDelay::default();
        let mut bus = MockBus::new();
        bus.fail_next(Op::I2cWrite);

        let result = Tsl2591::new(&mut delay).lux(&mut bus);
        assert!(matches!(result, Err(LightError::Enable(_))));
        assert_eq!(bus.transactions().len(), 1);
    }

    #[test]
    fn test_read_failure_leaves_sensor_enabled() {
        let mut delay = RecordingDelay::default();
        let mut bus = MockBus::new();
        bus.fail_next(Op::I2cWriteRead);

        let result = Tsl2591::new(&mut delay).lux(&mut bus);
        assert!(matches!(result, Err(LightError::Read(_))));
        // No power-down attempt after a failed read
        assert_eq!(bus.transactions().len(), 2);
    }

    #[test]
    fn test_disable_failure_is_reported() {
        let mut delay = RecordingDelay::default();
        let mut bus = MockBus::new();
        bus.fail_nth(Op::I2cWrite, 1);
        bus.push_response(&[0xE8, 0x03, 0x00, 0x00]);

        let result = Tsl2591::new(&mut delay).lux(&mut bus);
        assert!(matches!(result, Err(LightError::Disable(_))));
    }
}
