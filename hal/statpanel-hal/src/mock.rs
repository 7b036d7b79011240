//! Recording in-memory bus
//!
//! Implements every transport trait, records each operation in order and
//! replays queued read responses. Failures are injected per operation kind
//! so tests can exercise the error paths of drivers.

use std::collections::VecDeque;
use std::vec::Vec;

use crate::{BusConfigure, ChipSelect, ErrorType, GpioBus, I2cBus, I2cConfig, Pin, SpiBus, SpiConfig};

/// Error returned by [`MockBus`] for injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// A single recorded bus operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    I2cWrite { address: u8, data: Vec<u8> },
    I2cRead { address: u8, len: usize },
    I2cWriteRead { address: u8, data: Vec<u8>, len: usize },
    SpiWrite(Vec<u8>),
    SpiTransfer(Vec<u8>),
    ChipSelect(bool),
    Pin { pin: Pin, output: bool, high: bool },
    ConfigureI2c(I2cConfig),
    ConfigureSpi(SpiConfig),
}

/// Operation classes that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    I2cWrite,
    I2cRead,
    I2cWriteRead,
    Spi,
    Pin,
    Configure,
}

/// Recording bus used by host tests
#[derive(Debug, Default)]
pub struct MockBus {
    log: Vec<Transaction>,
    responses: VecDeque<Vec<u8>>,
    failures: Vec<(Op, usize)>,
    counts: [usize; 6],
    cs_asserted: bool,
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes returned by the next read or write-read
    pub fn push_response(&mut self, bytes: &[u8]) {
        self.responses.push_back(bytes.to_vec());
    }

    /// Fail the `nth` (0-based) future operation of the given class
    pub fn fail_nth(&mut self, op: Op, nth: usize) {
        let seen = self.counts[op as usize];
        self.failures.push((op, seen + nth));
    }

    /// Fail the next operation of the given class
    pub fn fail_next(&mut self, op: Op) {
        self.fail_nth(op, 0);
    }

    /// Every operation recorded so far
    pub fn transactions(&self) -> &[Transaction] {
        &self.log
    }

    /// Drop the recorded history (queued responses are kept)
    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Current chip-select level
    pub fn cs_asserted(&self) -> bool {
        self.cs_asserted
    }

    /// Number of SPI writes recorded
    pub fn spi_writes(&self) -> usize {
        self.log
            .iter()
            .filter(|t| matches!(t, Transaction::SpiWrite(_)))
            .count()
    }

    fn check(&mut self, op: Op) -> Result<(), MockError> {
        let n = self.counts[op as usize];
        self.counts[op as usize] += 1;
        if let Some(pos) = self.failures.iter().position(|&f| f == (op, n)) {
            self.failures.remove(pos);
            return Err(MockError);
        }
        Ok(())
    }

    fn respond(&mut self, buf: &mut [u8]) {
        let data = self.responses.pop_front().unwrap_or_default();
        for (dst, src) in buf.iter_mut().zip(data.iter()) {
            *dst = *src;
        }
    }
}

impl ErrorType for MockBus {
    type Error = MockError;
}

impl I2cBus for MockBus {
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), MockError> {
        self.log.push(Transaction::I2cWrite {
            address,
            data: data.to_vec(),
        });
        self.check(Op::I2cWrite)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), MockError> {
        self.log.push(Transaction::I2cRead {
            address,
            len: buf.len(),
        });
        self.check(Op::I2cRead)?;
        self.respond(buf);
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), MockError> {
        self.log.push(Transaction::I2cWriteRead {
            address,
            data: write_data.to_vec(),
            len: read_buf.len(),
        });
        self.check(Op::I2cWriteRead)?;
        self.respond(read_buf);
        Ok(())
    }
}

impl SpiBus for MockBus {
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), MockError> {
        self.log.push(Transaction::SpiTransfer(write.to_vec()));
        self.check(Op::Spi)?;
        self.respond(read);
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), MockError> {
        self.log.push(Transaction::SpiWrite(data.to_vec()));
        self.check(Op::Spi)
    }
}

impl ChipSelect for MockBus {
    fn set_chip_select(&mut self, asserted: bool) {
        self.cs_asserted = asserted;
        self.log.push(Transaction::ChipSelect(asserted));
    }
}

impl GpioBus for MockBus {
    fn write_pin(&mut self, pin: Pin, output: bool, high: bool) -> Result<(), MockError> {
        self.log.push(Transaction::Pin { pin, output, high });
        self.check(Op::Pin)
    }
}

impl BusConfigure for MockBus {
    fn configure_i2c(&mut self, config: I2cConfig) -> Result<(), MockError> {
        self.log.push(Transaction::ConfigureI2c(config));
        self.check(Op::Configure)
    }

    fn configure_spi(&mut self, config: SpiConfig) -> Result<(), MockError> {
        self.log.push(Transaction::ConfigureSpi(config));
        self.check(Op::Configure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut bus = MockBus::new();
        bus.set_chip_select(true);
        SpiBus::write(&mut bus, &[1, 2]).unwrap();
        bus.set_chip_select(false);

        assert_eq!(
            bus.transactions(),
            &[
                Transaction::ChipSelect(true),
                Transaction::SpiWrite(vec![1, 2]),
                Transaction::ChipSelect(false),
            ]
        );
    }

    #[test]
    fn test_responses_fill_reads() {
        let mut bus = MockBus::new();
        bus.push_response(&[0xAA, 0xBB]);
        let mut buf = [0u8; 2];
        I2cBus::read(&mut bus, 0x44, &mut buf).unwrap();
        assert_eq!(buf, [0xAA, 0xBB]);
    }

    #[test]
    fn test_fail_nth() {
        let mut bus = MockBus::new();
        bus.fail_nth(Op::I2cWrite, 1);
        assert!(I2cBus::write(&mut bus, 0x29, &[0]).is_ok());
        assert_eq!(I2cBus::write(&mut bus, 0x29, &[0]), Err(MockError));
        assert!(I2cBus::write(&mut bus, 0x29, &[0]).is_ok());
    }
}
