//! PCF8575 16-bit I2C I/O expander driver.
//!
//! The chip has quasi-bidirectional pins: writing 1 releases a pin (weak
//! high, usable as an input), writing 0 drives it low.  Every write sends
//! the full 16-bit word, so the driver caches the last written word and
//! read-modify-writes it for single-pin updates.  A pin read is only
//! meaningful while its cached latch bit is 1.
//!
//! The driver holds no bus: the board expanders live behind the mux, so
//! the bus reference arrives per call from inside a bracketed transaction.

use crate::error::Result;
use crate::ports::I2cPort;

pub struct Pcf8575 {
    address: u8,
    /// Last word driven onto the pins.
    output: u16,
}

impl Pcf8575 {
    /// `initial` is the word pushed by [`init`](Self::init): 1 bits for
    /// pins used as inputs, 0 for outputs that idle low.
    pub fn new(address: u8, initial: u16) -> Self {
        Self {
            address,
            output: initial,
        }
    }

    /// Drive the initial word onto the pins.
    pub fn init<B: I2cPort>(&mut self, bus: &mut B) -> Result<()> {
        let word = self.output;
        self.write_all(bus, word)
    }

    /// Drive a full 16-bit word.
    pub fn write_all<B: I2cPort>(&mut self, bus: &mut B, word: u16) -> Result<()> {
        bus.write(self.address, &[word as u8, (word >> 8) as u8])?;
        self.output = word;
        Ok(())
    }

    /// Read all 16 pins.
    pub fn read_all<B: I2cPort>(&mut self, bus: &mut B) -> Result<u16> {
        let mut raw = [0u8; 2];
        bus.read(self.address, &mut raw)?;
        Ok(u16::from(raw[0]) | (u16::from(raw[1]) << 8))
    }

    /// Set a single pin, leaving the rest of the word as last driven.
    pub fn write_pin<B: I2cPort>(&mut self, bus: &mut B, pin: u8, high: bool) -> Result<()> {
        debug_assert!(pin < 16);
        let word = if high {
            self.output | (1 << pin)
        } else {
            self.output & !(1 << pin)
        };
        self.write_all(bus, word)
    }

    /// Read a single pin.
    pub fn read_pin<B: I2cPort>(&mut self, bus: &mut B, pin: u8) -> Result<bool> {
        debug_assert!(pin < 16);
        Ok(self.read_all(bus)? & (1 << pin) != 0)
    }

    /// Last word driven onto the pins.
    pub fn output_word(&self) -> u16 {
        self.output
    }
}
