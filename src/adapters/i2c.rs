#![cfg(target_os = "espidf")]

//! ESP-IDF I2C adapter.
//!
//! Wraps an `I2cDriver` behind [`I2cPort`], mapping ESP-IDF error codes
//! onto the transport taxonomy: a failed write is a NACK, a failed read a
//! short read.  The exact IDF code is logged at debug level.

use esp_idf_hal::delay::BLOCK;
use esp_idf_hal::i2c::I2cDriver;
use log::debug;

use crate::error::{Result, TransportError};
use crate::ports::I2cPort;

pub struct EspI2c<'d> {
    driver: I2cDriver<'d>,
}

impl<'d> EspI2c<'d> {
    pub fn new(driver: I2cDriver<'d>) -> Self {
        Self { driver }
    }
}

impl I2cPort for EspI2c<'_> {
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<()> {
        self.driver.write(address, bytes, BLOCK).map_err(|e| {
            debug!("i2c write to {address:#04x} failed: {e}");
            TransportError::Nack.into()
        })
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<()> {
        self.driver.read(address, buf, BLOCK).map_err(|e| {
            debug!("i2c read from {address:#04x} failed: {e}");
            TransportError::ShortRead.into()
        })
    }
}
