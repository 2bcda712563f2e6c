//! Raw transaction primitives for the dedicated fast bus.
//!
//! The fast bus has exactly one fixed peer, so there is no channel
//! arbitration and no slot scoping — just write/read with typed transport
//! errors.

use crate::error::Result;
use crate::ports::I2cPort;

pub struct FastBus<B: I2cPort> {
    bus: B,
}

impl<B: I2cPort> FastBus<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn write(&mut self, address: u8, bytes: &[u8]) -> Result<()> {
        self.bus.write(address, bytes)
    }

    pub fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<()> {
        self.bus.read(address, buf)
    }
}
