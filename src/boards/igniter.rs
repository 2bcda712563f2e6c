//! Igniter board proxy — six relays on an I/O expander.

use crate::bus::BusGate;
use crate::drivers::pcf8575::Pcf8575;
use crate::error::{PreconditionError, Result};
use crate::pins;
use crate::ports::I2cPort;
use crate::slots::Slot;

/// Relays on the board, driven by expander pins 0..=5.
pub const RELAY_COUNT: u8 = 6;

/// All relays de-energised at power-up.
const INITIAL_WORD: u16 = 0x0000;

pub struct IgniterBoard {
    slot: Slot,
    expander: Pcf8575,
}

impl IgniterBoard {
    /// Attach to the igniter board in `slot`, driving every relay open.
    pub fn attach<B: I2cPort>(gate: &mut BusGate<B>, slot: Slot) -> Result<Self> {
        let mut expander = Pcf8575::new(pins::IGNITER_EXPANDER_ADDRESS, INITIAL_WORD);
        gate.with_channel(slot.index(), |bus| expander.init(bus))?;
        Ok(Self { slot, expander })
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Energise relay `relay` (0..=5).
    pub fn open_relay<B: I2cPort>(&mut self, gate: &mut BusGate<B>, relay: u8) -> Result<()> {
        self.set_relay(gate, relay, true)
    }

    /// De-energise relay `relay` (0..=5).
    pub fn close_relay<B: I2cPort>(&mut self, gate: &mut BusGate<B>, relay: u8) -> Result<()> {
        self.set_relay(gate, relay, false)
    }

    fn set_relay<B: I2cPort>(
        &mut self,
        gate: &mut BusGate<B>,
        relay: u8,
        energised: bool,
    ) -> Result<()> {
        if relay >= RELAY_COUNT {
            return Err(PreconditionError::DeviceOutOfRange(relay).into());
        }
        let expander = &mut self.expander;
        gate.with_channel(self.slot.index(), |bus| {
            expander.write_pin(bus, relay, energised)
        })
    }
}
