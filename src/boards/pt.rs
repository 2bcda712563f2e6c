//! Pressure-transducer / load-cell board proxy.
//!
//! Six PT channels and two load-cell channels, each an HX711 amplifier
//! whose clock and data lines are pins on the board's I/O expander.  A
//! sample is one bracketed transaction: channel open, bounded ready-wait,
//! 24-bit shift-in plus gain pulses, channel closed.

use embedded_hal::delay::DelayNs;

use crate::bus::BusGate;
use crate::drivers::hx711::{self, Gain};
use crate::drivers::pcf8575::Pcf8575;
use crate::error::{PreconditionError, Result};
use crate::pins;
use crate::ports::I2cPort;
use crate::slots::Slot;

pub const PT_COUNT: u8 = 6;
pub const LOAD_CELL_COUNT: u8 = 2;

/// Clock pins low, data pins released high for input.
const INITIAL_WORD: u16 = 0x55AA;

pub struct PtBoard {
    slot: Slot,
    expander: Pcf8575,
}

impl PtBoard {
    /// Attach to the PT board in `slot`, idling every amplifier's lines.
    pub fn attach<B: I2cPort>(gate: &mut BusGate<B>, slot: Slot) -> Result<Self> {
        let mut expander = Pcf8575::new(pins::PT_EXPANDER_ADDRESS, INITIAL_WORD);
        gate.with_channel(slot.index(), |bus| expander.init(bus))?;
        Ok(Self { slot, expander })
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Sample pressure-transducer channel `pt` (0..=5).
    pub fn read_pt<B: I2cPort, D: DelayNs>(
        &mut self,
        gate: &mut BusGate<B>,
        delay: &mut D,
        pt: u8,
        gain: Gain,
    ) -> Result<i32> {
        if pt >= PT_COUNT {
            return Err(PreconditionError::DeviceOutOfRange(pt).into());
        }
        let (clk, data) = pins::PT_CHANNEL_PINS[pt as usize];
        self.read_amplifier(gate, delay, clk, data, gain)
    }

    /// Sample load-cell channel `lc` (0..=1).
    pub fn read_load_cell<B: I2cPort, D: DelayNs>(
        &mut self,
        gate: &mut BusGate<B>,
        delay: &mut D,
        lc: u8,
        gain: Gain,
    ) -> Result<i32> {
        if lc >= LOAD_CELL_COUNT {
            return Err(PreconditionError::DeviceOutOfRange(lc).into());
        }
        let (clk, data) = pins::LC_CHANNEL_PINS[lc as usize];
        self.read_amplifier(gate, delay, clk, data, gain)
    }

    fn read_amplifier<B: I2cPort, D: DelayNs>(
        &mut self,
        gate: &mut BusGate<B>,
        delay: &mut D,
        clk: u8,
        data: u8,
        gain: Gain,
    ) -> Result<i32> {
        let expander = &mut self.expander;
        gate.with_channel(self.slot.index(), |bus| {
            hx711::read_sample(bus, expander, delay, clk, data, gain)
        })
    }
}
