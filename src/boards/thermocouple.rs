//! Thermocouple board proxy — five MAX31856 amplifiers on the shared SPI
//! bus, chip selects emulated on the board's I/O expander.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiBus;
use log::warn;

use crate::boards::with_cs;
use crate::bus::BusGate;
use crate::drivers::max31856;
use crate::drivers::pcf8575::Pcf8575;
use crate::error::{PreconditionError, Result};
use crate::pins;
use crate::ports::I2cPort;
use crate::slots::Slot;

pub const THERMOCOUPLE_COUNT: u8 = 5;

/// All chip selects idle high.
const INITIAL_WORD: u16 = 0xFFFF;

/// One thermocouple sample, in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermocoupleReading {
    pub thermocouple_c: f32,
    pub cold_junction_c: f32,
    pub fault: u8,
}

pub struct ThermocoupleBoard {
    slot: Slot,
    expander: Pcf8575,
}

impl ThermocoupleBoard {
    /// Attach to the thermocouple board in `slot` and configure every
    /// amplifier for type-K conversions.  An amplifier that fails to
    /// configure is logged and skipped; its reads will fail later.
    pub fn attach<B: I2cPort, S: SpiBus>(
        gate: &mut BusGate<B>,
        spi: &mut S,
        slot: Slot,
    ) -> Result<Self> {
        let mut expander = Pcf8575::new(pins::THERMOCOUPLE_EXPANDER_ADDRESS, INITIAL_WORD);
        gate.with_channel(slot.index(), |bus| {
            expander.init(bus)?;
            for (n, &cs) in pins::THERMOCOUPLE_CS_PINS.iter().enumerate() {
                if let Err(e) = with_cs(bus, &mut expander, cs, || max31856::init_type_k(spi)) {
                    warn!("thermocouple amplifier {n} in {slot} failed to configure: {e}");
                }
            }
            Ok(())
        })?;
        Ok(Self { slot, expander })
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Sample thermocouple channel `n` (0..=4).
    pub fn read<B: I2cPort, S: SpiBus, D: DelayNs>(
        &mut self,
        gate: &mut BusGate<B>,
        spi: &mut S,
        delay: &mut D,
        n: u8,
    ) -> Result<ThermocoupleReading> {
        if n >= THERMOCOUPLE_COUNT {
            return Err(PreconditionError::DeviceOutOfRange(n).into());
        }
        let cs = pins::THERMOCOUPLE_CS_PINS[n as usize];
        let expander = &mut self.expander;
        gate.with_channel(self.slot.index(), |bus| {
            with_cs(bus, expander, cs, || {
                let thermocouple_c = max31856::read_thermocouple(spi, delay)?;
                let cold_junction_c = max31856::read_cold_junction(spi)?;
                let fault = max31856::read_fault(spi)?;
                Ok(ThermocoupleReading {
                    thermocouple_c,
                    cold_junction_c,
                    fault,
                })
            })
        })
    }
}
