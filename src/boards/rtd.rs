//! RTD board proxy — eight MAX31865 amplifiers on the shared SPI bus,
//! chip selects emulated on the board's I/O expander.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiBus;
use log::warn;

use crate::boards::with_cs;
use crate::bus::BusGate;
use crate::drivers::max31865;
use crate::drivers::pcf8575::Pcf8575;
use crate::error::{PreconditionError, Result};
use crate::pins;
use crate::ports::I2cPort;
use crate::slots::Slot;

pub const RTD_COUNT: u8 = 8;

/// All chip selects idle high.
const INITIAL_WORD: u16 = 0xFFFF;

/// One RTD sample: the raw 15-bit code and the amplifier's fault byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtdReading {
    pub code: u16,
    pub fault: u8,
}

pub struct RtdBoard {
    slot: Slot,
    expander: Pcf8575,
}

impl RtdBoard {
    /// Attach to the RTD board in `slot` and configure every amplifier for
    /// 3-wire sensing.  An amplifier that fails to configure is logged and
    /// skipped; its reads will fail later.
    pub fn attach<B: I2cPort, S: SpiBus>(
        gate: &mut BusGate<B>,
        spi: &mut S,
        slot: Slot,
    ) -> Result<Self> {
        let mut expander = Pcf8575::new(pins::RTD_EXPANDER_ADDRESS, INITIAL_WORD);
        gate.with_channel(slot.index(), |bus| {
            expander.init(bus)?;
            for (n, &cs) in pins::RTD_CS_PINS.iter().enumerate() {
                if let Err(e) = with_cs(bus, &mut expander, cs, || max31865::init_3wire(spi)) {
                    warn!("RTD amplifier {n} in {slot} failed to configure: {e}");
                }
            }
            Ok(())
        })?;
        Ok(Self { slot, expander })
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Sample RTD channel `n` (0..=7).
    pub fn read_rtd<B: I2cPort, S: SpiBus, D: DelayNs>(
        &mut self,
        gate: &mut BusGate<B>,
        spi: &mut S,
        delay: &mut D,
        n: u8,
    ) -> Result<RtdReading> {
        if n >= RTD_COUNT {
            return Err(PreconditionError::DeviceOutOfRange(n).into());
        }
        let cs = pins::RTD_CS_PINS[n as usize];
        let expander = &mut self.expander;
        gate.with_channel(self.slot.index(), |bus| {
            with_cs(bus, expander, cs, || {
                let code = max31865::read_rtd(spi, delay)?;
                let fault = max31865::read_fault(spi)?;
                if fault != 0 {
                    max31865::clear_fault(spi)?;
                }
                Ok(RtdReading { code, fault })
            })
        })
    }
}
