//! Core board facade — the one context object owning every shared
//! hardware resource.
//!
//! Constructed once at startup and passed by reference to everything that
//! needs bus access: the bus gate (slow bus + mux), the fast bus, the 8
//! analog ID lines, the local I/O expander (LEDs and buttons), and the
//! broadcast line.  There are no ambient globals; a component that does
//! not hold the facade cannot reach the hardware.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::bus::{BusGate, FastBus};
use crate::drivers::pcf8575::Pcf8575;
use crate::error::Result;
use crate::ident;
use crate::pins;
use crate::ports::{BroadcastPort, I2cPort, IdLines, IrqLine};
use crate::slots::{BoardIdentity, Slot, SlotMap};

/// LED on / off time while blinking.
const BLINK_INTERVAL_MS: u32 = 500;

/// Buttons (low byte) released high for input, LEDs (high byte) off.
const EXPANDER_INITIAL_WORD: u16 = 0x00FF;

// ───────────────────────────────────────────────────────────────
// LED / button identities
// ───────────────────────────────────────────────────────────────

/// The eight labelled LEDs on the core board, expander pins 8..=15.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl LedName {
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    /// Expander pin driving this LED.
    pub const fn pin(self) -> u8 {
        match self {
            Self::A => 8,
            Self::B => 9,
            Self::C => 10,
            Self::D => 11,
            Self::E => 12,
            Self::F => 13,
            Self::G => 14,
            Self::H => 15,
        }
    }
}

/// The eight labelled buttons on the core board, expander pins 0..=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Button {
    /// Decode the expander's button byte.  Exactly one set bit names a
    /// button; zero or several pressed at once decode to `None`.
    pub fn from_mask(mask: u8) -> Option<Self> {
        match mask {
            0x01 => Some(Self::A),
            0x02 => Some(Self::B),
            0x04 => Some(Self::C),
            0x08 => Some(Self::D),
            0x10 => Some(Self::E),
            0x20 => Some(Self::F),
            0x40 => Some(Self::G),
            0x80 => Some(Self::H),
            _ => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// CoreBoard
// ───────────────────────────────────────────────────────────────

pub struct CoreBoard<B, F, L, O, I>
where
    B: I2cPort,
    F: I2cPort,
    L: IdLines,
    O: BroadcastPort,
    I: IrqLine,
{
    gate: BusGate<B>,
    fast: FastBus<F>,
    id_lines: L,
    expander: Pcf8575,
    broadcast: O,
    irq: I,
}

impl<B, F, L, O, I> CoreBoard<B, F, L, O, I>
where
    B: I2cPort,
    F: I2cPort,
    L: IdLines,
    O: BroadcastPort,
    I: IrqLine,
{
    /// Bring up the shared resources: close every mux channel, idle the
    /// local expander, drive the broadcast line low.
    pub fn new(
        slow_bus: B,
        fast_bus: F,
        id_lines: L,
        mut broadcast: O,
        irq: I,
    ) -> Result<Self> {
        let mut gate = BusGate::new(slow_bus, pins::I2C_MUX_ADDRESS);
        gate.close_all()?;

        let mut expander = Pcf8575::new(pins::CORE_EXPANDER_ADDRESS, EXPANDER_INITIAL_WORD);
        expander.init(gate.trunk())?;

        broadcast.set(false)?;

        info!("core board initialised");
        Ok(Self {
            gate,
            fast: FastBus::new(fast_bus),
            id_lines,
            expander,
            broadcast,
            irq,
        })
    }

    /// The bus gate, for attaching and driving peripheral board proxies.
    pub fn gate(&mut self) -> &mut BusGate<B> {
        &mut self.gate
    }

    // ── Identification ────────────────────────────────────────

    /// Run one identification pass over all 8 slots.
    pub fn identify(&mut self) -> Result<SlotMap> {
        ident::identify(&mut self.id_lines)
    }

    /// The unique slot carrying `identity`, from a fresh pass.
    pub fn find_board(&mut self, identity: BoardIdentity) -> Result<Slot> {
        self.identify()?.find(identity)
    }

    // ── Fast bus primitives ───────────────────────────────────

    pub fn fast_write(&mut self, address: u8, bytes: &[u8]) -> Result<()> {
        self.fast.write(address, bytes)
    }

    pub fn fast_read(&mut self, address: u8, buf: &mut [u8]) -> Result<()> {
        self.fast.read(address, buf)
    }

    // ── Local I/O ─────────────────────────────────────────────

    /// Blink `led` on the local expander, 500 ms on / 500 ms off.
    pub fn blink_led<D: DelayNs>(
        &mut self,
        delay: &mut D,
        led: LedName,
        blinks: u8,
    ) -> Result<()> {
        let pin = led.pin();
        for _ in 0..blinks {
            self.expander.write_pin(self.gate.trunk(), pin, true)?;
            delay.delay_ms(BLINK_INTERVAL_MS);
            self.expander.write_pin(self.gate.trunk(), pin, false)?;
            delay.delay_ms(BLINK_INTERVAL_MS);
        }
        Ok(())
    }

    /// Poll for a button press.  Reads the expander only while its
    /// interrupt line is asserted; several buttons held at once decode to
    /// `None`, same as no press.
    pub fn button_pressed(&mut self) -> Result<Option<Button>> {
        if !self.irq.is_asserted()? {
            return Ok(None);
        }
        let word = self.expander.read_all(self.gate.trunk())?;
        Ok(Button::from_mask((word & 0x00FF) as u8))
    }

    /// Drive the broadcast output line.
    pub fn set_broadcast(&mut self, level: bool) -> Result<()> {
        self.broadcast.set(level)
    }
}
