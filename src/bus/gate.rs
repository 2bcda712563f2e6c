//! Mux channel arbitration for the shared slow bus.
//!
//! Every transaction with a peripheral board is *bracketed*: the board's
//! mux channel is opened, the transaction runs, and the channel is closed
//! again — on every exit path.  [`BusGate`] owns the slow bus and the mux,
//! so the bracketing cannot be bypassed or nested: the operation closure
//! receives the bus itself, not the gate, and therefore cannot re-enter
//! `with_channel` for another slot.

use log::warn;

use crate::error::Result;
use crate::ports::I2cPort;
use crate::slots::Slot;

/// Control word that closes every mux channel.
const ALL_CHANNELS_CLOSED: u8 = 0x00;

/// Gatekeeper for the multiplexed slow bus.
///
/// The mux is a TCA9548A-style switch: writing a one-hot byte to its bus
/// address connects that channel's segment to the trunk.  The gate always
/// writes one-hot masks, so at most one channel is ever open.
pub struct BusGate<B: I2cPort> {
    bus: B,
    mux_address: u8,
}

impl<B: I2cPort> BusGate<B> {
    pub fn new(bus: B, mux_address: u8) -> Self {
        Self { bus, mux_address }
    }

    /// Close every channel.  Called once at startup so the bus starts from
    /// a known state, and available to callers recovering from a wedged
    /// transaction.
    pub fn close_all(&mut self) -> Result<()> {
        self.bus.write(self.mux_address, &[ALL_CHANNELS_CLOSED])
    }

    /// Run `op` with the channel for `slot` open, closing it afterwards
    /// regardless of whether `op` succeeded.
    ///
    /// `slot` is validated before any bus access; an out-of-range index is
    /// a precondition error, never clamped.  If `op` fails, its error is
    /// returned and the close still runs.  If `op` succeeds but the close
    /// fails, the close's transport error is returned — the caller must
    /// know the channel may be stuck open.
    pub fn with_channel<T>(
        &mut self,
        slot: u8,
        op: impl FnOnce(&mut B) -> Result<T>,
    ) -> Result<T> {
        let slot = Slot::new(slot)?;
        self.bus.write(self.mux_address, &[1 << slot.index()])?;

        let result = op(&mut self.bus);
        let closed = self.bus.write(self.mux_address, &[ALL_CHANNELS_CLOSED]);

        match (result, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(op_err), closed) => {
                if closed.is_err() {
                    warn!("mux channel for {slot} failed to close after a failed transaction");
                }
                Err(op_err)
            }
        }
    }

    /// Direct access to devices wired on the trunk segment of the slow bus
    /// (mux upstream): the mux itself and the core expander.  Trunk traffic
    /// never touches the mux control register.
    pub fn trunk(&mut self) -> &mut B {
        &mut self.bus
    }
}
