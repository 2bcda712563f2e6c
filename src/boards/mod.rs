//! Peripheral board proxies.
//!
//! Each proxy pairs the [`Slot`](crate::slots::Slot) it was attached to
//! with the driver state for that board's devices.  Every public operation
//! is a bracketed transaction: the proxy borrows the bus gate, the gate
//! opens the slot's mux channel, the device exchange runs, and the channel
//! closes on every exit path.  Proxies never touch the mux themselves.

pub mod igniter;
pub mod pt;
pub mod rtd;
pub mod thermocouple;

pub use igniter::IgniterBoard;
pub use pt::PtBoard;
pub use rtd::RtdBoard;
pub use thermocouple::ThermocoupleBoard;

use crate::drivers::pcf8575::Pcf8575;
use crate::error::Result;
use crate::ports::I2cPort;

/// Run `body` with an expander-driven chip select asserted (low), raising
/// it again afterwards regardless of the outcome.  Same discipline as the
/// channel bracket one level up: no exit path leaves the line asserted.
pub(crate) fn with_cs<B: I2cPort, T>(
    bus: &mut B,
    expander: &mut Pcf8575,
    cs_pin: u8,
    body: impl FnOnce() -> Result<T>,
) -> Result<T> {
    expander.write_pin(bus, cs_pin, false)?;
    let result = body();
    let raised = expander.write_pin(bus, cs_pin, true);
    match (result, raised) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(raise_err)) => Err(raise_err),
        (Err(body_err), _) => Err(body_err),
    }
}
