//! Port traits — the boundary between the slot/bus core and real hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ BusGate / CoreBoard / proxies
//! ```
//!
//! Driven adapters (ESP-IDF I2C driver, ADC unit, GPIO, SD card) implement
//! these traits.  The core consumes them via generics, so none of the
//! arbitration or identification logic touches hardware directly and all of
//! it runs on the host under test doubles.

use crate::error::Result;
use crate::slots::Slot;

// ───────────────────────────────────────────────────────────────
// I2C transaction port
// ───────────────────────────────────────────────────────────────

/// One two-wire bus.  Implementations report transport failures as typed
/// errors: `Nack` when a transmission is not acknowledged, `ShortRead` when
/// fewer bytes are available than requested.
pub trait I2cPort {
    /// Write `bytes` to the device at `address`.
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<()>;

    /// Read exactly `buf.len()` bytes from the device at `address`.
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Board identification port
// ───────────────────────────────────────────────────────────────

/// The 8 analog identification inputs, one per slot.
///
/// A sample is a raw 12-bit ADC count.  No filtering or retries here — the
/// classifier's noise tolerance absorbs expected jitter.
pub trait IdLines {
    fn sample(&mut self, slot: Slot) -> Result<u16>;
}

// ───────────────────────────────────────────────────────────────
// Discrete line ports
// ───────────────────────────────────────────────────────────────

/// The single digital broadcast output line.
pub trait BroadcastPort {
    fn set(&mut self, level: bool) -> Result<()>;
}

/// The core expander's interrupt line.  `is_asserted` returns `true` while
/// the expander is signalling a pin change (line pulled low).
pub trait IrqLine {
    fn is_asserted(&mut self) -> Result<bool>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (external collaborator: SD card filesystem)
// ───────────────────────────────────────────────────────────────

/// File-by-name storage on the SD card.
///
/// The filesystem itself is an external service; this port only carries the
/// operations the firmware consumes.  Failures are reported to the caller
/// and never retried here.
pub trait StoragePort {
    /// Check that a card is present and the volume can be opened.
    fn status(&mut self) -> Result<()>;

    /// Read up to `buf.len()` bytes from `name`.  Returns the byte count.
    fn read(&mut self, name: &str, buf: &mut [u8]) -> Result<usize>;

    /// Write `data` to `name`, creating the file if needed.  With `append`
    /// set, existing contents are preserved; otherwise they are replaced.
    fn write(&mut self, name: &str, data: &[u8], append: bool) -> Result<()>;

    /// Delete `name`.
    fn delete(&mut self, name: &str) -> Result<()>;
}
