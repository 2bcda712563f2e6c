//! Unified error types for the GroundTest firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! main loop's error handling uniform.  All variants are `Copy` so they can
//! be passed around and logged without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A caller-supplied index was rejected before any hardware access.
    Precondition(PreconditionError),
    /// A bus or device transaction failed.
    Transport(TransportError),
    /// A board-identity lookup over the slot map failed.
    Ident(IdentError),
    /// SD card / file operation failed.
    Storage(StorageError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Precondition(e) => write!(f, "precondition: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Ident(e) => write!(f, "ident: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Precondition errors
// ---------------------------------------------------------------------------

/// Invalid caller input, rejected before touching the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionError {
    /// Slot index outside [0,7].
    SlotOutOfRange(u8),
    /// Device index (relay, amplifier channel) outside the board's range.
    DeviceOutOfRange(u8),
    /// Gain setting not one of the values the amplifier supports.
    UnsupportedGain(u8),
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotOutOfRange(slot) => write!(f, "slot {slot} out of range"),
            Self::DeviceOutOfRange(n) => write!(f, "device index {n} out of range"),
            Self::UnsupportedGain(g) => write!(f, "unsupported gain {g}"),
        }
    }
}

impl From<PreconditionError> for Error {
    fn from(e: PreconditionError) -> Self {
        Self::Precondition(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// I2C transmission was not acknowledged.
    Nack,
    /// Fewer bytes were available than requested.
    ShortRead,
    /// Device did not signal ready within its bounded wait.
    NotReady,
    /// SPI transfer failed.
    Spi,
    /// ADC sample could not be taken.
    AdcReadFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nack => write!(f, "transmission not acknowledged"),
            Self::ShortRead => write!(f, "short read"),
            Self::NotReady => write!(f, "device not ready"),
            Self::Spi => write!(f, "SPI transfer failed"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Identification errors
// ---------------------------------------------------------------------------

/// A lookup-by-identity over the slot map must name exactly one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentError {
    /// No slot carries the requested board identity.
    NotFound,
    /// More than one slot matched the requested board identity.
    Ambiguous,
}

impl fmt::Display for IdentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "board not found in any slot"),
            Self::Ambiguous => write!(f, "board found in multiple slots"),
        }
    }
}

impl From<IdentError> for Error {
    fn from(e: IdentError) -> Self {
        Self::Ident(e)
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// No SD card detected.
    NoCard,
    /// Requested file does not exist.
    NotFound,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCard => write!(f, "no SD card"),
            Self::NotFound => write!(f, "file not found"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
