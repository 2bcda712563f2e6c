//! Bus subsystem — the multiplexed slow bus and the dedicated fast bus.
//!
//! The slow bus fans out through an 8-channel mux, one channel per slot;
//! [`gate::BusGate`] owns that bus and is the only code path that opens or
//! closes channels.  The fast bus has exactly one fixed peer and needs no
//! arbitration; [`fast::FastBus`] exposes its raw transaction primitives.

pub mod fast;
pub mod gate;

pub use fast::FastBus;
pub use gate::BusGate;
