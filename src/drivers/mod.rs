//! Device drivers — the fixed bit-level protocols of the chips on the
//! core and peripheral boards.
//!
//! None of these own a bus: the expander and amplifiers behind the mux get
//! their bus handle per call from inside a bracketed transaction, and the
//! SPI amplifiers get their (CS-less) SPI bus the same way.

pub mod hx711;
pub mod max31856;
pub mod max31865;
pub mod pcf8575;
