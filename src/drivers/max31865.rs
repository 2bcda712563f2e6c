//! MAX31865 RTD amplifier — one-shot read sequence over SPI.
//!
//! Chip select is not part of this driver: on the RTD board the CS lines
//! are expander pins, asserted by the proxy inside a bracketed transaction.
//! Every function here assumes CS is already low and leaves it low.
//!
//! Returns the raw 15-bit RTD code; resistance and temperature conversion
//! are the caller's business.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiBus;

use crate::error::{Error, Result, TransportError};

// Register map.
const REG_CONFIG: u8 = 0x00;
const REG_RTD_MSB: u8 = 0x01;
const REG_FAULT: u8 = 0x07;

// Write addresses set the MSB.
const WRITE_FLAG: u8 = 0x80;

// Config register bits.
const CFG_VBIAS: u8 = 0x80;
const CFG_ONE_SHOT: u8 = 0x20;
const CFG_3WIRE: u8 = 0x10;
const CFG_FAULT_CLEAR: u8 = 0x02;

/// Bias settling time before triggering a conversion (10.5 RC time
/// constants, datasheet table 3).
const BIAS_SETTLE_MS: u32 = 10;

/// Worst-case one-shot conversion time in 60 Hz filter mode.
const CONVERSION_MS: u32 = 65;

/// Configure the amplifier for 3-wire sensing, bias off.
pub fn init_3wire<S: SpiBus>(spi: &mut S) -> Result<()> {
    write_register(spi, REG_CONFIG, CFG_3WIRE)
}

/// Trigger a one-shot conversion and return the raw 15-bit RTD code.
pub fn read_rtd<S: SpiBus, D: DelayNs>(spi: &mut S, delay: &mut D) -> Result<u16> {
    // Bias up, let the reference settle, then fire the conversion.
    write_register(spi, REG_CONFIG, CFG_VBIAS | CFG_3WIRE)?;
    delay.delay_ms(BIAS_SETTLE_MS);
    write_register(spi, REG_CONFIG, CFG_VBIAS | CFG_3WIRE | CFG_ONE_SHOT)?;
    delay.delay_ms(CONVERSION_MS);

    let mut raw = [0u8; 2];
    read_registers(spi, REG_RTD_MSB, &mut raw)?;

    // Bias back off between reads to limit RTD self-heating.
    write_register(spi, REG_CONFIG, CFG_3WIRE)?;

    // Bit 0 of the LSB is the fault flag; the code is the upper 15 bits.
    Ok((u16::from(raw[0]) << 8 | u16::from(raw[1])) >> 1)
}

/// Read the fault status register.
pub fn read_fault<S: SpiBus>(spi: &mut S) -> Result<u8> {
    let mut raw = [0u8; 1];
    read_registers(spi, REG_FAULT, &mut raw)?;
    Ok(raw[0])
}

/// Clear any latched fault.
pub fn clear_fault<S: SpiBus>(spi: &mut S) -> Result<()> {
    write_register(spi, REG_CONFIG, CFG_3WIRE | CFG_FAULT_CLEAR)
}

fn write_register<S: SpiBus>(spi: &mut S, register: u8, value: u8) -> Result<()> {
    spi.write(&[register | WRITE_FLAG, value]).map_err(spi_err)?;
    spi.flush().map_err(spi_err)
}

fn read_registers<S: SpiBus>(spi: &mut S, register: u8, buf: &mut [u8]) -> Result<()> {
    spi.write(&[register]).map_err(spi_err)?;
    spi.read(buf).map_err(spi_err)?;
    spi.flush().map_err(spi_err)
}

fn spi_err<E>(_: E) -> Error {
    TransportError::Spi.into()
}
