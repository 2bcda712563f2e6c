//! MAX31856 thermocouple amplifier — one-shot read sequence over SPI.
//!
//! As with the RTD amplifier, chip select is an expander pin owned by the
//! proxy; every function assumes CS is already asserted.
//!
//! Register values are scaled by their datasheet LSB weight and nothing
//! more: the linearised thermocouple reading is 2^-7 degC per count, the
//! cold junction 2^-8 degC per count.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiBus;

use crate::error::{Error, Result, TransportError};

// Register map.
const REG_CR0: u8 = 0x00;
const REG_CR1: u8 = 0x01;
const REG_CJTH: u8 = 0x0A;
const REG_LTCBH: u8 = 0x0C;
const REG_SR: u8 = 0x0F;

const WRITE_FLAG: u8 = 0x80;

// CR0 bits.
const CR0_ONE_SHOT: u8 = 0x40;

// CR1: 1-sample averaging, type K.
const CR1_TYPE_K: u8 = 0x03;

/// Worst-case one-shot conversion time (datasheet: 155 ms typ, 185 ms max
/// in 60 Hz mode; cold-junction conversion adds another cycle).
const CONVERSION_MS: u32 = 250;

/// Configure the amplifier for type-K, single-sample conversions.
pub fn init_type_k<S: SpiBus>(spi: &mut S) -> Result<()> {
    write_register(spi, REG_CR1, CR1_TYPE_K)
}

/// Trigger a one-shot conversion and return the linearised thermocouple
/// temperature in degrees Celsius.
pub fn read_thermocouple<S: SpiBus, D: DelayNs>(spi: &mut S, delay: &mut D) -> Result<f32> {
    trigger_one_shot(spi)?;
    delay.delay_ms(CONVERSION_MS);

    let mut raw = [0u8; 3];
    read_registers(spi, REG_LTCBH, &mut raw)?;

    // 19-bit two's complement, left-justified over three bytes.
    let mut counts =
        (i32::from(raw[0]) << 16 | i32::from(raw[1]) << 8 | i32::from(raw[2])) >> 5;
    if raw[0] & 0x80 != 0 {
        counts -= 1 << 19;
    }
    Ok(counts as f32 * 0.007_812_5)
}

/// Read the cold-junction temperature in degrees Celsius.
pub fn read_cold_junction<S: SpiBus>(spi: &mut S) -> Result<f32> {
    let mut raw = [0u8; 2];
    read_registers(spi, REG_CJTH, &mut raw)?;
    let counts = i16::from_be_bytes(raw);
    Ok(f32::from(counts) / 256.0)
}

/// Read the fault status register.
pub fn read_fault<S: SpiBus>(spi: &mut S) -> Result<u8> {
    let mut raw = [0u8; 1];
    read_registers(spi, REG_SR, &mut raw)?;
    Ok(raw[0])
}

fn trigger_one_shot<S: SpiBus>(spi: &mut S) -> Result<()> {
    let mut cr0 = [0u8; 1];
    read_registers(spi, REG_CR0, &mut cr0)?;
    write_register(spi, REG_CR0, cr0[0] | CR0_ONE_SHOT)
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
