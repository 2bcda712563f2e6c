//! GroundTest Firmware — Main Entry Point
//!
//! One context object owns the hardware; everything else borrows it.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  EspI2c ×2        EspIdLines      EspBroadcastPin            │
//! │  (slow/fast bus)  (ID ADC)        EspIrqLine   SdStorage     │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │  CoreBoard: BusGate · FastBus · Slot Identifier    │      │
//! │  │  Proxies: Igniter · PT/LC · RTD · Thermocouple     │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Execution is single-threaded and polled: one operation runs to
//! completion before the next begins, and every device wait is bounded.

#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod pins;

pub mod boards;
pub mod bus;
pub mod core_board;
pub mod ident;
pub mod ports;
pub mod slots;

mod adapters;
mod drivers;

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiBus;
use log::{info, warn};

use esp_idf_hal::delay::Delay;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::spi::config::Config as SpiConfig;
use esp_idf_hal::spi::{SpiBusDriver, SpiDeviceDriver, SpiDriver, SpiDriverConfig};
use esp_idf_hal::units::Hertz;

use adapters::gpio::{EspBroadcastPin, EspIrqLine};
use adapters::i2c::EspI2c;
use adapters::id_adc::EspIdLines;
use adapters::sd_card::SdStorage;
use boards::{IgniterBoard, PtBoard, RtdBoard, ThermocoupleBoard};
use config::StandConfig;
use core_board::{Button, CoreBoard, LedName};
use ports::{BroadcastPort, I2cPort, IdLines, IrqLine, StoragePort};
use slots::BoardIdentity;

/// Sample sweeps are appended here, one CSV line per channel.
const SAMPLE_LOG_FILE: &str = "samples.csv";

/// How long the test relay stays energised on a button-C pulse.
const RELAY_PULSE_MS: u32 = 1000;

// ── Attached peripheral boards ────────────────────────────────

/// Proxies for whatever the identification pass discovered.
struct AttachedBoards {
    igniter: Option<IgniterBoard>,
    pt_a: Option<PtBoard>,
    pt_b: Option<PtBoard>,
    rtd: Option<RtdBoard>,
    thermocouple: Option<ThermocoupleBoard>,
}

/// Run an identification pass and attach a proxy per discovered board.
fn attach_boards<B, F, L, O, I, S>(
    core: &mut CoreBoard<B, F, L, O, I>,
    spi: &mut S,
) -> Result<AttachedBoards>
where
    B: I2cPort,
    F: I2cPort,
    L: IdLines,
    O: BroadcastPort,
    I: IrqLine,
    S: SpiBus,
{
    let map = core.identify()?;
    for (slot, identity) in map.occupied() {
        info!("{slot}: {identity} board");
    }

    let mut attached = AttachedBoards {
        igniter: None,
        pt_a: None,
        pt_b: None,
        rtd: None,
        thermocouple: None,
    };

    for (slot, identity) in map.occupied() {
        let result = match identity {
            BoardIdentity::Igniter => {
                IgniterBoard::attach(core.gate(), slot).map(|b| attached.igniter = Some(b))
            }
            BoardIdentity::PtA => {
                PtBoard::attach(core.gate(), slot).map(|b| attached.pt_a = Some(b))
            }
            BoardIdentity::PtB => {
                PtBoard::attach(core.gate(), slot).map(|b| attached.pt_b = Some(b))
            }
            BoardIdentity::Rtd => {
                RtdBoard::attach(core.gate(), spi, slot).map(|b| attached.rtd = Some(b))
            }
            BoardIdentity::Thermocouple => ThermocoupleBoard::attach(core.gate(), spi, slot)
                .map(|b| attached.thermocouple = Some(b)),
            // Solenoid and servo boards carry no readable devices yet.
            BoardIdentity::Solenoid | BoardIdentity::Servo => Ok(()),
        };
        if let Err(e) = result {
            warn!("failed to attach {identity} board in {slot}: {e}");
        }
    }

    Ok(attached)
}

// ── Sample sweep ──────────────────────────────────────────────

/// Read every channel of every attached sensor board, log the readings
/// and append them as CSV to the SD card.
fn sample_sweep<B, F, L, O, I, S, D, St>(
    core: &mut CoreBoard<B, F, L, O, I>,
    boards: &mut AttachedBoards,
    spi: &mut S,
    delay: &mut D,
    storage: &mut St,
    config: &StandConfig,
) -> Result<()>
where
    B: I2cPort,
    F: I2cPort,
    L: IdLines,
    O: BroadcastPort,
    I: IrqLine,
    S: SpiBus,
    D: DelayNs,
    St: StoragePort,
{
    let gain = config.gain()?;
    let mut csv = String::new();

    if config.broadcast_during_sampling {
        core.set_broadcast(true)?;
    }

    for (label, pt_board) in [("pt_a", &mut boards.pt_a), ("pt_b", &mut boards.pt_b)] {
        if let Some(board) = pt_board {
            for pt in 0..boards::pt::PT_COUNT {
                match board.read_pt(core.gate(), delay, pt, gain) {
                    Ok(sample) => {
                        info!("{label} PT{pt}: {sample}");
                        csv.push_str(&format!("{label},pt{pt},{sample}\n"));
                    }
                    Err(e) => warn!("{label} PT{pt}: {e}"),
                }
            }
            for lc in 0..boards::pt::LOAD_CELL_COUNT {
                match board.read_load_cell(core.gate(), delay, lc, gain) {
                    Ok(sample) => {
                        info!("{label} LC{lc}: {sample}");
                        csv.push_str(&format!("{label},lc{lc},{sample}\n"));
                    }
                    Err(e) => warn!("{label} LC{lc}: {e}"),
                }
            }
        }
    }

    if let Some(board) = &mut boards.rtd {
        for n in 0..boards::rtd::RTD_COUNT {
            match board.read_rtd(core.gate(), spi, delay, n) {
                Ok(reading) => {
                    info!("RTD{n}: code {} fault {:#04x}", reading.code, reading.fault);
                    csv.push_str(&format!("rtd,ch{n},{}\n", reading.code));
                }
                Err(e) => warn!("RTD{n}: {e}"),
            }
        }
    }

    if let Some(board) = &mut boards.thermocouple {
        for n in 0..boards::thermocouple::THERMOCOUPLE_COUNT {
            match board.read(core.gate(), spi, delay, n) {
                Ok(reading) => {
                    info!(
                        "TC{n}: {:.2} C (cold junction {:.2} C, fault {:#04x})",
                        reading.thermocouple_c, reading.cold_junction_c, reading.fault
                    );
                    csv.push_str(&format!("tc,ch{n},{:.2}\n", reading.thermocouple_c));
                }
                Err(e) => warn!("TC{n}: {e}"),
            }
        }
    }

    if config.broadcast_during_sampling {
        core.set_broadcast(false)?;
    }

    if !csv.is_empty() {
        if let Err(e) = storage.write(SAMPLE_LOG_FILE, csv.as_bytes(), true) {
            warn!("sample log append failed: {e}");
        }
    }

    Ok(())
}

/// Energise relay 0, hold for [`RELAY_PULSE_MS`], de-energise.
fn pulse_relay<B: I2cPort, D: DelayNs>(
    igniter: &mut IgniterBoard,
    gate: &mut bus::BusGate<B>,
    delay: &mut D,
) -> error::Result<()> {
    igniter.open_relay(gate, 0)?;
    delay.delay_ms(RELAY_PULSE_MS);
    igniter.close_relay(gate, 0)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("GroundTest v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;
    let p = peripherals.pins;
    let mut delay = Delay::new_default();

    // ── 2. Buses ──────────────────────────────────────────────
    // Pin numbers here mirror the tables in `pins.rs`.
    let i2c_config = I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ));
    let slow_bus = EspI2c::new(I2cDriver::new(
        peripherals.i2c0,
        p.gpio21,
        p.gpio22,
        &i2c_config,
    )?);
    let fast_bus = EspI2c::new(I2cDriver::new(
        peripherals.i2c1,
        p.gpio16,
        p.gpio17,
        &i2c_config,
    )?);

    // Peripheral SPI bus (amplifiers; CS lines live on the board expanders).
    let amp_driver = SpiDriver::new(
        peripherals.spi2,
        p.gpio14,
        p.gpio13,
        Some(p.gpio12),
        &SpiDriverConfig::new(),
    )?;
    let mut amp_spi = SpiBusDriver::new(amp_driver, &SpiConfig::new().baudrate(Hertz(1_000_000)))?;

    // Core SPI bus (SD card).
    let sd_driver = SpiDriver::new(
        peripherals.spi3,
        p.gpio18,
        p.gpio23,
        Some(p.gpio19),
        &SpiDriverConfig::new(),
    )?;
    let sd_device = SpiDeviceDriver::new(
        sd_driver,
        Some(p.gpio5),
        &SpiConfig::new().baudrate(Hertz(20_000_000)),
    )?;

    // ── 3. Core board facade ──────────────────────────────────
    let id_lines = EspIdLines::new()?;
    let broadcast = EspBroadcastPin::new(pins::BROADCAST_GPIO)?;
    let irq = EspIrqLine::new(pins::EXPANDER_IRQ_GPIO)?;
    let mut core = CoreBoard::new(slow_bus, fast_bus, id_lines, broadcast, irq)?;

    // ── 4. Storage + config ───────────────────────────────────
    let mut storage = SdStorage::new(sd_device, Delay::new_default());
    match storage.status() {
        Ok(()) => info!("SD card mounted"),
        Err(e) => warn!("SD card unavailable ({e}); sample logging disabled"),
    }
    let stand_config = StandConfig::load(&mut storage)?;
    info!(
        "config: gain {}, poll {} ms",
        stand_config.hx711_gain, stand_config.button_poll_interval_ms
    );

    // ── 5. Identification pass + proxies ──────────────────────
    let mut boards = attach_boards(&mut core, &mut amp_spi)?;

    core.blink_led(&mut delay, LedName::A, 1)?;
    info!("System ready. Polling buttons.");

    // ── 6. Polled loop ────────────────────────────────────────
    loop {
        match core.button_pressed() {
            Ok(Some(Button::A)) => {
                info!("button A: re-running identification");
                match attach_boards(&mut core, &mut amp_spi) {
                    Ok(rescanned) => boards = rescanned,
                    Err(e) => warn!("identification failed, keeping proxies: {e}"),
                }
            }
            Ok(Some(Button::B)) => {
                info!("button B: sample sweep");
                if let Err(e) = sample_sweep(
                    &mut core,
                    &mut boards,
                    &mut amp_spi,
                    &mut delay,
                    &mut storage,
                    &stand_config,
                ) {
                    warn!("sample sweep failed: {e}");
                }
            }
            Ok(Some(Button::C)) => {
                info!("button C: relay 0 pulse");
                match &mut boards.igniter {
                    Some(igniter) => {
                        if let Err(e) = pulse_relay(igniter, core.gate(), &mut delay) {
                            warn!("relay pulse failed: {e}");
                        }
                    }
                    None => warn!("no igniter board attached"),
                }
            }
            Ok(Some(Button::D)) => match storage.status() {
                Ok(()) => info!("SD card OK"),
                Err(e) => warn!("SD card: {e}"),
            },
            Ok(Some(_)) | Ok(None) => {}
            Err(e) => warn!("button poll failed: {e}"),
        }
        delay.delay_ms(stand_config.button_poll_interval_ms);
    }
}
