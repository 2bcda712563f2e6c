#![cfg(target_os = "espidf")]

//! Board-ID ADC adapter.
//!
//! The 8 identification lines land on both converters of the ESP32 —
//! slots 0..=5 on ADC1, slots 6..=7 (GPIO 0 and 2) on ADC2 — so the
//! adapter owns a oneshot unit handle for each.  Handles live in this
//! struct, not in statics: the facade owns the adapter and everything
//! reaches the hardware through it.

use esp_idf_svc::sys::*;
use log::info;

use crate::error::{Error, Result, TransportError};
use crate::ports::IdLines;
use crate::slots::Slot;

/// (unit, channel) per slot, matching `pins::BOARD_ID_GPIOS`:
/// GPIO 36/39/34/35/32/33 are ADC1 CH0/3/6/7/4/5; GPIO 0/2 are ADC2 CH1/2.
const ID_CHANNELS: [(u8, adc_channel_t); 8] = [
    (1, 0),
    (1, 3),
    (1, 6),
    (1, 7),
    (1, 4),
    (1, 5),
    (2, 1),
    (2, 2),
];

pub struct EspIdLines {
    adc1: adc_oneshot_unit_handle_t,
    adc2: adc_oneshot_unit_handle_t,
}

impl EspIdLines {
    pub fn new() -> Result<Self> {
        let adc1 = new_unit(adc_unit_t_ADC_UNIT_1)?;
        let adc2 = new_unit(adc_unit_t_ADC_UNIT_2)?;

        for &(unit, channel) in &ID_CHANNELS {
            let handle = if unit == 1 { adc1 } else { adc2 };
            let chan_cfg = adc_oneshot_chan_cfg_t {
                atten: adc_atten_t_ADC_ATTEN_DB_12,
                bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
            };
            // SAFETY: handle was created above; configuration happens once,
            // before any sampling, from the single main task.
            let ret = unsafe { adc_oneshot_config_channel(handle, channel, &chan_cfg) };
            if ret != ESP_OK as i32 {
                return Err(Error::Init("ADC channel config failed"));
            }
        }

        info!("board-ID ADC configured (6 lines on ADC1, 2 on ADC2)");
        Ok(Self { adc1, adc2 })
    }
}

fn new_unit(unit_id: adc_unit_t) -> Result<adc_oneshot_unit_handle_t> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    let mut handle: adc_oneshot_unit_handle_t = core::ptr::null_mut();
    // SAFETY: called once per unit during init, single-threaded.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &mut handle) };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("ADC unit init failed"));
    }
    Ok(handle)
}

impl IdLines for EspIdLines {
    fn sample(&mut self, slot: Slot) -> Result<u16> {
        let (unit, channel) = ID_CHANNELS[slot.index() as usize];
        let handle = if unit == 1 { self.adc1 } else { self.adc2 };
        let mut raw: i32 = 0;
        // SAFETY: the unit handles are created and configured in new()
        // before any sampling; all access is from the single main task.
        let ret = unsafe { adc_oneshot_read(handle, channel, &mut raw) };
        if ret != ESP_OK as i32 {
            return Err(TransportError::AdcReadFailed.into());
        }
        Ok(raw.max(0) as u16)
    }
}
