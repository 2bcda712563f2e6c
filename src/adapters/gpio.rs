#![cfg(target_os = "espidf")]

//! Discrete GPIO adapters: the broadcast output line and the core
//! expander's interrupt input.

use esp_idf_svc::sys::*;

use crate::error::{Error, Result};
use crate::ports::{BroadcastPort, IrqLine};

pub struct EspBroadcastPin {
    pin: i32,
}

impl EspBroadcastPin {
    /// Configure `pin` as an output and drive it low.
    pub fn new(pin: i32) -> Result<Self> {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: one-time pin configuration from the single main task.
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("broadcast pin config failed"));
        }
        // SAFETY: pin was just configured as an output.
        unsafe { gpio_set_level(pin, 0) };
        Ok(Self { pin })
    }
}

impl BroadcastPort for EspBroadcastPin {
    fn set(&mut self, level: bool) -> Result<()> {
        // SAFETY: writes to an already-configured output pin.
        unsafe { gpio_set_level(self.pin, u32::from(level)) };
        Ok(())
    }
}

/// The expander interrupt line, active low with a pull-up.
pub struct EspIrqLine {
    pin: i32,
}

impl EspIrqLine {
    pub fn new(pin: i32) -> Result<Self> {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: one-time pin configuration from the single main task.
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(Error::Init("expander interrupt pin config failed"));
        }
        Ok(Self { pin })
    }
}

impl IrqLine for EspIrqLine {
    fn is_asserted(&mut self) -> Result<bool> {
        // SAFETY: read-only register access on a configured input pin.
        Ok(unsafe { gpio_get_level(self.pin) } == 0)
    }
}
