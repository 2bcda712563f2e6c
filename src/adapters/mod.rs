//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter   | Implements              | Connects to                   |
//! |-----------|-------------------------|-------------------------------|
//! | `i2c`     | I2cPort                 | ESP-IDF I2C driver            |
//! | `id_adc`  | IdLines                 | ESP32 ADC1/ADC2 oneshot units |
//! | `gpio`    | BroadcastPort, IrqLine  | ESP32 GPIO                    |
//! | `sd_card` | StoragePort             | SD card over SPI (FAT)        |
//!
//! Everything in here is ESP-IDF-only; host-side tests implement the same
//! ports with the doubles in `tests/integration/mock_hw.rs`.

pub mod gpio;
pub mod i2c;
pub mod id_adc;
pub mod sd_card;
