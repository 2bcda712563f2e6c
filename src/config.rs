//! System configuration parameters
//!
//! All tunable parameters for the test-stand controller.  Values can be
//! overridden by a JSON file on the SD card; anything missing or invalid
//! falls back to the defaults here.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::drivers::hx711::Gain;
use crate::error::{Error, Result};
use crate::ports::StoragePort;

/// Name of the configuration file on the SD card.
pub const CONFIG_FILE: &str = "config.json";

/// Largest configuration file the loader will read.
const CONFIG_FILE_MAX: usize = 512;

/// Core stand configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandConfig {
    // --- Sampling ---
    /// HX711 gain setting for PT / load-cell reads (32, 64 or 128).
    pub hx711_gain: u8,
    /// Raise the broadcast line while a sampling sweep is running.
    pub broadcast_during_sampling: bool,

    // --- Timing ---
    /// Button poll interval (milliseconds).
    pub button_poll_interval_ms: u32,
}

impl Default for StandConfig {
    fn default() -> Self {
        Self {
            hx711_gain: 128,
            broadcast_during_sampling: true,
            button_poll_interval_ms: 50,
        }
    }
}

impl StandConfig {
    /// Validate field ranges.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        Gain::from_setting(self.hx711_gain)
            .map_err(|_| Error::Config("hx711_gain must be 32, 64 or 128"))?;
        if self.button_poll_interval_ms == 0 || self.button_poll_interval_ms > 1000 {
            return Err(Error::Config("button_poll_interval_ms must be in 1..=1000"));
        }
        Ok(())
    }

    /// Amplifier gain as a typed setting.  Only valid after
    /// [`validate`](Self::validate).
    pub fn gain(&self) -> Result<Gain> {
        Gain::from_setting(self.hx711_gain)
    }

    /// Load from `CONFIG_FILE`, falling back to defaults when the file is
    /// missing or unreadable.  A present-but-invalid config is an error —
    /// silently running a test with the wrong gain is worse than stopping.
    pub fn load<S: StoragePort>(storage: &mut S) -> Result<Self> {
        let mut buf = [0u8; CONFIG_FILE_MAX];
        let n = match storage.read(CONFIG_FILE, &mut buf) {
            Ok(n) => n,
            Err(e) => {
                warn!("no stored config ({e}); using defaults");
                return Ok(Self::default());
            }
        };
        let config: Self = serde_json::from_slice(&buf[..n])
            .map_err(|_| Error::Config("stored config failed to parse"))?;
        config.validate()?;
        Ok(config)
    }

    /// Persist to `CONFIG_FILE` after validating.
    pub fn save<S: StoragePort>(&self, storage: &mut S) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_vec(self).map_err(|_| Error::Config("serialise failed"))?;
        storage.write(CONFIG_FILE, &json, false)
    }
}
