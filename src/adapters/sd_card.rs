#![cfg(target_os = "espidf")]

//! SD card storage adapter — FAT volume over SPI via `embedded-sdmmc`.
//!
//! Implements the file-by-name [`StoragePort`] the firmware consumes:
//! status, read, write/append, delete.  Each operation opens and closes
//! the volume, directory and file around itself, so a failed operation
//! never leaves a handle dangling.

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use embedded_sdmmc::{Mode, SdCard, SdCardError, TimeSource, Timestamp, VolumeIdx, VolumeManager};

use crate::error::{Error, Result, StorageError};
use crate::ports::StoragePort;

/// The stand has no real-time clock; directory entries all get the same
/// fixed timestamp.
struct FixedTimeSource;

impl TimeSource for FixedTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 56,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

pub struct SdStorage<S, D>
where
    S: SpiDevice<u8>,
    D: DelayNs,
{
    volume_mgr: VolumeManager<SdCard<S, D>, FixedTimeSource>,
}

impl<S, D> SdStorage<S, D>
where
    S: SpiDevice<u8>,
    D: DelayNs,
{
    pub fn new(spi: S, delay: D) -> Self {
        let card = SdCard::new(spi, delay);
        Self {
            volume_mgr: VolumeManager::new(card, FixedTimeSource),
        }
    }
}

impl<S, D> StoragePort for SdStorage<S, D>
where
    S: SpiDevice<u8>,
    D: DelayNs,
{
    fn status(&mut self) -> Result<()> {
        let volume = self.volume_mgr.open_volume(VolumeIdx(0)).map_err(map_err)?;
        volume.close().map_err(map_err)
    }

    fn read(&mut self, name: &str, buf: &mut [u8]) -> Result<usize> {
        let volume = self.volume_mgr.open_volume(VolumeIdx(0)).map_err(map_err)?;
        let root = volume.open_root_dir().map_err(map_err)?;
        let file = root.open_file_in_dir(name, Mode::ReadOnly).map_err(map_err)?;

        let mut total = 0;
        while total < buf.len() {
            let n = file.read(&mut buf[total..]).map_err(map_err)?;
            if n == 0 {
                break;
            }
            total += n;
        }

        file.close().map_err(map_err)?;
        root.close().map_err(map_err)?;
        volume.close().map_err(map_err)?;
        Ok(total)
    }

    fn write(&mut self, name: &str, data: &[u8], append: bool) -> Result<()> {
        let mode = if append {
            Mode::ReadWriteCreateOrAppend
        } else {
            Mode::ReadWriteCreateOrTruncate
        };

        let volume = self.volume_mgr.open_volume(VolumeIdx(0)).map_err(map_err)?;
        let root = volume.open_root_dir().map_err(map_err)?;
        let file = root.open_file_in_dir(name, mode).map_err(map_err)?;

        file.write(data).map_err(map_err)?;

        file.close().map_err(map_err)?;
        root.close().map_err(map_err)?;
        volume.close().map_err(map_err)
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        let volume = self.volume_mgr.open_volume(VolumeIdx(0)).map_err(map_err)?;
        let root = volume.open_root_dir().map_err(map_err)?;

        let result = root.delete_file_in_dir(name).map_err(map_err);

        root.close().map_err(map_err)?;
        volume.close().map_err(map_err)?;
        result
    }
}

fn map_err(e: embedded_sdmmc::Error<SdCardError>) -> Error {
    match e {
        embedded_sdmmc::Error::DeviceError(_) => StorageError::NoCard.into(),
        embedded_sdmmc::Error::NotFound => StorageError::NotFound.into(),
        _ => StorageError::IoError.into(),
    }
}
