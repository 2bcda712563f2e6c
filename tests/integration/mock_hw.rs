//! Mock hardware for integration tests.
//!
//! The centrepiece is [`SpyBus`], an I2C double that models the mux:
//! writes to the mux address move the control mask, and device memory is
//! keyed by (open channel, address), so a transaction only reaches a
//! board's expander while that board's channel is actually open.  Every
//! access is counted and every mux mask recorded, which is what the gate
//! tests assert on.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiBus;

use groundtest::error::{Result, TransportError};
use groundtest::pins;
use groundtest::ports::{BroadcastPort, I2cPort, IdLines, IrqLine, StoragePort};
use groundtest::slots::Slot;

// ── SpyBus ────────────────────────────────────────────────────

pub struct SpyBus {
    /// Current mux control word.
    pub mux_mask: u8,
    /// Every mask ever written, in order.
    pub mask_history: Vec<u8>,
    /// Total transactions, mux control writes included.
    pub accesses: usize,
    /// NACK every write to these addresses.
    pub fail_write_addrs: Vec<u8>,
    /// NACK the mux close (all-channels-closed) write.
    pub fail_mux_close: bool,
    /// Device memory on the trunk segment, keyed by address.
    trunk: HashMap<u8, Vec<u8>>,
    /// Device memory behind the mux, keyed by (channel, address).
    channel: HashMap<(u8, u8), Vec<u8>>,
    /// Scripted read responses, consumed before the memory echo.
    read_scripts: HashMap<(Option<u8>, u8), VecDeque<Vec<u8>>>,
}

impl SpyBus {
    pub fn new() -> Self {
        Self {
            mux_mask: 0,
            mask_history: Vec::new(),
            accesses: 0,
            fail_write_addrs: Vec::new(),
            fail_mux_close: false,
            trunk: HashMap::new(),
            channel: HashMap::new(),
            read_scripts: HashMap::new(),
        }
    }

    /// Queue a scripted response for the next read of `address`
    /// (`channel` = `None` for a trunk device).
    pub fn prime_read(&mut self, channel: Option<u8>, address: u8, bytes: Vec<u8>) {
        self.read_scripts
            .entry((channel, address))
            .or_default()
            .push_back(bytes);
    }

    /// Bytes last written to a device.
    pub fn device_memory(&self, channel: Option<u8>, address: u8) -> Option<&Vec<u8>> {
        match channel {
            Some(ch) => self.channel.get(&(ch, address)),
            None => self.trunk.get(&address),
        }
    }

    /// True when every recorded mask had at most one channel open.
    pub fn single_open_discipline_held(&self) -> bool {
        self.mask_history.iter().all(|m| m.count_ones() <= 1)
    }

    fn open_channel(&self) -> Option<u8> {
        if self.mux_mask.count_ones() == 1 {
            Some(self.mux_mask.trailing_zeros() as u8)
        } else {
            None
        }
    }
}

impl Default for SpyBus {
    fn default() -> Self {
        Self::new()
    }
}

impl I2cPort for SpyBus {
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<()> {
        self.accesses += 1;
        if self.fail_write_addrs.contains(&address) {
            return Err(TransportError::Nack.into());
        }

        if address == pins::I2C_MUX_ADDRESS {
            let mask = bytes[0];
            if self.fail_mux_close && mask == 0 {
                return Err(TransportError::Nack.into());
            }
            self.mux_mask = mask;
            self.mask_history.push(mask);
            return Ok(());
        }

        match self.open_channel() {
            Some(ch) => self.channel.insert((ch, address), bytes.to_vec()),
            None => self.trunk.insert(address, bytes.to_vec()),
        };
        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<()> {
        self.accesses += 1;
        let key = (self.open_channel(), address);

        if let Some(script) = self.read_scripts.get_mut(&key) {
            if let Some(bytes) = script.pop_front() {
                if bytes.len() < buf.len() {
                    return Err(TransportError::ShortRead.into());
                }
                buf.copy_from_slice(&bytes[..buf.len()]);
                return Ok(());
            }
        }

        let memory = match key.0 {
            Some(ch) => self.channel.get(&(ch, address)),
            None => self.trunk.get(&address),
        };
        match memory {
            Some(bytes) if bytes.len() >= buf.len() => {
                buf.copy_from_slice(&bytes[..buf.len()]);
                Ok(())
            }
            Some(_) => Err(TransportError::ShortRead.into()),
            None => Err(TransportError::Nack.into()),
        }
    }
}

// ── MockIdLines ───────────────────────────────────────────────

pub struct MockIdLines {
    pub samples: [u16; 8],
    /// Slots sampled, in order.
    pub sampled: Vec<u8>,
    pub fail: bool,
}

impl MockIdLines {
    pub fn new(samples: [u16; 8]) -> Self {
        Self {
            samples,
            sampled: Vec::new(),
            fail: false,
        }
    }
}

impl IdLines for MockIdLines {
    fn sample(&mut self, slot: Slot) -> Result<u16> {
        if self.fail {
            return Err(TransportError::AdcReadFailed.into());
        }
        self.sampled.push(slot.index());
        Ok(self.samples[slot.index() as usize])
    }
}

// ── Discrete line mocks ───────────────────────────────────────

/// Broadcast double.  The history handle is shared so tests can keep
/// observing after the mock moves into the core board.
pub struct MockBroadcast {
    history: Rc<RefCell<Vec<bool>>>,
}

impl MockBroadcast {
    pub fn new() -> (Self, Rc<RefCell<Vec<bool>>>) {
        let history = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                history: Rc::clone(&history),
            },
            history,
        )
    }
}

impl BroadcastPort for MockBroadcast {
    fn set(&mut self, level: bool) -> Result<()> {
        self.history.borrow_mut().push(level);
        Ok(())
    }
}

/// Interrupt line double with a shared level cell, so tests can "press a
/// button" after the mock moves into the core board.
pub struct MockIrq {
    asserted: Rc<Cell<bool>>,
}

impl MockIrq {
    pub fn new() -> (Self, Rc<Cell<bool>>) {
        let asserted = Rc::new(Cell::new(false));
        (
            Self {
                asserted: Rc::clone(&asserted),
            },
            asserted,
        )
    }
}

impl IrqLine for MockIrq {
    fn is_asserted(&mut self) -> Result<bool> {
        Ok(self.asserted.get())
    }
}

// ── NoopDelay ─────────────────────────────────────────────────

/// Bounded waits complete instantly under test.
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

// ── MockSpi ───────────────────────────────────────────────────

/// SPI double: records writes, answers reads from a script (zeros once
/// the script runs dry).
pub struct MockSpi {
    pub written: Vec<Vec<u8>>,
    pub read_script: VecDeque<Vec<u8>>,
}

impl MockSpi {
    pub fn new() -> Self {
        Self {
            written: Vec::new(),
            read_script: VecDeque::new(),
        }
    }
}

impl Default for MockSpi {
    fn default() -> Self {
        Self::new()
    }
}

impl embedded_hal::spi::ErrorType for MockSpi {
    type Error = core::convert::Infallible;
}

impl SpiBus for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> std::result::Result<(), Self::Error> {
        match self.read_script.pop_front() {
            Some(bytes) => {
                for (slot, value) in words.iter_mut().zip(bytes.iter().chain(core::iter::repeat(&0)))
                {
                    *slot = *value;
                }
            }
            None => words.fill(0),
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> std::result::Result<(), Self::Error> {
        self.written.push(words.to_vec());
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> std::result::Result<(), Self::Error> {
        self.written.push(write.to_vec());
        SpiBus::read(self, read)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> std::result::Result<(), Self::Error> {
        self.written.push(words.to_vec());
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}

// ── MockStorage ───────────────────────────────────────────────

pub struct MockStorage {
    pub files: HashMap<String, Vec<u8>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MockStorage {
    fn status(&mut self) -> Result<()> {
        Ok(())
    }

    fn read(&mut self, name: &str, buf: &mut [u8]) -> Result<usize> {
        match self.files.get(name) {
            Some(data) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                Ok(n)
            }
            None => Err(groundtest::error::StorageError::NotFound.into()),
        }
    }

    fn write(&mut self, name: &str, data: &[u8], append: bool) -> Result<()> {
        let entry = self.files.entry(name.to_string()).or_default();
        if !append {
            entry.clear();
        }
        entry.extend_from_slice(data);
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.files.remove(name);
        Ok(())
    }
}
