//! Slot and board-identity types for the peripheral connector positions.
//!
//! A [`Slot`] is one of the 8 physical connector positions on the core
//! board; each maps one-to-one onto a mux channel and an analog ID line.
//! A [`SlotMap`] is the result of one identification pass: which board
//! identity, if any, answered on each slot.

use core::fmt;

use crate::error::{IdentError, PreconditionError, Result};
use crate::pins;

// ───────────────────────────────────────────────────────────────
// Slot
// ───────────────────────────────────────────────────────────────

/// A physical connector position, range [0,7].
///
/// `Slot::new` is the only constructor; an out-of-range index is a
/// precondition failure, so every `Slot` value in the system is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Slot(u8);

impl Slot {
    /// Number of slots on the core board.
    pub const COUNT: usize = 8;

    /// All slots in scan order.
    pub const ALL: [Slot; Self::COUNT] = [
        Slot(0),
        Slot(1),
        Slot(2),
        Slot(3),
        Slot(4),
        Slot(5),
        Slot(6),
        Slot(7),
    ];

    pub fn new(index: u8) -> Result<Self> {
        if (index as usize) < Self::COUNT {
            Ok(Self(index))
        } else {
            Err(PreconditionError::SlotOutOfRange(index).into())
        }
    }

    pub const fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

// ───────────────────────────────────────────────────────────────
// BoardIdentity
// ───────────────────────────────────────────────────────────────

/// The type of peripheral board, determined by its analog ID signature.
///
/// An empty or unrecognised slot is represented as `None` in the
/// [`SlotMap`] — there is no reference value to hang an "unknown" variant
/// on, and no lookup can request it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardIdentity {
    Igniter,
    Solenoid,
    Servo,
    Thermocouple,
    Rtd,
    PtA,
    PtB,
}

impl BoardIdentity {
    /// Every identity the classifier can assign, in reference-value order.
    pub const ALL: [Self; 7] = [
        Self::Igniter,
        Self::Solenoid,
        Self::Servo,
        Self::Thermocouple,
        Self::Rtd,
        Self::PtA,
        Self::PtB,
    ];

    /// Nominal ADC count produced by this board type's ID divider.
    pub const fn reference(self) -> u16 {
        match self {
            Self::Igniter => pins::BOARD_ID_IGNITER,
            Self::Solenoid => pins::BOARD_ID_SOLENOID,
            Self::Servo => pins::BOARD_ID_SERVO,
            Self::Thermocouple => pins::BOARD_ID_THERMOCOUPLE,
            Self::Rtd => pins::BOARD_ID_RTD,
            Self::PtA => pins::BOARD_ID_PT_A,
            Self::PtB => pins::BOARD_ID_PT_B,
        }
    }
}

impl fmt::Display for BoardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Igniter => "igniter",
            Self::Solenoid => "solenoid",
            Self::Servo => "servo",
            Self::Thermocouple => "thermocouple",
            Self::Rtd => "RTD",
            Self::PtA => "PT-A",
            Self::PtB => "PT-B",
        };
        f.write_str(label)
    }
}

// ───────────────────────────────────────────────────────────────
// SlotMap
// ───────────────────────────────────────────────────────────────

/// Slot → board-identity mapping from one identification pass.
///
/// Rebuilt wholesale by each pass, never partially mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMap {
    assignments: [Option<BoardIdentity>; Slot::COUNT],
}

impl SlotMap {
    pub const fn from_assignments(assignments: [Option<BoardIdentity>; Slot::COUNT]) -> Self {
        Self { assignments }
    }

    /// Identity assigned to `slot`, or `None` if the slot is empty or its
    /// sample was unclassifiable.
    pub fn get(&self, slot: Slot) -> Option<BoardIdentity> {
        self.assignments[slot.index() as usize]
    }

    /// The unique slot carrying `identity`.
    ///
    /// Finding the identity in more than one slot is itself an error
    /// (`Ambiguous`), not a first-match win.
    pub fn find(&self, identity: BoardIdentity) -> Result<Slot> {
        let mut found = None;
        for slot in Slot::ALL {
            if self.get(slot) == Some(identity) {
                if found.is_some() {
                    return Err(IdentError::Ambiguous.into());
                }
                found = Some(slot);
            }
        }
        found.ok_or_else(|| IdentError::NotFound.into())
    }

    /// All populated slots in slot order.
    pub fn occupied(&self) -> impl Iterator<Item = (Slot, BoardIdentity)> + '_ {
        Slot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|id| (slot, id)))
    }
}
