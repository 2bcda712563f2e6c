//! Slot identification — classify each slot's analog ID sample.
//!
//! Every peripheral board pulls its slot's ID line to a distinct divider
//! voltage.  One identification pass samples all 8 lines once and matches
//! each count against the reference table within a fixed noise tolerance.
//! A slot whose sample matches no reference — or more than one — stays
//! unassigned; callers wanting confidence re-run the pass and compare.

use log::debug;

use crate::error::Result;
use crate::ports::IdLines;
use crate::slots::{BoardIdentity, Slot, SlotMap};

/// ADC counts of jitter the classifier absorbs around each reference value.
pub const NOISE_TOLERANCE: u16 = 40;

/// Classify one raw sample against the reference table.
///
/// Assigns an identity only when exactly one reference is within tolerance.
pub fn classify(sample: u16) -> Option<BoardIdentity> {
    let mut matched = None;
    for identity in BoardIdentity::ALL {
        if sample.abs_diff(identity.reference()) < NOISE_TOLERANCE {
            if matched.is_some() {
                // Two references claim this sample; refuse to guess.
                return None;
            }
            matched = Some(identity);
        }
    }
    matched
}

/// Run one full identification pass over all 8 slots.
///
/// Sampling order is slot order; each pass covers every slot, and the
/// returned map replaces any previous one wholesale.
pub fn identify<L: IdLines>(lines: &mut L) -> Result<SlotMap> {
    let mut assignments = [None; Slot::COUNT];
    for slot in Slot::ALL {
        let sample = lines.sample(slot)?;
        let identity = classify(sample);
        match identity {
            Some(id) => debug!("{slot}: sample {sample} -> {id}"),
            None => debug!("{slot}: sample {sample} -> no match"),
        }
        assignments[slot.index() as usize] = identity;
    }
    Ok(SlotMap::from_assignments(assignments))
}
