//! Bounded control sets and the status sets derived from them.
//!
//! A [`ControlSet`] is the ordered list of capability entries a domain
//! reports, one per tunable slot. A [`ControlStatusSet`] holds one requested
//! value per slot. Status sets submitted to hardware are only ever derived
//! from a control set, so their length and slot order always match it.

use std::fmt;

use dptf_common::{Error, Result};
use serde::Serialize;

/// A hardware-reported capability entry for one slot.
pub trait ControlCapability: Clone + PartialEq + fmt::Debug {
    /// Tag identifying the slot (a power tier, a brightness level).
    type Slot: Copy + PartialEq + fmt::Display;

    /// Requested value for the slot.
    type Status: Clone + PartialEq + fmt::Debug;

    fn slot(&self) -> Self::Slot;

    /// Status that leaves this slot unthrottled: every field at its
    /// maximum bound.
    fn least_restrictive(&self) -> Self::Status;

    fn status_slot(status: &Self::Status) -> Self::Slot;
}

/// Immutable ordered set of capability entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ControlSet<C> {
    entries: Vec<C>,
}

impl<C: ControlCapability> ControlSet<C> {
    pub fn new(entries: Vec<C>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[C] {
        &self.entries
    }

    /// Entry at `index`. Out-of-range access is an error, never clamped.
    pub fn get(&self, index: usize) -> Result<&C> {
        self.entries.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// Position of the first entry for `slot`.
    pub fn index_of(&self, slot: C::Slot) -> Result<usize> {
        self.entries
            .iter()
            .position(|entry| entry.slot() == slot)
            .ok_or_else(|| Error::SlotNotFound {
                slot: slot.to_string(),
            })
    }

    /// Every slot at its least restrictive value.
    pub fn least_restrictive_statuses(&self) -> ControlStatusSet<C> {
        ControlStatusSet {
            entries: self.entries.iter().map(C::least_restrictive).collect(),
        }
    }

    /// `status` at `index`, every other slot at its least restrictive value.
    ///
    /// Siblings are re-leveled to their maximum rather than kept at any
    /// previously requested value.
    pub fn statuses_with(&self, index: usize, status: C::Status) -> Result<ControlStatusSet<C>> {
        self.get(index)?;
        let mut statuses = self.least_restrictive_statuses();
        statuses.entries[index] = status;
        Ok(statuses)
    }
}

impl<C> From<Vec<C>> for ControlSet<C> {
    fn from(entries: Vec<C>) -> Self {
        Self { entries }
    }
}

impl<'a, C> IntoIterator for &'a ControlSet<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One status entry per slot of a [`ControlSet`], in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlStatusSet<C: ControlCapability> {
    entries: Vec<C::Status>,
}

impl<C: ControlCapability> ControlStatusSet<C> {
    /// Accept a status set read back from hardware, checking it lines up
    /// with `caps` slot for slot.
    pub fn from_reported(caps: &ControlSet<C>, entries: Vec<C::Status>) -> Result<Self> {
        if entries.len() != caps.len() {
            return Err(Error::ControlSetMismatch {
                expected: caps.len(),
                actual: entries.len(),
            });
        }
        for (entry, cap) in entries.iter().zip(caps.iter()) {
            let slot = C::status_slot(entry);
            if slot != cap.slot() {
                return Err(Error::SlotNotFound {
                    slot: slot.to_string(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&C::Status> {
        self.entries.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, C::Status> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[C::Status] {
        &self.entries
    }
}
