//! Participant and domain identity types.
//!
//! A controllable interface is addressed by the (participant, domain) pair.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a participant (a hardware component under policy control).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantIndex(pub u32);

impl fmt::Display for ParticipantIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ParticipantIndex {
    fn from(index: u32) -> Self {
        ParticipantIndex(index)
    }
}

/// Index of a domain within a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainIndex(pub u32);

impl fmt::Display for DomainIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DomainIndex {
    fn from(index: u32) -> Self {
        DomainIndex(index)
    }
}
