//! Power limit capability sets.

use dptf_common::{PowerControlDynamicCaps, PowerControlStatus, PowerControlType, Result};

use super::set::{ControlCapability, ControlSet, ControlStatusSet};

/// Power limit capabilities, one entry per tier.
pub type PowerControlDynamicCapsSet = ControlSet<PowerControlDynamicCaps>;

/// Power limit statuses, one entry per tier of a [`PowerControlDynamicCapsSet`].
pub type PowerControlStatusSet = ControlStatusSet<PowerControlDynamicCaps>;

impl ControlCapability for PowerControlDynamicCaps {
    type Slot = PowerControlType;
    type Status = PowerControlStatus;

    fn slot(&self) -> PowerControlType {
        self.power_control_type
    }

    fn least_restrictive(&self) -> PowerControlStatus {
        self.max_status()
    }

    fn status_slot(status: &PowerControlStatus) -> PowerControlType {
        status.power_control_type
    }
}

impl ControlSet<PowerControlDynamicCaps> {
    /// Index of the PL1 tier.
    pub fn pl1_index(&self) -> Result<usize> {
        self.index_of(PowerControlType::Pl1)
    }

    /// Index of the given tier.
    pub fn pl_index(&self, power_control_type: PowerControlType) -> Result<usize> {
        self.index_of(power_control_type)
    }
}
