//! Hardware access service seams.
//!
//! The facades never touch firmware directly. Every read and write goes
//! through these traits; the platform layer (or [`crate::sim`] in tests)
//! provides the implementations. All calls are blocking and complete
//! before returning.

use std::sync::Arc;

use dptf_common::{
    DisplayControlStatus, DomainIndex, ParticipantIndex, PowerControlStatus, PowerStatus, Result,
};

use crate::control::{DisplayControlSet, PowerControlDynamicCapsSet, PowerControlStatusSet};

/// Power limit capability reads and control writes.
pub trait DomainPowerControl: Send + Sync {
    fn power_control_capabilities(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> Result<PowerControlDynamicCapsSet>;

    /// Power limits currently programmed, in the order the platform
    /// reports them.
    fn power_control_status_set(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> Result<Vec<PowerControlStatus>>;

    /// Apply a complete status set atomically.
    fn set_power_control(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
        statuses: &PowerControlStatusSet,
    ) -> Result<()>;
}

/// Live (uncached) power readings.
pub trait DomainPowerStatus: Send + Sync {
    fn power_status(&self, participant: ParticipantIndex, domain: DomainIndex)
        -> Result<PowerStatus>;
}

/// Display brightness capability reads and control writes.
pub trait DomainDisplayControl: Send + Sync {
    fn display_control_set(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> Result<DisplayControlSet>;

    fn display_control_status(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> Result<DisplayControlStatus>;

    fn set_display_control(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
        index: usize,
    ) -> Result<()>;
}

/// Service handles shared by every facade of a policy.
#[derive(Clone)]
pub struct PolicyServices {
    pub power_control: Arc<dyn DomainPowerControl>,
    pub power_status: Arc<dyn DomainPowerStatus>,
    pub display_control: Arc<dyn DomainDisplayControl>,
}

impl PolicyServices {
    /// Services all backed by one platform implementation.
    pub fn from_platform<P>(platform: Arc<P>) -> Self
    where
        P: DomainPowerControl + DomainPowerStatus + DomainDisplayControl + 'static,
    {
        Self {
            power_control: platform.clone(),
            power_status: platform.clone(),
            display_control: platform,
        }
    }
}

impl std::fmt::Debug for PolicyServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyServices").finish_non_exhaustive()
    }
}
