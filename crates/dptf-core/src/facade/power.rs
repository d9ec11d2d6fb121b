//! Power limit control facade.
//!
//! Presents a domain's power limit capabilities and programmed limits, and
//! commits new limits to hardware:
//! - Capabilities and controls are cached until a write or an explicit
//!   refresh invalidates them
//! - A single-tier request is always submitted as a complete set, with every
//!   other tier re-leveled to its maximum
//! - [`PowerControlFacade::ensure_initialized`] arms all tiers unthrottled
//!   once, then only clamps PL1 back inside bounds that moved

use dptf_common::{
    ControlInterface, DomainIndex, DomainProperties, Error, ParticipantIndex,
    PowerControlStatus, PowerControlType, PowerStatus, Result,
};
use tracing::{debug, info};

use crate::cache::CachedProperty;
use crate::control::{ControlStatusSet, PowerControlDynamicCapsSet, PowerControlStatusSet};
use crate::services::PolicyServices;

pub struct PowerControlFacade {
    participant: ParticipantIndex,
    domain: DomainIndex,
    properties: DomainProperties,
    services: PolicyServices,
    capabilities: CachedProperty<PowerControlDynamicCapsSet>,
    controls: CachedProperty<PowerControlStatusSet>,
    /// Set once the bulk arming write has succeeded.
    initialized: bool,
    last_issued: Option<PowerControlStatus>,
}

impl PowerControlFacade {
    pub fn new(
        participant: ParticipantIndex,
        domain: DomainIndex,
        properties: DomainProperties,
        services: PolicyServices,
    ) -> Self {
        Self {
            participant,
            domain,
            properties,
            services,
            capabilities: CachedProperty::new(),
            controls: CachedProperty::new(),
            initialized: false,
            last_issued: None,
        }
    }

    pub fn participant(&self) -> ParticipantIndex {
        self.participant
    }

    pub fn domain(&self) -> DomainIndex {
        self.domain
    }

    pub fn supports_power_controls(&self) -> bool {
        self.properties.implements(ControlInterface::Power)
    }

    /// Live power reading; never cached.
    pub fn get_current_power(&self) -> Result<PowerStatus> {
        self.require_support()?;
        self.services
            .power_status
            .power_status(self.participant, self.domain)
    }

    /// Capability set, fetched on first use or after invalidation.
    pub fn get_capabilities(&mut self) -> Result<&PowerControlDynamicCapsSet> {
        self.require_support()?;
        let (participant, domain) = (self.participant, self.domain);
        let power_control = &self.services.power_control;
        self.capabilities
            .get(|| power_control.power_control_capabilities(participant, domain))
    }

    pub fn refresh_capabilities(&mut self) -> Result<&PowerControlDynamicCapsSet> {
        self.require_support()?;
        let (participant, domain) = (self.participant, self.domain);
        let power_control = &self.services.power_control;
        self.capabilities
            .refresh(|| power_control.power_control_capabilities(participant, domain))
    }

    /// Power limits currently programmed, checked against the capability set.
    pub fn get_controls(&mut self) -> Result<&PowerControlStatusSet> {
        let caps = self.get_capabilities()?.clone();
        let (participant, domain) = (self.participant, self.domain);
        let power_control = &self.services.power_control;
        self.controls.get(|| {
            let reported = power_control.power_control_status_set(participant, domain)?;
            ControlStatusSet::from_reported(&caps, reported)
        })
    }

    pub fn refresh_controls(&mut self) -> Result<&PowerControlStatusSet> {
        self.controls.invalidate();
        self.get_controls()
    }

    /// Submit `status` for the tier at `index`.
    ///
    /// The whole set is resubmitted: every other tier goes to its maximum
    /// limit, time window and duty cycle. Nothing is recorded unless the
    /// write succeeds. This does not arm the domain: the next
    /// [`ensure_initialized`](Self::ensure_initialized) still performs the
    /// bulk arming write if it has not happened yet.
    pub fn set_control(&mut self, status: PowerControlStatus, index: usize) -> Result<()> {
        self.require_support()?;
        let caps = self.get_capabilities()?.clone();
        let statuses = caps.statuses_with(index, status)?;

        self.submit(&statuses)?;
        self.last_issued = Some(status);
        info!(
            participant = %self.participant,
            domain = %self.domain,
            index,
            status = %status,
            "power control submitted"
        );
        Ok(())
    }

    pub fn get_pl1_index(&mut self) -> Result<usize> {
        self.get_capabilities()?.pl1_index()
    }

    pub fn get_pl_index(&mut self, power_control_type: PowerControlType) -> Result<usize> {
        self.get_capabilities()?.pl_index(power_control_type)
    }

    /// Last successfully submitted status, or `None` if nothing was issued.
    pub fn get_last_issued(&self) -> Option<PowerControlStatus> {
        self.last_issued
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Arm the domain, or re-check PL1 against bounds that may have moved.
    ///
    /// A no-op on domains without power controls. The first call submits
    /// every tier at its maximum. Later calls write only when the last
    /// issued limit falls outside the current PL1 bounds, clamping it to
    /// the nearest bound.
    pub fn ensure_initialized(&mut self) -> Result<()> {
        if !self.supports_power_controls() {
            return Ok(());
        }

        debug!(
            participant = %self.participant,
            domain = %self.domain,
            "power control initialization started"
        );
        let caps = self.get_capabilities()?.clone();

        if !self.initialized {
            let statuses = caps.least_restrictive_statuses();
            let first = *statuses.get(0)?;
            self.submit(&statuses)?;
            self.last_issued = Some(first);
            self.initialized = true;
            info!(
                participant = %self.participant,
                domain = %self.domain,
                tiers = statuses.len(),
                "power controls armed at maximum"
            );
        } else if let Some(last_issued) = self.last_issued {
            let pl1_index = caps.pl1_index()?;
            let pl1 = caps.get(pl1_index)?;
            let last_limit = last_issued.current_power_limit;

            if last_limit > pl1.max_power_limit {
                debug!(
                    participant = %self.participant,
                    domain = %self.domain,
                    last = %last_limit,
                    max = %pl1.max_power_limit,
                    "adjusting power limit to maximum allowed"
                );
                self.set_control(pl1.max_status(), pl1_index)?;
            } else if last_limit < pl1.min_power_limit {
                debug!(
                    participant = %self.participant,
                    domain = %self.domain,
                    last = %last_limit,
                    min = %pl1.min_power_limit,
                    "adjusting power limit to minimum allowed"
                );
                self.set_control(pl1.min_limit_status(), pl1_index)?;
            }
        }

        debug!(
            participant = %self.participant,
            domain = %self.domain,
            "power control initialization finished"
        );
        Ok(())
    }

    fn require_support(&self) -> Result<()> {
        if self.supports_power_controls() {
            Ok(())
        } else {
            Err(Error::UnsupportedDomain {
                participant: self.participant,
                domain: self.domain,
                interface: ControlInterface::Power,
            })
        }
    }

    /// Write a complete set and invalidate everything the write may have
    /// changed.
    fn submit(&mut self, statuses: &PowerControlStatusSet) -> Result<()> {
        self.services
            .power_control
            .set_power_control(self.participant, self.domain, statuses)?;
        self.capabilities.invalidate();
        self.controls.invalidate();
        Ok(())
    }
}

impl std::fmt::Debug for PowerControlFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerControlFacade")
            .field("participant", &self.participant)
            .field("domain", &self.domain)
            .field("properties", &self.properties)
            .field("initialized", &self.initialized)
            .field("last_issued", &self.last_issued)
            .finish_non_exhaustive()
    }
}
