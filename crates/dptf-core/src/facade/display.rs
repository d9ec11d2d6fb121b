//! Display brightness control facade.
//!
//! Brightness is controlled by selecting an index into the domain's
//! enumerated level set. Index 0 is the brightest (least restrictive)
//! level.

use dptf_common::{
    ControlInterface, DisplayControlStatus, DomainIndex, DomainProperties, Error,
    ParticipantIndex, Result,
};
use tracing::{debug, info};

use crate::cache::CachedProperty;
use crate::control::DisplayControlSet;
use crate::services::PolicyServices;

pub struct DisplayControlFacade {
    participant: ParticipantIndex,
    domain: DomainIndex,
    properties: DomainProperties,
    services: PolicyServices,
    capabilities: CachedProperty<DisplayControlSet>,
    initialized: bool,
    last_issued: Option<usize>,
}

impl DisplayControlFacade {
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
            initialized: false,
            last_issued: None,
        }
    }

    pub fn supports_display_controls(&self) -> bool {
        self.properties.implements(ControlInterface::Display)
    }

    /// Brightness limit currently applied, read live.
    pub fn get_status(&self) -> Result<DisplayControlStatus> {
        self.require_support()?;
        self.services
            .display_control
            .display_control_status(self.participant, self.domain)
    }

    pub fn get_capabilities(&mut self) -> Result<&DisplayControlSet> {
        self.require_support()?;
        let (participant, domain) = (self.participant, self.domain);
        let display_control = &self.services.display_control;
        self.capabilities
            .get(|| display_control.display_control_set(participant, domain))
    }

    pub fn refresh_capabilities(&mut self) -> Result<&DisplayControlSet> {
        self.require_support()?;
        let (participant, domain) = (self.participant, self.domain);
        let display_control = &self.services.display_control;
        self.capabilities
            .refresh(|| display_control.display_control_set(participant, domain))
    }

    /// Select the brightness level at `index`.
    pub fn set_control(&mut self, index: usize) -> Result<()> {
        self.require_support()?;
        self.get_capabilities()?.get(index)?;
        self.submit(index)?;
        info!(
            participant = %self.participant,
            domain = %self.domain,
            index,
            "display control submitted"
        );
        Ok(())
    }

    pub fn get_last_issued(&self) -> Option<usize> {
        self.last_issued
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Arm at the brightest level once; afterwards only pull the last
    /// issued index back inside a level set that shrank.
    pub fn ensure_initialized(&mut self) -> Result<()> {
        if !self.supports_display_controls() {
            return Ok(());
        }

        debug!(
            participant = %self.participant,
            domain = %self.domain,
            "display control initialization started"
        );
        let levels = self.get_capabilities()?.len();

        if !self.initialized {
            if levels == 0 {
                return Err(Error::IndexOutOfRange { index: 0, len: 0 });
            }
            self.submit(0)?;
            self.initialized = true;
        } else if let Some(last_issued) = self.last_issued.filter(|&last| last >= levels) {
            debug!(
                participant = %self.participant,
                domain = %self.domain,
                last = last_issued,
                levels,
                "adjusting brightness index to dimmest level available"
            );
            let dimmest = levels.checked_sub(1).ok_or(Error::IndexOutOfRange {
                index: last_issued,
                len: levels,
            })?;
            self.set_control(dimmest)?;
        }

        debug!(
            participant = %self.participant,
            domain = %self.domain,
            "display control initialization finished"
        );
        Ok(())
    }

    fn require_support(&self) -> Result<()> {
        if self.supports_display_controls() {
            Ok(())
        } else {
            Err(Error::UnsupportedDomain {
                participant: self.participant,
                domain: self.domain,
                interface: ControlInterface::Display,
            })
        }
    }

    fn submit(&mut self, index: usize) -> Result<()> {
        self.services
            .display_control
            .set_display_control(self.participant, self.domain, index)?;
        self.last_issued = Some(index);
        self.capabilities.invalidate();
        Ok(())
    }
}

impl std::fmt::Debug for DisplayControlFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayControlFacade")
            .field("participant", &self.participant)
            .field("domain", &self.domain)
            .field("properties", &self.properties)
            .field("initialized", &self.initialized)
            .field("last_issued", &self.last_issued)
            .finish_non_exhaustive()
    }
}
