//! In-memory simulated platform.
//!
//! Implements every hardware service trait over a table of domains built
//! from a [`PlatformConfig`]. Writes update the reported state the way real
//! firmware would, and every capability fetch and write is recorded so
//! callers can assert on hardware traffic. Used by the CLI and by tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use dptf_common::{
    DisplayControl, DisplayControlStatus, DomainIndex, Error, ParticipantIndex, Power,
    PowerControlDynamicCaps, PowerControlStatus, PowerStatus, Result,
};
use dptf_config::PlatformConfig;
use tracing::trace;

use crate::control::{DisplayControlSet, PowerControlDynamicCapsSet, PowerControlStatusSet};
use crate::services::{DomainDisplayControl, DomainPowerControl, DomainPowerStatus};

type DomainKey = (ParticipantIndex, DomainIndex);

#[derive(Debug, Default)]
struct SimDomain {
    power_caps: Vec<PowerControlDynamicCaps>,
    power_status: Vec<PowerControlStatus>,
    current_power: Power,
    display_levels: Vec<DisplayControl>,
    display_index: usize,
    power_capability_fetches: usize,
    display_capability_fetches: usize,
    power_writes: Vec<Vec<PowerControlStatus>>,
    display_writes: Vec<usize>,
    fail_writes: Option<String>,
}

/// Simulated platform backing the service traits.
#[derive(Debug, Default)]
pub struct SimulatedPlatform {
    domains: Mutex<BTreeMap<DomainKey, SimDomain>>,
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a platform reporting the state described in `config`.
    pub fn from_config(config: &PlatformConfig) -> Self {
        let mut domains = BTreeMap::new();
        for (participant, domain) in config.domains() {
            domains.insert(
                (participant, domain.index),
                SimDomain {
                    power_caps: domain.power_capabilities.clone(),
                    power_status: domain.initial_power_status(),
                    current_power: domain.current_power,
                    display_levels: domain.display_levels.clone(),
                    ..Default::default()
                },
            );
        }
        Self {
            domains: Mutex::new(domains),
        }
    }

    pub fn with_power_domain(
        self,
        participant: ParticipantIndex,
        domain: DomainIndex,
        caps: Vec<PowerControlDynamicCaps>,
    ) -> Self {
        self.update((participant, domain), |d| {
            d.power_status = caps.iter().map(PowerControlDynamicCaps::max_status).collect();
            d.power_caps = caps;
        });
        self
    }

    pub fn with_display_domain(
        self,
        participant: ParticipantIndex,
        domain: DomainIndex,
        levels: Vec<DisplayControl>,
    ) -> Self {
        self.update((participant, domain), |d| d.display_levels = levels);
        self
    }

    /// Replace the power capabilities the platform reports from now on.
    pub fn set_power_capabilities(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
        caps: Vec<PowerControlDynamicCaps>,
    ) {
        self.update((participant, domain), |d| d.power_caps = caps);
    }

    pub fn set_display_levels(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
        levels: Vec<DisplayControl>,
    ) {
        self.update((participant, domain), |d| d.display_levels = levels);
    }

    pub fn set_current_power(&self, participant: ParticipantIndex, domain: DomainIndex, power: Power) {
        self.update((participant, domain), |d| d.current_power = power);
    }

    /// Make every write to the domain fail with `reason` (or succeed again
    /// with `None`).
    pub fn fail_writes(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
        reason: Option<&str>,
    ) {
        self.update((participant, domain), |d| {
            d.fail_writes = reason.map(str::to_string)
        });
    }

    pub fn power_capability_fetches(&self, participant: ParticipantIndex, domain: DomainIndex) -> usize {
        self.inspect((participant, domain), |d| d.power_capability_fetches)
    }

    pub fn display_capability_fetches(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> usize {
        self.inspect((participant, domain), |d| d.display_capability_fetches)
    }

    /// Every power status set submitted to the domain, oldest first.
    pub fn power_writes(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> Vec<Vec<PowerControlStatus>> {
        self.inspect((participant, domain), |d| d.power_writes.clone())
    }

    pub fn power_write_count(&self, participant: ParticipantIndex, domain: DomainIndex) -> usize {
        self.inspect((participant, domain), |d| d.power_writes.len())
    }

    pub fn display_writes(&self, participant: ParticipantIndex, domain: DomainIndex) -> Vec<usize> {
        self.inspect((participant, domain), |d| d.display_writes.clone())
    }

    fn update(&self, key: DomainKey, f: impl FnOnce(&mut SimDomain)) {
        if let Ok(mut domains) = self.domains.lock() {
            f(domains.entry(key).or_default());
        }
    }

    fn inspect<R: Default>(&self, key: DomainKey, f: impl FnOnce(&SimDomain) -> R) -> R {
        match self.domains.lock() {
            Ok(domains) => domains.get(&key).map(f).unwrap_or_default(),
            Err(_) => R::default(),
        }
    }

    fn with_domain<R>(
        &self,
        key: DomainKey,
        on_missing: fn(String) -> Error,
        f: impl FnOnce(&mut SimDomain) -> Result<R>,
    ) -> Result<R> {
        let Ok(mut domains) = self.domains.lock() else {
            return Err(on_missing("simulated platform lock poisoned".to_string()));
        };
        match domains.get_mut(&key) {
            Some(domain) => f(domain),
            None => Err(on_missing(format!(
                "participant {} domain {} not present",
                key.0, key.1
            ))),
        }
    }
}

impl DomainPowerControl for SimulatedPlatform {
    fn power_control_capabilities(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> Result<PowerControlDynamicCapsSet> {
        self.with_domain((participant, domain), Error::HardwareRead, |d| {
            d.power_capability_fetches += 1;
            trace!(%participant, %domain, fetches = d.power_capability_fetches, "simulated capability read");
            Ok(PowerControlDynamicCapsSet::new(d.power_caps.clone()))
        })
    }

    fn power_control_status_set(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> Result<Vec<PowerControlStatus>> {
        self.with_domain((participant, domain), Error::HardwareRead, |d| {
            Ok(d.power_status.clone())
        })
    }

    fn set_power_control(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
        statuses: &PowerControlStatusSet,
    ) -> Result<()> {
        self.with_domain((participant, domain), Error::HardwareWrite, |d| {
            if let Some(reason) = &d.fail_writes {
                return Err(Error::HardwareWrite(reason.clone()));
            }
            let entries = statuses.as_slice().to_vec();
            trace!(%participant, %domain, entries = entries.len(), "simulated power write");
            d.power_status = entries.clone();
            d.power_writes.push(entries);
            Ok(())
        })
    }
}

impl DomainPowerStatus for SimulatedPlatform {
    fn power_status(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> Result<PowerStatus> {
        self.with_domain((participant, domain), Error::HardwareRead, |d| {
            Ok(PowerStatus {
                current_power: d.current_power,
            })
        })
    }
}

impl DomainDisplayControl for SimulatedPlatform {
    fn display_control_set(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> Result<DisplayControlSet> {
        self.with_domain((participant, domain), Error::HardwareRead, |d| {
            d.display_capability_fetches += 1;
            Ok(DisplayControlSet::new(d.display_levels.clone()))
        })
    }

    fn display_control_status(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> Result<DisplayControlStatus> {
        self.with_domain((participant, domain), Error::HardwareRead, |d| {
            Ok(DisplayControlStatus {
                brightness_limit_index: d.display_index,
            })
        })
    }

    fn set_display_control(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
        index: usize,
    ) -> Result<()> {
        self.with_domain((participant, domain), Error::HardwareWrite, |d| {
            if let Some(reason) = &d.fail_writes {
                return Err(Error::HardwareWrite(reason.clone()));
            }
            if index >= d.display_levels.len() {
                return Err(Error::HardwareWrite(format!(
                    "brightness index {} beyond {} levels",
                    index,
                    d.display_levels.len()
                )));
            }
            d.display_index = index;
            d.display_writes.push(index);
            Ok(())
        })
    }
}
