//! Platform description (platform.json).
//!
//! Describes participants, their domains, the interfaces each domain
//! implements and the capability data the platform initially reports.
//! The simulated platform in dptf-core is built from this description.

use dptf_common::{
    DisplayControl, DomainIndex, DomainProperties, ParticipantIndex, Percentage, Power,
    PowerControlDynamicCaps, PowerControlStatus, PowerControlType, TimeWindow,
};
use serde::{Deserialize, Serialize};

use crate::resolve::PlatformPath;
use crate::snapshot::ConfigSnapshot;
use crate::validate::ValidationError;

/// Complete platform description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub schema_version: String,

    #[serde(default)]
    pub participants: Vec<ParticipantConfig>,
}

/// One participant and its domains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantConfig {
    pub index: ParticipantIndex,
    pub name: String,

    #[serde(default)]
    pub domains: Vec<DomainConfig>,
}

/// One domain: static properties plus initially reported state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub index: DomainIndex,
    pub properties: DomainProperties,

    /// Power limit capabilities, one entry per tier.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub power_capabilities: Vec<PowerControlDynamicCaps>,

    /// Power limits currently programmed. Defaults to each tier's maximum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_status: Option<Vec<PowerControlStatus>>,

    /// Current power draw reported by the live status path.
    #[serde(default)]
    pub current_power: Power,

    /// Enumerated brightness levels, brightest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub display_levels: Vec<DisplayControl>,
}

impl DomainConfig {
    /// Power status as initially programmed on the platform.
    pub fn initial_power_status(&self) -> Vec<PowerControlStatus> {
        match &self.power_status {
            Some(status) => status.clone(),
            None => self
                .power_capabilities
                .iter()
                .map(PowerControlDynamicCaps::max_status)
                .collect(),
        }
    }
}

impl PlatformConfig {
    /// Load the description a resolved path points at, or the built-in
    /// default when resolution found no file.
    ///
    /// The snapshot hashes the file exactly as read.
    pub fn load(resolved: &PlatformPath) -> Result<(Self, ConfigSnapshot), ValidationError> {
        let Some(path) = &resolved.path else {
            let config = Self::default();
            let snapshot = ConfigSnapshot::from_default(&config);
            return Ok((config, snapshot));
        };

        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::parse_json(&content)?;
        let snapshot = ConfigSnapshot::new(&config, resolved, &content);
        Ok((config, snapshot))
    }

    /// Parse a platform description from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    pub fn participant(&self, index: ParticipantIndex) -> Option<&ParticipantConfig> {
        self.participants.iter().find(|p| p.index == index)
    }

    pub fn domain(
        &self,
        participant: ParticipantIndex,
        domain: DomainIndex,
    ) -> Option<&DomainConfig> {
        self.participant(participant)?
            .domains
            .iter()
            .find(|d| d.index == domain)
    }

    /// Iterate every (participant, domain) pair.
    pub fn domains(&self) -> impl Iterator<Item = (ParticipantIndex, &DomainConfig)> {
        self.participants
            .iter()
            .flat_map(|p| p.domains.iter().map(move |d| (p.index, d)))
    }
}

impl Default for PlatformConfig {
    /// A processor package with PL1 5..30 W and PL2 up to 45 W, plus an
    /// integrated panel with five brightness levels.
    fn default() -> Self {
        let pl1 = PowerControlDynamicCaps {
            power_control_type: PowerControlType::Pl1,
            min_power_limit: Power::from_watts(5),
            max_power_limit: Power::from_watts(30),
            power_step_size: Power::from_milliwatts(250),
            min_time_window: TimeWindow::from_millis(1_000),
            max_time_window: TimeWindow::from_millis(28_000),
            min_duty_cycle: Percentage::new(0.0),
            max_duty_cycle: Percentage::new(1.0),
        };
        let pl2 = PowerControlDynamicCaps {
            power_control_type: PowerControlType::Pl2,
            min_power_limit: Power::from_watts(5),
            max_power_limit: Power::from_watts(45),
            power_step_size: Power::from_milliwatts(250),
            min_time_window: TimeWindow::from_millis(1),
            max_time_window: TimeWindow::from_millis(2),
            min_duty_cycle: Percentage::new(0.0),
            max_duty_cycle: Percentage::new(1.0),
        };

        PlatformConfig {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            participants: vec![
                ParticipantConfig {
                    index: ParticipantIndex(0),
                    name: "cpu".to_string(),
                    domains: vec![DomainConfig {
                        index: DomainIndex(0),
                        properties: DomainProperties::new("package").with_power_control(),
                        power_capabilities: vec![pl1, pl2],
                        power_status: None,
                        current_power: Power::from_watts(12),
                        display_levels: Vec::new(),
                    }],
                },
                ParticipantConfig {
                    index: ParticipantIndex(1),
                    name: "panel".to_string(),
                    domains: vec![DomainConfig {
                        index: DomainIndex(0),
                        properties: DomainProperties::new("backlight").with_display_control(),
                        power_capabilities: Vec::new(),
                        power_status: None,
                        current_power: Power::from_milliwatts(1_800),
                        display_levels: [1.0, 0.8, 0.6, 0.4, 0.2]
                            .into_iter()
                            .map(|b| DisplayControl::new(Percentage::new(b)))
                            .collect(),
                    }],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_platform_is_valid() {
        let config = PlatformConfig::default();
        crate::validate::validate_platform(&config).unwrap();
        assert_eq!(config.domains().count(), 2);
    }

    #[test]
    fn test_initial_power_status_defaults_to_max() {
        let config = PlatformConfig::default();
        let domain = config.domain(ParticipantIndex(0), DomainIndex(0)).unwrap();
        let status = domain.initial_power_status();
        assert_eq!(status.len(), 2);
        assert_eq!(status[0].current_power_limit, Power::from_watts(30));
        assert_eq!(status[1].current_power_limit, Power::from_watts(45));
    }

    #[test]
    fn test_parse_minimal_json() {
        let json = r#"{
            "schema_version": "1.0.0",
            "participants": [{
                "index": 2,
                "name": "soc",
                "domains": [{
                    "index": 0,
                    "properties": { "name": "package", "implements_power_control": true },
                    "power_capabilities": [{
                        "power_control_type": "pl1",
                        "min_power_limit": 5000,
                        "max_power_limit": 30000,
                        "max_time_window": 28000,
                        "max_duty_cycle": 1.0
                    }]
                }]
            }]
        }"#;
        let config = PlatformConfig::parse_json(json).unwrap();
        let domain = config.domain(ParticipantIndex(2), DomainIndex(0)).unwrap();
        assert!(domain.properties.implements_power_control);
        assert_eq!(domain.power_capabilities.len(), 1);
        assert_eq!(domain.current_power, Power(0));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = PlatformConfig::parse_json("{ not json").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_load_without_path_uses_default() {
        let (config, snapshot) = PlatformConfig::load(&PlatformPath::default()).unwrap();
        assert_eq!(config, PlatformConfig::default());
        assert_eq!(snapshot.source, "builtin default");
        assert!(snapshot.path.is_none());
    }

    #[test]
    fn test_domain_lookup_missing() {
        let config = PlatformConfig::default();
        assert!(config.domain(ParticipantIndex(9), DomainIndex(0)).is_none());
        assert!(config.domain(ParticipantIndex(0), DomainIndex(5)).is_none());
    }
}
