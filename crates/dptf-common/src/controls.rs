//! Control entries reported by (and submitted to) hardware.
//!
//! A capability entry describes the bounds of one tunable slot at a point in
//! time; a status entry is a requested or confirmed value for that slot.

use crate::units::{Percentage, Power, TimeWindow};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Power limit tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerControlType {
    Pl1,
    Pl2,
    Pl3,
    Pl4,
}

impl PowerControlType {
    pub const ALL: [PowerControlType; 4] = [
        PowerControlType::Pl1,
        PowerControlType::Pl2,
        PowerControlType::Pl3,
        PowerControlType::Pl4,
    ];
}

impl fmt::Display for PowerControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerControlType::Pl1 => write!(f, "pl1"),
            PowerControlType::Pl2 => write!(f, "pl2"),
            PowerControlType::Pl3 => write!(f, "pl3"),
            PowerControlType::Pl4 => write!(f, "pl4"),
        }
    }
}

impl std::str::FromStr for PowerControlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pl1" => Ok(PowerControlType::Pl1),
            "pl2" => Ok(PowerControlType::Pl2),
            "pl3" => Ok(PowerControlType::Pl3),
            "pl4" => Ok(PowerControlType::Pl4),
            _ => Err(format!("unknown power control type: {}", s)),
        }
    }
}

/// Hardware-reported bounds for one power limit tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerControlDynamicCaps {
    pub power_control_type: PowerControlType,
    pub min_power_limit: Power,
    pub max_power_limit: Power,
    #[serde(default)]
    pub power_step_size: Power,
    #[serde(default)]
    pub min_time_window: TimeWindow,
    pub max_time_window: TimeWindow,
    #[serde(default)]
    pub min_duty_cycle: Percentage,
    pub max_duty_cycle: Percentage,
}

impl PowerControlDynamicCaps {
    /// Status entry at this tier's maximum limit, time window and duty cycle.
    pub fn max_status(&self) -> PowerControlStatus {
        PowerControlStatus::new(
            self.power_control_type,
            self.max_power_limit,
            self.max_time_window,
            self.max_duty_cycle,
        )
    }

    /// Status entry at this tier's minimum limit, keeping the maximum time
    /// window and duty cycle.
    pub fn min_limit_status(&self) -> PowerControlStatus {
        PowerControlStatus::new(
            self.power_control_type,
            self.min_power_limit,
            self.max_time_window,
            self.max_duty_cycle,
        )
    }
}

/// Requested or last-confirmed value for one power limit tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerControlStatus {
    pub power_control_type: PowerControlType,
    pub current_power_limit: Power,
    pub current_time_window: TimeWindow,
    pub current_duty_cycle: Percentage,
}

impl PowerControlStatus {
    pub fn new(
        power_control_type: PowerControlType,
        current_power_limit: Power,
        current_time_window: TimeWindow,
        current_duty_cycle: Percentage,
    ) -> Self {
        Self {
            power_control_type,
            current_power_limit,
            current_time_window,
            current_duty_cycle,
        }
    }
}

impl fmt::Display for PowerControlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={} window={} duty={}",
            self.power_control_type,
            self.current_power_limit,
            self.current_time_window,
            self.current_duty_cycle
        )
    }
}

/// Live power reading for a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerStatus {
    pub current_power: Power,
}

/// One enumerated brightness level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayControl {
    pub brightness: Percentage,
}

impl DisplayControl {
    pub fn new(brightness: Percentage) -> Self {
        Self { brightness }
    }
}

/// Currently applied brightness limit, as an index into the display set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayControlStatus {
    pub brightness_limit_index: usize,
}
