//! Static domain metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A control interface a domain may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlInterface {
    Power,
    Display,
}

impl fmt::Display for ControlInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlInterface::Power => write!(f, "power"),
            ControlInterface::Display => write!(f, "display"),
        }
    }
}

/// Read-only description of the interfaces a domain implements.
///
/// Built once from platform discovery (or a platform file) and never
/// mutated by the facades.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainProperties {
    pub name: String,

    #[serde(default)]
    pub implements_power_control: bool,

    #[serde(default)]
    pub implements_display_control: bool,
}

impl DomainProperties {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_power_control(mut self) -> Self {
        self.implements_power_control = true;
        self
    }

    pub fn with_display_control(mut self) -> Self {
        self.implements_display_control = true;
        self
    }

    /// Whether the domain implements the given control interface.
    pub fn implements(&self, interface: ControlInterface) -> bool {
        match interface {
            ControlInterface::Power => self.implements_power_control,
            ControlInterface::Display => self.implements_display_control,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implements() {
        let props = DomainProperties::new("package").with_power_control();
        assert!(props.implements(ControlInterface::Power));
        assert!(!props.implements(ControlInterface::Display));
    }

    #[test]
    fn test_missing_flags_default_false() {
        let props: DomainProperties = serde_json::from_str(r#"{"name":"gfx"}"#).unwrap();
        assert!(!props.implements_power_control);
        assert!(!props.implements_display_control);
    }

    #[test]
    fn test_interface_display() {
        assert_eq!(ControlInterface::Power.to_string(), "power");
        assert_eq!(ControlInterface::Display.to_string(), "display");
    }
}
