//! Platform validation errors and semantic validation.

use std::collections::HashSet;

use dptf_common::{PowerControlDynamicCaps, PowerControlType};
use thiserror::Error;

use crate::platform::{DomainConfig, PlatformConfig};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Platform validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

impl From<ValidationError> for dptf_common::Error {
    fn from(err: ValidationError) -> Self {
        dptf_common::Error::Config(err.to_string())
    }
}

/// Validate a platform description semantically.
pub fn validate_platform(config: &PlatformConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    let mut participants = HashSet::new();
    for participant in &config.participants {
        if !participants.insert(participant.index) {
            return Err(ValidationError::SemanticError(format!(
                "duplicate participant index {}",
                participant.index
            )));
        }

        let mut domains = HashSet::new();
        for domain in &participant.domains {
            if !domains.insert(domain.index) {
                return Err(ValidationError::SemanticError(format!(
                    "duplicate domain index {} in participant {}",
                    domain.index, participant.index
                )));
            }
            let field = format!("participants[{}].domains[{}]", participant.index, domain.index);
            validate_domain(&field, domain)?;
        }
    }

    Ok(())
}

fn validate_domain(field: &str, domain: &DomainConfig) -> ValidationResult<()> {
    if domain.properties.implements_power_control {
        validate_power_capabilities(&format!("{}.power_capabilities", field), &domain.power_capabilities)?;

        if let Some(status) = &domain.power_status {
            if status.len() != domain.power_capabilities.len() {
                return Err(ValidationError::InvalidValue {
                    field: format!("{}.power_status", field),
                    message: format!(
                        "has {} entries, capabilities have {}",
                        status.len(),
                        domain.power_capabilities.len()
                    ),
                });
            }
            for (index, (entry, caps)) in status.iter().zip(&domain.power_capabilities).enumerate() {
                if entry.power_control_type != caps.power_control_type {
                    return Err(ValidationError::InvalidValue {
                        field: format!("{}.power_status[{}]", field, index),
                        message: format!(
                            "type {} does not match capability type {}",
                            entry.power_control_type, caps.power_control_type
                        ),
                    });
                }
            }
        }
    }

    if domain.properties.implements_display_control {
        validate_display_levels(&format!("{}.display_levels", field), domain)?;
    }

    Ok(())
}

/// Validate one domain's power capability set.
///
/// Slot types must be unique and PL1 must be present, since the facade
/// resolves PL1 by type when re-checking bounds.
pub fn validate_power_capabilities(
    field: &str,
    caps: &[PowerControlDynamicCaps],
) -> ValidationResult<()> {
    if caps.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "power control domain must report at least one tier".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for (index, entry) in caps.iter().enumerate() {
        let entry_field = format!("{}[{}]", field, index);
        if !seen.insert(entry.power_control_type) {
            return Err(ValidationError::InvalidValue {
                field: entry_field,
                message: format!("duplicate tier {}", entry.power_control_type),
            });
        }
        if entry.min_power_limit > entry.max_power_limit {
            return Err(ValidationError::InvalidValue {
                field: entry_field,
                message: format!(
                    "min_power_limit {} exceeds max_power_limit {}",
                    entry.min_power_limit, entry.max_power_limit
                ),
            });
        }
        if entry.min_time_window > entry.max_time_window {
            return Err(ValidationError::InvalidValue {
                field: entry_field,
                message: format!(
                    "min_time_window {} exceeds max_time_window {}",
                    entry.min_time_window, entry.max_time_window
                ),
            });
        }
        if !entry.min_duty_cycle.is_valid() || !entry.max_duty_cycle.is_valid() {
            return Err(ValidationError::InvalidValue {
                field: entry_field,
                message: "duty cycles must be within [0, 1]".to_string(),
            });
        }
        if entry.min_duty_cycle > entry.max_duty_cycle {
            return Err(ValidationError::InvalidValue {
                field: entry_field,
                message: format!(
                    "min_duty_cycle {} exceeds max_duty_cycle {}",
                    entry.min_duty_cycle, entry.max_duty_cycle
                ),
            });
        }
    }

    if !seen.contains(&PowerControlType::Pl1) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "missing pl1 tier".to_string(),
        });
    }

    Ok(())
}

fn validate_display_levels(field: &str, domain: &DomainConfig) -> ValidationResult<()> {
    if domain.display_levels.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: "display control domain must report at least one level".to_string(),
        });
    }

    for (index, level) in domain.display_levels.iter().enumerate() {
        if !level.brightness.is_valid() {
            return Err(ValidationError::InvalidValue {
                field: format!("{}[{}]", field, index),
                message: format!("brightness {} outside [0, 1]", level.brightness.fraction()),
            });
        }
        if domain.display_levels[..index].contains(level) {
            return Err(ValidationError::InvalidValue {
                field: format!("{}[{}]", field, index),
                message: format!("duplicate brightness {}", level.brightness),
            });
        }
    }

    Ok(())
}
