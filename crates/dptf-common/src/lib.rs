//! Shared types for the DPTF control facades.
//!
//! This crate provides foundational types shared across the workspace:
//! - Participant/domain identity and static domain metadata
//! - Unit newtypes with comparison semantics
//! - Power and display control entries reported by hardware
//! - Common error types

pub mod controls;
pub mod domain;
pub mod error;
pub mod id;
pub mod units;

pub use controls::{
    DisplayControl, DisplayControlStatus, PowerControlDynamicCaps, PowerControlStatus,
    PowerControlType, PowerStatus,
};
pub use domain::{ControlInterface, DomainProperties};
pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use id::{DomainIndex, ParticipantIndex};
pub use units::{Percentage, Power, TimeWindow};
