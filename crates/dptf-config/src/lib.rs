//! Platform description loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for platform.json
//! - Path resolution (CLI → env → XDG → system → defaults)
//! - Semantic validation of reported capability sets
//! - Config snapshots for diagnostics

pub mod platform;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use platform::{DomainConfig, ParticipantConfig, PlatformConfig};
pub use resolve::{resolve_platform, ConfigSource, PlatformPath};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_platform, ValidationError, ValidationResult};

/// Schema version for platform files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
