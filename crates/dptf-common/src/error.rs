//! Error types for the control facades.
//!
//! Every fault a facade can raise is an explicit variant with:
//! - A stable error code for machine parsing
//! - A category for grouping
//! - A recoverability hint
//! - A remediation suggestion for humans
//!
//! # Agent-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 20,
//!   "category": "control",
//!   "message": "participant 0 domain 1 does not support the power control interface",
//!   "recoverable": false,
//!   "context": { "participant": 0, "domain": 1, "interface": "power" }
//! }
//! ```

use crate::domain::ControlInterface;
use crate::id::{DomainIndex, ParticipantIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for facade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Platform file errors.
    Config,
    /// Misuse of a control set or facade.
    Control,
    /// Faults reported by the hardware access services.
    Hardware,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Control => write!(f, "control"),
            ErrorCategory::Hardware => write!(f, "hardware"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Control errors (20-29)
    #[error("participant {participant} domain {domain} does not support the {interface} control interface")]
    UnsupportedDomain {
        participant: ParticipantIndex,
        domain: DomainIndex,
        interface: ControlInterface,
    },

    #[error("control set does not contain an entry for {slot}")]
    SlotNotFound { slot: String },

    #[error("control set index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("reported control status set has {actual} entries, capability set has {expected}")]
    ControlSetMismatch { expected: usize, actual: usize },

    // Hardware errors (30-39)
    #[error("hardware control write failed: {0}")]
    HardwareWrite(String),

    #[error("hardware read failed: {0}")]
    HardwareRead(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Control errors
    /// - 30-39: Hardware errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::UnsupportedDomain { .. } => 20,
            Error::SlotNotFound { .. } => 21,
            Error::IndexOutOfRange { .. } => 22,
            Error::ControlSetMismatch { .. } => 23,
            Error::HardwareWrite(_) => 30,
            Error::HardwareRead(_) => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,

            Error::UnsupportedDomain { .. }
            | Error::SlotNotFound { .. }
            | Error::IndexOutOfRange { .. }
            | Error::ControlSetMismatch { .. } => ErrorCategory::Control,

            Error::HardwareWrite(_) | Error::HardwareRead(_) => ErrorCategory::Hardware,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Control errors are caller bugs or platform facts and will not go away
    /// on their own. Hardware faults may clear on a later policy pass.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => true,

            Error::UnsupportedDomain { .. } => false,
            Error::SlotNotFound { .. } => false,
            Error::IndexOutOfRange { .. } => false,
            Error::ControlSetMismatch { .. } => true, // stale read

            Error::HardwareWrite(_) => true,
            Error::HardwareRead(_) => true,

            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'dptf-facade check --platform <file>' to validate the platform description."
            }
            Error::UnsupportedDomain { .. } => {
                "Check the domain's properties before issuing controls; this domain does not expose the interface."
            }
            Error::SlotNotFound { .. } => {
                "Enumerate the capability set first and only address slots it reports."
            }
            Error::IndexOutOfRange { .. } => {
                "Control set sizes can change between reads. Re-read capabilities before indexing."
            }
            Error::ControlSetMismatch { .. } => {
                "Refresh capabilities and controls; the two reads observed different platform states."
            }
            Error::HardwareWrite(_) => {
                "The platform rejected the control request. No cached state was changed; retry on the next policy pass."
            }
            Error::HardwareRead(_) => {
                "The platform failed to report state. Retry on the next policy pass."
            }
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Invalid JSON in file. Check syntax or restore from backup.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::UnsupportedDomain { .. } => "Unsupported Domain",
            Error::SlotNotFound { .. } => "Slot Not Found",
            Error::IndexOutOfRange { .. } => "Index Out Of Range",
            Error::ControlSetMismatch { .. } => "Control Set Mismatch",
            Error::HardwareWrite(_) => "Hardware Write Fault",
            Error::HardwareRead(_) => "Hardware Read Fault",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., participant, slot).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::UnsupportedDomain {
                participant,
                domain,
                interface,
            } => {
                context.insert("participant".to_string(), serde_json::json!(participant));
                context.insert("domain".to_string(), serde_json::json!(domain));
                context.insert("interface".to_string(), serde_json::json!(interface));
            }
            Error::SlotNotFound { slot } => {
                context.insert("slot".to_string(), serde_json::json!(slot));
            }
            Error::IndexOutOfRange { index, len } => {
                context.insert("index".to_string(), serde_json::json!(index));
                context.insert("len".to_string(), serde_json::json!(len));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
