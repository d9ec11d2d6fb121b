//! Exit codes for the dptf-facade CLI.
//!
//! Exit code ranges:
//! - 0: Success
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use dptf_common::{Error, ErrorCategory};

/// Exit codes for dptf-facade operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// Invalid arguments or platform file
    ArgsError = 10,

    /// Domain does not implement the requested control interface
    UnsupportedDomain = 11,

    /// Hardware read or write fault
    HardwareFault = 12,

    /// Internal error (bug)
    InternalError = 20,

    /// I/O error writing output
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match (err, err.category()) {
            (Error::UnsupportedDomain { .. }, _) => ExitCode::UnsupportedDomain,
            (_, ErrorCategory::Config) => ExitCode::ArgsError,
            (_, ErrorCategory::Control) => ExitCode::ArgsError,
            (_, ErrorCategory::Hardware) => ExitCode::HardwareFault,
            (Error::Json(_), _) => ExitCode::InternalError,
            (_, ErrorCategory::Io) => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_i32() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dptf_common::{ControlInterface, DomainIndex, ParticipantIndex};

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::HardwareFault.as_i32(), 12);
        assert!(ExitCode::Clean.is_success());
        assert!(!ExitCode::InternalError.is_success());
    }

    #[test]
    fn test_exit_code_from_error() {
        let unsupported = Error::UnsupportedDomain {
            participant: ParticipantIndex(0),
            domain: DomainIndex(0),
            interface: ControlInterface::Power,
        };
        assert_eq!(ExitCode::from(&unsupported), ExitCode::UnsupportedDomain);
        assert_eq!(
            ExitCode::from(&Error::HardwareWrite("nak".into())),
            ExitCode::HardwareFault
        );
        assert_eq!(
            ExitCode::from(&Error::SlotNotFound { slot: "pl3".into() }),
            ExitCode::ArgsError
        );
    }
}
