//! Platform file resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths →
//! system config → built-in default.

use std::path::{Path, PathBuf};

/// Discovered platform file path.
#[derive(Debug, Clone, Default)]
pub struct PlatformPath {
    /// Path to platform.json (or None if the built-in default applies).
    pub path: Option<PathBuf>,

    /// Where the path came from (for diagnostics).
    pub source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/dptf-facade/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_PLATFORM_PATH: &str = "DPTF_PLATFORM";
pub const ENV_CONFIG_DIR: &str = "DPTF_CONFIG_DIR";

/// Standard platform file name.
pub const PLATFORM_FILENAME: &str = "platform.json";

/// Application name for XDG directories.
const APP_NAME: &str = "dptf-facade";

/// Resolve the platform file path.
///
/// 1. Explicit CLI path (if it exists)
/// 2. `DPTF_PLATFORM` environment variable
/// 3. `DPTF_CONFIG_DIR` environment variable + filename
/// 4. XDG config directory (~/.config/dptf-facade/)
/// 5. System config (/etc/dptf-facade/)
/// 6. Built-in default (None)
pub fn resolve_platform(cli_path: Option<&Path>) -> PlatformPath {
    if let Some(path) = cli_path {
        if path.exists() {
            return found(path.to_path_buf(), ConfigSource::CliArgument);
        }
    }

    if let Ok(env_path) = std::env::var(ENV_PLATFORM_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(PLATFORM_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(PLATFORM_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    let system_path = system_config_dir().join(PLATFORM_FILENAME);
    if system_path.exists() {
        return found(system_path, ConfigSource::SystemConfig);
    }

    PlatformPath::default()
}

fn found(path: PathBuf, source: ConfigSource) -> PlatformPath {
    PlatformPath {
        path: Some(path),
        source,
    }
}

/// Get the XDG config directory for dptf-facade.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
