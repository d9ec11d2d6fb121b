//! Logging configuration.
//!
//! Resolved from the environment (`DPTF_LOG`, then `RUST_LOG`, and
//! `DPTF_LOG_FORMAT`), with the CLI's `-v`/`-q`/`--format` flags overriding
//! whatever the environment chose.

use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;

/// Log line rendering on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event.
    Jsonl,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(LogFormat::Human),
            "json" | "jsonl" => Ok(LogFormat::Jsonl),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LevelFilter::INFO,
        }
    }
}

impl LogConfig {
    /// Resolve from the environment, then apply CLI overrides.
    pub fn from_env(cli_level: Option<LevelFilter>, cli_format: Option<LogFormat>) -> Self {
        let mut config = LogConfig::default();

        let env_level = match std::env::var("DPTF_LOG") {
            Ok(val) => val.parse().ok(),
            Err(_) => std::env::var("RUST_LOG")
                .ok()
                .and_then(|val| level_from_rust_log(&val)),
        };
        if let Some(level) = env_level {
            config.level = level;
        }
        if let Some(format) = std::env::var("DPTF_LOG_FORMAT")
            .ok()
            .and_then(|val| val.parse().ok())
        {
            config.format = format;
        }

        config.level = cli_level.unwrap_or(config.level);
        config.format = cli_format.unwrap_or(config.format);
        config
    }
}

/// Level selected by `-v`/`-q`, or `None` when neither flag was given.
///
/// `-q` wins over any number of `-v`.
pub fn cli_level(verbose: u8, quiet: bool) -> Option<LevelFilter> {
    match (quiet, verbose) {
        (true, _) => Some(LevelFilter::ERROR),
        (false, 0) => None,
        (false, 1) => Some(LevelFilter::DEBUG),
        (false, _) => Some(LevelFilter::TRACE),
    }
}

/// Most verbose level named anywhere in a RUST_LOG directive string.
fn level_from_rust_log(directives: &str) -> Option<LevelFilter> {
    ["trace", "debug", "info", "warn", "error"]
        .into_iter()
        .find(|name| directives.contains(name))
        .and_then(|name| name.parse().ok())
}
