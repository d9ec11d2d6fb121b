//! Structured logging for the control facades.
//!
//! The facades emit `tracing` events: `debug` for initialization and
//! clamping decisions, `info` for every committed submission. This module
//! installs the subscriber that renders them.
//!
//! - stdout is reserved for command payloads
//! - stderr receives all log output (human or JSONL)

pub mod config;

pub use config::{cli_level, LogConfig, LogFormat};

use std::io::IsTerminal;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose events are shown at the configured level.
const LOG_TARGETS: [&str; 2] = ["dptf_core", "dptf_facade"];

/// Install the global subscriber. Call once, before any event is emitted.
///
/// RUST_LOG, when it parses as a filter, replaces the generated one.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config.level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Human => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .init(),
        LogFormat::Jsonl => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn default_filter(level: LevelFilter) -> EnvFilter {
    let directives: Vec<String> = LOG_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect();
    EnvFilter::new(directives.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_names_every_target() {
        let filter = default_filter(LevelFilter::DEBUG).to_string();
        assert!(filter.contains("dptf_core=debug"));
        assert!(filter.contains("dptf_facade=debug"));
    }
}
