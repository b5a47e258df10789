//! Logging initialization.
//!
//! Updraft emits structured events through [`tracing`]; this module wires
//! up the subscriber for binaries that want the library's conventions:
//! env-filter driven levels (`RUST_LOG` wins over the configured default)
//! and an optional daily-rolling log file next to the update store.
//!
//! Libraries embedding updraft should skip this and install their own
//! subscriber.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::EnvFilter;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub filter: String,

    /// Directory for daily-rolling log files; `None` logs to stderr only.
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
        }
    }
}

impl LogConfig {
    /// Set the default filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Enable file logging in the given directory.
    pub fn with_directory(mut self, directory: PathBuf) -> Self {
        self.directory = Some(directory);
        self
    }
}

/// Initialize the global tracing subscriber.
///
/// Returns the appender guard when file logging is enabled; hold it for the
/// lifetime of the process or buffered lines are lost on exit.
///
/// Panics if a global subscriber is already installed, so call it once,
/// early in `main`.
pub fn init_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));

    // Local timestamps when the offset is determinable, UTC otherwise.
    let timer = OffsetTime::local_rfc_3339()
        .unwrap_or_else(|_| OffsetTime::new(time::UtcOffset::UTC, time::format_description::well_known::Rfc3339));

    match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "updraft.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_config() {
        let config = LogConfig::default();
        assert_eq!(config.filter, "info");
        assert!(config.directory.is_none());
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::default()
            .with_filter("debug")
            .with_directory(PathBuf::from("/var/log/updraft"));

        assert_eq!(config.filter, "debug");
        assert_eq!(config.directory, Some(PathBuf::from("/var/log/updraft")));
    }
}
