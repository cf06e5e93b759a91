//! Logging setup.
//!
//! The library only emits `tracing` events. Binaries call [`init`] once to
//! install a stderr subscriber configured from [`LoggingSettings`].
//!
//! Two environment variables affect the level:
//! - `README_MANAGER_LOG` replaces `logging.level` while configuration is
//!   loaded (see [`crate::config::LOG_LEVEL_ENV`]). It takes one level name
//!   and is validated like the config value.
//! - `RUST_LOG` is read here as `EnvFilter` directives. When set and valid, it
//!   takes precedence over the resulting level and may filter per target.

use crate::config::{LogFormat, LoggingSettings};
use crate::errors::{ReadmeError, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Map a configured level name to a filter.
///
/// Accepts the tracing names plus `WARNING` and `CRITICAL`, case-insensitively.
pub fn parse_level(level: &str) -> Result<LevelFilter> {
    match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Ok(LevelFilter::TRACE),
        "DEBUG" => Ok(LevelFilter::DEBUG),
        "INFO" => Ok(LevelFilter::INFO),
        "WARN" | "WARNING" => Ok(LevelFilter::WARN),
        "ERROR" | "CRITICAL" => Ok(LevelFilter::ERROR),
        "OFF" => Ok(LevelFilter::OFF),
        other => Err(ReadmeError::Config(format!(
            "logging.level must be a level name, found '{}'",
            other
        ))),
    }
}

/// Install the global subscriber.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init(settings: &LoggingSettings) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(parse_level(&settings.level)?.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    // try_init only fails when a subscriber is already installed.
    let _ = match settings.format {
        LogFormat::Full => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    Ok(())
}
