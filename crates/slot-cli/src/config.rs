//! Scheduler settings and log filter setup for `slotctl`.

use std::path::Path;

use anyhow::{Context, Result};
use slot_engine::SchedulerConfig;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Load scheduler settings from a TOML file.
///
/// No path means defaults. A path that does not exist also falls back to defaults
/// (with a warning); a file that exists but does not parse is an error.
pub fn load(path: Option<&Path>) -> Result<SchedulerConfig> {
    let Some(path) = path else {
        return Ok(SchedulerConfig::default());
    };
    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(SchedulerConfig::default());
    }

    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read config: {}", path.display()))?;
    let config: SchedulerConfig =
        toml::from_str(&content).with_context(|| format!("Invalid config: {}", path.display()))?;
    config.validate().with_context(|| format!("Invalid config: {}", path.display()))?;
    Ok(config)
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "slot_engine=debug,slot_cli=debug"
    } else {
        "slot_engine=info,slot_cli=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
