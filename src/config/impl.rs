use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config_from() first.")
        .load_full()
}

/// Like [`get_config`], but returns `None` before initialization
pub fn try_get_config() -> Option<Arc<StaticConfig>> {
    CONFIG.get().map(|c| c.load_full())
}

/// Initialize the global configuration from a TOML file and `SL__*`
/// environment variables
///
/// # Examples
/// ```no_run
/// use shortlink_registry::config::{DEFAULT_CONFIG_PATH, init_config_from};
/// init_config_from(DEFAULT_CONFIG_PATH).expect("invalid configuration");
/// ```
///
/// Fails when the sources cannot be parsed or do not validate; the global
/// stays unset in that case. Once initialized, later calls are no-ops.
pub fn init_config_from(path: &str) -> Result<()> {
    if CONFIG.get().is_some() {
        return Ok(());
    }

    let config = StaticConfig::try_load_from(path)?;
    if std::path::Path::new(path).exists() {
        eprintln!("[INFO] Configuration loaded from: {}", path);
    }

    // A concurrent initializer may have won; its value stays.
    let _ = CONFIG.set(ArcSwap::from_pointee(config));
    Ok(())
}
