pub mod reload;
pub mod schema;
pub mod watcher;

pub use reload::{commands_for_reload, restart_required};
pub use schema::{MonitorConfig, PollConfig, TargetConfig};
pub use watcher::ConfigWatcher;

use bwmon_core::{MonitorError, Result};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "BWMON_CONFIG";

/// Load and validate configuration from a TOML file.  Returns
/// `MonitorConfig::default()` if the file doesn't exist so the monitor
/// always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<MonitorConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(MonitorConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: MonitorConfig =
        toml::from_str(&raw).map_err(|e| MonitorError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Return the default config path: `$BWMON_CONFIG` if set, otherwise
/// `bwmon/bwmon.toml` under `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    if let Ok(explicit) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(explicit);
    }
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("bwmon").join("bwmon.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bwmon-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("bwmon-definitely-missing.toml");
        assert_eq!(load(path).unwrap(), MonitorConfig::default());
    }

    #[test]
    fn loads_file_contents() {
        let path = scratch_file(
            "ok.toml",
            "[target]\naddress = \"router.lan\"\ninterface = \"ether2\"\n",
        );
        let config = load(&path).unwrap();
        assert_eq!(config.target.address, "router.lan");
        assert_eq!(config.target.interface, "ether2");
    }

    #[test]
    fn invalid_file_is_an_error() {
        let path = scratch_file("bad.toml", "[poll]\ninterval_ms = \"soon\"\n");
        assert!(matches!(load(&path), Err(MonitorError::Config(_))));

        let path = scratch_file("invalid.toml", "[poll]\ninterval_ms = 0\n");
        assert!(matches!(load(&path), Err(MonitorError::Config(_))));

        // The default 4 s timeout no longer fits inside a 3 s interval.
        let path = scratch_file("slow.toml", "[poll]\ninterval_ms = 3000\n");
        assert!(matches!(load(&path), Err(MonitorError::Config(_))));
    }
}
