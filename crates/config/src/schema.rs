use bwmon_core::{MonitorError, PollTarget, Result, DEFAULT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure parsed from `bwmon.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Which router and interface to watch.
    pub target: TargetConfig,
    /// Backend endpoint and polling cadence.
    pub poll: PollConfig,
}

impl MonitorConfig {
    /// The router/interface pair the poller should query.
    pub fn poll_target(&self) -> PollTarget {
        PollTarget::new(self.target.address.clone(), self.target.interface.clone())
    }

    /// Reject configurations the poller cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.target.address.trim().is_empty() {
            return Err(MonitorError::Config("target.address is empty".into()));
        }
        self.target.check_interface(&self.target.interface)?;
        if self.poll.endpoint.trim().is_empty() {
            return Err(MonitorError::Config("poll.endpoint is empty".into()));
        }
        if self.poll.interval_ms == 0 {
            return Err(MonitorError::Config("poll.interval_ms must be positive".into()));
        }
        // A response slower than the interval is always overtaken by the
        // next fetch and discarded.
        if self.poll.request_timeout_ms == 0 || self.poll.request_timeout_ms >= self.poll.interval_ms {
            return Err(MonitorError::Config(format!(
                "poll.request_timeout_ms must be between 1 and {} (below poll.interval_ms)",
                self.poll.interval_ms - 1
            )));
        }
        if self.poll.history == 0 {
            return Err(MonitorError::Config("poll.history must be positive".into()));
        }
        Ok(())
    }
}

/// Router selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Router IP address or hostname.
    pub address: String,
    /// Interface to report on.
    pub interface: String,
    /// Interfaces the user may pick from. Empty = any name accepted.
    pub interfaces: Vec<String>,
}

impl TargetConfig {
    /// Ensure `name` is one of the selectable interfaces.
    pub fn check_interface(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(MonitorError::Config("interface name is empty".into()));
        }
        if !self.interfaces.is_empty() && !self.interfaces.iter().any(|i| i == name) {
            return Err(MonitorError::Config(format!(
                "unknown interface '{name}' (expected one of: {})",
                self.interfaces.join(", ")
            )));
        }
        Ok(())
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            address:    "192.168.1.166".to_string(),
            interface:  "ether1".to_string(),
            interfaces: vec!["ether1".to_string(), "ether2".to_string()],
        }
    }
}

/// Polling cadence and backend location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Backend statistics endpoint (accepts a JSON POST).
    pub endpoint: String,
    /// Milliseconds between fetches.
    pub interval_ms: u64,
    /// Per-request timeout in milliseconds; keep it below `interval_ms`.
    pub request_timeout_ms: u64,
    /// Number of samples kept for the chart.
    pub history: usize,
    /// Start with polling paused.
    pub paused: bool,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            endpoint:           "http://localhost:8080/api".to_string(),
            interval_ms:        5_000,
            request_timeout_ms: 4_000,
            history:            DEFAULT_CAPACITY,
            paused:             false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll.interval(), Duration::from_secs(5));
        assert_eq!(config.poll.history, 60);
        assert_eq!(config.poll_target(), PollTarget::new("192.168.1.166", "ether1"));
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: MonitorConfig = toml::from_str(
            r#"
            [target]
            address = "10.0.0.1"

            [poll]
            paused = true
            "#,
        )
        .unwrap();
        assert_eq!(config.target.address, "10.0.0.1");
        assert_eq!(config.target.interface, "ether1");
        assert!(config.poll.paused);
        assert_eq!(config.poll.interval_ms, 5_000);
    }

    #[test]
    fn rejects_unlisted_interface() {
        let mut config = MonitorConfig::default();
        config.target.interface = "wlan0".into();
        assert!(matches!(config.validate(), Err(MonitorError::Config(_))));

        config.target.interfaces.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_interval_and_blank_address() {
        let mut config = MonitorConfig::default();
        config.poll.interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = MonitorConfig::default();
        config.target.address = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn request_timeout_must_fit_inside_interval() {
        let mut config = MonitorConfig::default();
        config.poll.request_timeout_ms = 0;
        assert!(matches!(config.validate(), Err(MonitorError::Config(_))));

        config.poll.request_timeout_ms = config.poll.interval_ms;
        assert!(matches!(config.validate(), Err(MonitorError::Config(_))));

        config.poll.interval_ms = 10_000;
        config.poll.request_timeout_ms = 9_999;
        assert!(config.validate().is_ok());
    }
}
