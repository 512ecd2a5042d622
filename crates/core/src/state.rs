use chrono::{DateTime, Utc};

use crate::ticks::AxisScale;

/// One bandwidth observation reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Receive throughput in Mbps.
    pub rx_mbps: f64,
    /// Transmit throughput in Mbps.
    pub tx_mbps: f64,
}

impl Sample {
    pub fn new(timestamp: i64, rx_mbps: f64, tx_mbps: f64) -> Self {
        Self {
            timestamp,
            rx_mbps,
            tx_mbps,
        }
    }

    /// The larger of the two directions.
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.rx_mbps.max(self.tx_mbps)
    }

    /// Sample time as a UTC datetime, `None` if the timestamp is out of range.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Outcome of the most recently applied fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
}

/// Whether the polling loop is currently scheduling fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollMode {
    #[default]
    Running,
    Paused,
}

/// Router the backend should query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PollTarget {
    /// Router IP address or hostname.
    pub address: String,
    /// Interface name on the router, e.g. `"ether1"`.
    pub interface: String,
}

impl PollTarget {
    pub fn new(address: impl Into<String>, interface: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            interface: interface.into(),
        }
    }
}

impl std::fmt::Display for PollTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.address, self.interface)
    }
}

/// Read-only snapshot handed to the presentation layer after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Buffered samples, oldest first.
    pub samples: Vec<Sample>,
    pub status: ConnectionStatus,
    /// Timestamp of the last accepted sample, if any.
    pub last_reading: Option<i64>,
    /// Y-axis ticks derived from `samples`.
    pub axis: AxisScale,
    pub mode: PollMode,
    pub target: PollTarget,
}
