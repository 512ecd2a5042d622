use thiserror::Error;

/// Top-level error type used across the entire application.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("config error: {0}")]
    Config(String),

    #[error("poller error: {0}")]
    Poller(String),
}

/// Why a single statistics fetch produced no sample.
///
/// None of these are fatal: the polling loop marks the connection as
/// disconnected and tries again on the next tick.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Backend unreachable, timed out, or the connection dropped.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Backend answered with a non-success HTTP status.
    #[error("backend returned HTTP {0}")]
    Status(u16),

    /// Response body missing fields or carrying non-numeric throughput.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

pub type Result<T, E = MonitorError> = std::result::Result<T, E>;
