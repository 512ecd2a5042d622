//! JSON shapes exchanged with the statistics backend.

use bwmon_core::{FetchError, PollTarget, Sample};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Request body: which router and interface to measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRequest<'a> {
    pub ip_address: &'a str,
    pub interface_name: &'a str,
}

impl<'a> From<&'a PollTarget> for StatsRequest<'a> {
    fn from(target: &'a PollTarget) -> Self {
        Self {
            ip_address: &target.address,
            interface_name: &target.interface,
        }
    }
}

/// Response body as the backend sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Measurement time; absent means "now".
    #[serde(default)]
    pub hora: Option<WireTime>,
    pub rx_mbps: Throughput,
    pub tx_mbps: Throughput,
}

/// Throughput arrives either as a JSON number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Throughput {
    Number(f64),
    Text(String),
}

/// `hora` is normally an RFC 3339 string; some serializers emit epoch seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireTime {
    EpochSeconds(f64),
    Text(String),
}

impl Throughput {
    fn mbps(&self, field: &str) -> Result<f64, FetchError> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| FetchError::Malformed(format!("{field} is not numeric: {s:?}")))?,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(FetchError::Malformed(format!("{field} out of range: {value}")));
        }
        Ok(value)
    }
}

impl WireTime {
    fn millis(&self) -> Result<i64, FetchError> {
        match self {
            Self::Text(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|t| t.timestamp_millis())
                .map_err(|e| FetchError::Malformed(format!("bad hora {s:?}: {e}"))),
            Self::EpochSeconds(secs) if secs.is_finite() => Ok((secs * 1000.0).round() as i64),
            Self::EpochSeconds(secs) => Err(FetchError::Malformed(format!("bad hora {secs}"))),
        }
    }
}

impl StatsResponse {
    /// Convert into a [`Sample`], stamping it with `received_at` (epoch ms)
    /// when the backend did not report a time.
    pub fn into_sample(self, received_at: i64) -> Result<Sample, FetchError> {
        let rx = self.rx_mbps.mbps("rxMbps")?;
        let tx = self.tx_mbps.mbps("txMbps")?;
        let timestamp = match &self.hora {
            Some(hora) => hora.millis()?,
            None => received_at,
        };
        Ok(Sample::new(timestamp, rx, tx))
    }
}

/// Decode a raw response body into a [`Sample`].
pub fn parse_response(body: &str, received_at: i64) -> Result<Sample, FetchError> {
    let response: StatsResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("cannot decode response: {e}")))?;
    response.into_sample(received_at)
}
