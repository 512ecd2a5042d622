use crate::source::BandwidthSource;
use crate::wire::{parse_response, StatsRequest};
use bwmon_core::{state::now_millis, FetchError, MonitorError, PollTarget, Result, Sample};
use std::time::Duration;
use tracing::trace;

/// Backend statistics client.
///
/// POSTs `{ipAddress, interfaceName}` to the configured endpoint and decodes
/// the `{hora, rxMbps, txMbps}` reply.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client:   reqwest::Client,
    endpoint: String,
}

impl HttpSource {
    /// Build a client for `endpoint`. Every request gives up after `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::Poller(format!("cannot build HTTP client: {e}")))?;

        Ok(Self::with_client(client, endpoint))
    }

    /// Use an already configured client, e.g. one with custom proxy or TLS
    /// settings.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl BandwidthSource for HttpSource {
    async fn fetch(&self, target: &PollTarget) -> Result<Sample, FetchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&StatsRequest::from(target))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        trace!("Backend replied: {body}");

        parse_response(&body, now_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn source(endpoint: String) -> HttpSource {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        HttpSource::with_client(client, endpoint)
    }

    fn router() -> PollTarget {
        PollTarget::new("192.168.1.166", "ether2")
    }

    /// Read one HTTP/1.1 request, returning its head and body.
    async fn read_request(stream: &mut TcpStream) -> (String, String) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let head_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client hung up mid-request");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < head_end + length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client hung up mid-body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[head_end..head_end + length]).to_string();
        (head, body)
    }

    /// Serve one canned reply and hand back what the client sent.
    async fn backend(status: &'static str, reply: &'static str) -> (String, JoinHandle<(String, String)>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{reply}",
                reply.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
            request
        });
        (format!("http://{addr}/api"), task)
    }

    #[tokio::test]
    async fn posts_target_and_decodes_reply() {
        let (endpoint, server) = backend(
            "200 OK",
            r#"{"hora": "2024-05-01T12:00:00Z", "rxMbps": 0.004, "txMbps": "0.001"}"#,
        )
        .await;

        let sample = source(endpoint).fetch(&router()).await.unwrap();
        assert_eq!(sample, Sample::new(1_714_564_800_000, 0.004, 0.001));

        let (head, body) = server.await.unwrap();
        assert!(head.starts_with("POST /api "), "{head}");
        let sent: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({ "ipAddress": "192.168.1.166", "interfaceName": "ether2" })
        );
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (endpoint, server) = backend("500 Internal Server Error", r#"{"error": "snmp"}"#).await;
        let result = source(endpoint).fetch(&router()).await;
        assert_eq!(result, Err(FetchError::Status(500)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn garbage_body_is_malformed() {
        let (endpoint, server) = backend("200 OK", "not json").await;
        let result = source(endpoint).fetch(&router()).await;
        assert!(matches!(result, Err(FetchError::Malformed(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn refused_connection_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = source(format!("http://{addr}/api")).fetch(&router()).await;
        assert!(matches!(result, Err(FetchError::Transport(_))), "{result:?}");
    }
}
