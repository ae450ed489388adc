//! HTTP JSON-RPC transport backed by `reqwest`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use ethrpc_core::error::{ClientError, ProtocolError, TransportError};
use ethrpc_core::request::{JsonRpcRequest, JsonRpcResponse};
use ethrpc_core::transport::RpcTransport;

/// Default endpoint of a locally running node.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8545/";

/// Configuration for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Overall per-request timeout, connection setup included.
    pub request_timeout: Duration,
    /// Caller-supplied cancellation signal. Cancelling it aborts in-flight
    /// requests with [`TransportError::Canceled`].
    pub cancel: CancellationToken,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cancel: CancellationToken::new(),
        }
    }
}

/// HTTP JSON-RPC transport bound to a single endpoint URL.
///
/// The only mutable state is the request-id counter; the underlying
/// `reqwest::Client` pools connections and is safe to share across tasks.
#[derive(Debug)]
pub struct HttpTransport {
    url: reqwest::Url,
    url_str: String,
    http: reqwest::Client,
    next_id: AtomicU64,
    request_timeout: Duration,
    cancel: CancellationToken,
}

impl HttpTransport {
    /// Create a transport for the given endpoint URL.
    ///
    /// Fails eagerly with [`ClientError::Config`] on a malformed URL, a
    /// non-http(s) scheme or a zero timeout; a bad endpoint never produces
    /// a delayed failure on first use.
    pub fn new(url: impl AsRef<str>, config: HttpClientConfig) -> Result<Self, ClientError> {
        let raw = url.as_ref();
        let url = reqwest::Url::parse(raw)
            .map_err(|e| ClientError::Config(format!("invalid endpoint URL {raw:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "unsupported URL scheme {:?}, expected http or https",
                url.scheme()
            )));
        }
        if config.request_timeout.is_zero() {
            return Err(ClientError::Config(
                "request timeout must be greater than zero".into(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url_str: url.to_string(),
            url,
            http,
            next_id: AtomicU64::new(1),
            request_timeout: config.request_timeout,
            cancel: config.cancel,
        })
    }

    /// Transport for a node on `http://localhost:8545/` with defaults.
    pub fn localhost() -> Result<Self, ClientError> {
        Self::new(DEFAULT_ENDPOINT, HttpClientConfig::default())
    }

    fn classify(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            TransportError::Timeout {
                ms: self.request_timeout.as_millis() as u64,
            }
            .into()
        } else if e.is_connect() {
            TransportError::Connect(e.to_string()).into()
        } else {
            TransportError::Io(e.to_string()).into()
        }
    }

    async fn send_once(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, ClientError> {
        let resp = self
            .http
            .post(self.url.clone())
            .json(req)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }
            .into());
        }

        // The body is parsed as JSON whatever the response content-type says.
        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| ProtocolError::InvalidJson(e.to_string()))?;
        JsonRpcResponse::from_value(value)
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, ClientError> {
        tracing::debug!(method = %req.method, id = %req.id, url = %self.url_str, "sending JSON-RPC request");

        // Dropping the request future on cancellation releases the pooled
        // connection; no retry follows in either branch.
        let result = tokio::select! {
            _ = self.cancel.cancelled() => Err(TransportError::Canceled.into()),
            res = self.send_once(&req) => res,
        };

        if let Err(e) = &result {
            tracing::warn!(method = %req.method, id = %req.id, error = %e, "JSON-RPC request failed");
        }
        result
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn url(&self) -> &str {
        &self.url_str
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_rejects_malformed_url() {
        let err = HttpTransport::new("not a url", HttpClientConfig::default()).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn construction_rejects_non_http_scheme() {
        let err = HttpTransport::new("ftp://localhost:8545/", HttpClientConfig::default())
            .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn construction_rejects_zero_timeout() {
        let config = HttpClientConfig {
            request_timeout: Duration::ZERO,
            ..Default::default()
        };
        let err = HttpTransport::new(DEFAULT_ENDPOINT, config).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let transport = HttpTransport::localhost().unwrap();
        let ids: Vec<u64> = (0..100).map(|_| transport.next_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
