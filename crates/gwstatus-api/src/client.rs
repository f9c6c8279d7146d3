// Status bridge HTTP client
//
// Wraps `reqwest::Client` with status-point URL construction and response
// classification. Plain reads are `GET {base}/pv/{name}`; remote procedure
// calls are `POST {base}/rpc/{name}` with the call arguments as a JSON
// object. Both return the structured value exactly as the gateway published
// it -- decoding into typed records is the caller's job.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for a gateway status bridge.
pub struct StatusClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl StatusClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the bridge root (e.g. `http://gateway-host:8080`),
    /// status points are addressed below it.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        }
    }

    /// The bridge base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{kind}/{name}`, encoding `name` as a single path segment.
    pub(crate) fn point_url(&self, kind: &str, name: &str) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::UnsupportedBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push(kind).push(name);
        }
        Ok(url)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Read the current value of a status point.
    ///
    /// `GET {base}/pv/{name}`
    pub async fn get(&self, name: &str) -> Result<Value, Error> {
        let url = self.point_url("pv", name)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        self.parse_body(name, resp).await
    }

    /// Invoke a status point as a remote procedure call.
    ///
    /// `POST {base}/rpc/{name}` with `args` serialized as the JSON body.
    pub async fn rpc(&self, name: &str, args: &impl Serialize) -> Result<Value, Error> {
        let url = self.point_url("rpc", name)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(args)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        self.parse_body(name, resp).await
    }

    /// Map reqwest timeouts onto `Error::Timeout` so callers see one variant.
    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Turn a bridge response into a structured value.
    ///
    /// An empty body means the gateway published nothing for the point and
    /// comes back as `Value::Null`.
    async fn parse_body(&self, name: &str, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound { name: name.into() });
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })
    }
}
