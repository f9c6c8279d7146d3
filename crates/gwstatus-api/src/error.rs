use thiserror::Error;

/// Top-level error type for the `gwstatus-api` crate.
///
/// Covers every failure mode of a status-point read or RPC call.
/// `gwstatus-core` classifies these into operator-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for status points: {0}")]
    UnsupportedBaseUrl(String),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Bridge responses ────────────────────────────────────────────
    /// The bridge does not know the requested status point.
    #[error("Status point not found: {name}")]
    NotFound { name: String },

    /// Non-success HTTP status other than 404.
    #[error("Status bridge error (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request did not complete within its bound.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if the bridge answered but the payload was unusable.
    pub fn is_invalid_payload(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }
}
