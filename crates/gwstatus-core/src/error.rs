// ── Core error types ──
//
// Operator-facing failures from gwstatus-core. Transport errors never reach
// the reporters raw: `SourceError` classifies them at the seam, and the
// fetcher turns that into `FetchError` / `RpcError` with the caller's
// purpose attached. The `Display` text of each variant is the diagnostic
// line printed in the report.

use thiserror::Error;

/// Classified failure from a `StatusSource`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The request did not complete within its bound.
    #[error("timed out")]
    Timeout,

    /// The gateway answered with a payload that is not a structured value.
    #[error("malformed reply: {0}")]
    Malformed(String),

    /// Any other transport or call failure.
    #[error("{0}")]
    Failed(String),
}

impl From<gwstatus_api::Error> for SourceError {
    fn from(err: gwstatus_api::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_invalid_payload() {
            Self::Malformed(err.to_string())
        } else {
            Self::Failed(err.to_string())
        }
    }
}

/// Failure of a plain status-point read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Attempt to {purpose} could not be completed.")]
    Timeout { purpose: String },

    #[error("Failed to {purpose}")]
    InvalidResult { purpose: String },

    #[error("Attempt to {purpose} could not be completed ({reason}).")]
    Unavailable { purpose: String, reason: String },
}

/// Failure of a remote procedure call.
///
/// Rendered by the caller, which knows the gateway and item names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcError {
    #[error("call timed out")]
    Timeout,

    #[error("call failed: {reason}")]
    Failed { reason: String },

    #[error("call returned no usable result")]
    InvalidResult,
}

/// Co-indexed columns of one status record disagree in length.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("({expected} {expected_label}, {actual} {actual_label})")]
pub struct InconsistencyError {
    pub expected: usize,
    pub actual: usize,
    pub expected_label: &'static str,
    pub actual_label: &'static str,
}

/// Failure of one rate-table report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("inconsistent rate table {0}")]
    Inconsistent(#[from] InconsistencyError),
}

/// Unified error type for session-level failures.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Gateway name must not be empty")]
    EmptyIdentity,

    #[error("Session is {found}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
