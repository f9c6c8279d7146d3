//! Bounded, classified access to status points.
//!
//! Every read and call gets one attempt with a [`FETCH_TIMEOUT`] bound and
//! is decoded straight into the schema type the caller asks for.

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::FETCH_TIMEOUT;
use crate::error::{FetchError, RpcError, SourceError};
use crate::source::StatusSource;

pub struct StatusFetcher<S> {
    source: S,
}

impl<S: StatusSource> StatusFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read `name` and decode it as `T`.
    ///
    /// `purpose` describes what the caller was trying to do and only shows up
    /// in the error ("find IOC connections").
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        name: &str,
        purpose: &str,
    ) -> Result<T, FetchError> {
        debug!(point = name, "fetching status record");

        let value = match tokio::time::timeout(FETCH_TIMEOUT, self.source.get(name)).await {
            Ok(Ok(value)) => value,
            Err(_) | Ok(Err(SourceError::Timeout)) => {
                return Err(FetchError::Timeout {
                    purpose: purpose.into(),
                });
            }
            Ok(Err(SourceError::Malformed(_))) => {
                return Err(FetchError::InvalidResult {
                    purpose: purpose.into(),
                });
            }
            Ok(Err(SourceError::Failed(reason))) => {
                return Err(FetchError::Unavailable {
                    purpose: purpose.into(),
                    reason,
                });
            }
        };

        decode(name, value).ok_or_else(|| FetchError::InvalidResult {
            purpose: purpose.into(),
        })
    }

    /// Call `name` with a single `pv` argument and decode the reply as `T`.
    pub async fn call<T: DeserializeOwned>(&self, name: &str, pv: &str) -> Result<T, RpcError> {
        debug!(point = name, pv, "calling status point");

        let args = json!({ "pv": pv });
        let value = match tokio::time::timeout(FETCH_TIMEOUT, self.source.rpc(name, &args)).await
        {
            Ok(Ok(value)) => value,
            Err(_) | Ok(Err(SourceError::Timeout)) => return Err(RpcError::Timeout),
            Ok(Err(SourceError::Malformed(_))) => return Err(RpcError::InvalidResult),
            Ok(Err(SourceError::Failed(reason))) => return Err(RpcError::Failed { reason }),
        };

        decode(name, value).ok_or(RpcError::InvalidResult)
    }
}

fn decode<T: DeserializeOwned>(name: &str, value: Value) -> Option<T> {
    if value.is_null() {
        debug!(point = name, "empty status record");
        return None;
    }
    serde_json::from_value(value)
        .map_err(|err| debug!(point = name, %err, "status record does not match schema"))
        .ok()
}
