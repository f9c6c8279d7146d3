// ── Status source seam ──
//
// The only thing core needs from a transport: read a named status point,
// or invoke one as a remote procedure call, and get back a structured value.

use std::future::Future;

use serde_json::Value;

use gwstatus_api::StatusClient;

use crate::error::SourceError;

/// Request/response access to a gateway's status points.
///
/// Implementations perform exactly one attempt per call. Bounding the wait
/// is the fetcher's job.
pub trait StatusSource {
    /// Read the current value of `name`.
    fn get(&self, name: &str) -> impl Future<Output = Result<Value, SourceError>>;

    /// Invoke `name` with `args` (a JSON object of named arguments).
    fn rpc(&self, name: &str, args: &Value) -> impl Future<Output = Result<Value, SourceError>>;
}

impl StatusSource for StatusClient {
    async fn get(&self, name: &str) -> Result<Value, SourceError> {
        StatusClient::get(self, name).await.map_err(SourceError::from)
    }

    async fn rpc(&self, name: &str, args: &Value) -> Result<Value, SourceError> {
        StatusClient::rpc(self, name, args)
            .await
            .map_err(SourceError::from)
    }
}
