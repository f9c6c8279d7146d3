// gwstatus-core: Status-record retrieval, validation, and text reports for
// process-control gateways. The transport sits behind `StatusSource`.

pub mod config;
pub mod context;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod report;
pub mod resolve;
pub mod session;
pub mod source;
pub mod validate;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{FETCH_TIMEOUT, ReportConfig, ReportLimits};
pub use context::StatusContext;
pub use error::{CoreError, FetchError, InconsistencyError, RateError, RpcError, SourceError};
pub use fetcher::StatusFetcher;
pub use resolve::{AddressResolver, NameLookup, SystemLookup, UNKNOWN_HOST};
pub use session::{GatewayStatusSession, SessionOutcome, SessionState};
pub use source::StatusSource;

pub use model::{
    // Identity
    GatewayIdentity,
    // Rows and reports
    HostEntry, ItemReport, RateEntry,
};
pub use report::{Direction, RateCategory, Sense, TableKind, format_rate};
