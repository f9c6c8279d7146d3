// gwstatus-api: Async client for gateway status points (plain reads + RPC)

pub mod client;
pub mod error;
pub mod transport;

pub use client::StatusClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
