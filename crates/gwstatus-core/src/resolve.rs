//! Endpoint to host-name resolution.
//!
//! Gateways publish peers as raw IPv4 endpoints (`10.0.0.5:5064`). The
//! resolver turns them into names an operator recognizes and never fails:
//! anything it cannot resolve is shown as published.

use std::net::{IpAddr, Ipv4Addr};

use tracing::trace;

use crate::model::HostEntry;

/// Shown for an endpoint the gateway published as an empty string.
pub const UNKNOWN_HOST: &str = "<unknown>";

/// Numeric-address-to-name service.
pub trait NameLookup {
    /// Reverse-resolve `addr`, or `None` when no name is known.
    fn reverse(&self, addr: Ipv4Addr) -> Option<String>;
}

/// The operating system's resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLookup;

impl NameLookup for SystemLookup {
    fn reverse(&self, addr: Ipv4Addr) -> Option<String> {
        match dns_lookup::lookup_addr(&IpAddr::V4(addr)) {
            // getnameinfo hands back the numeric form when no PTR record exists
            Ok(name) if !name.is_empty() && name != addr.to_string() => Some(name),
            Ok(_) => None,
            Err(err) => {
                trace!(%addr, %err, "reverse lookup failed");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AddressResolver<L = SystemLookup> {
    lookup: L,
}

impl AddressResolver<SystemLookup> {
    pub fn system() -> Self {
        Self::new(SystemLookup)
    }
}

impl<L: NameLookup> AddressResolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Display name for `endpoint`.
    ///
    /// Drops everything from the first `':'` on, reverse-resolves the
    /// remaining IPv4 address, and falls back to `endpoint` unchanged.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.is_empty() {
            return UNKNOWN_HOST.into();
        }

        let host = endpoint.split_once(':').map_or(endpoint, |(host, _port)| host);

        host.parse::<Ipv4Addr>()
            .ok()
            .and_then(|addr| self.lookup.reverse(addr))
            .unwrap_or_else(|| endpoint.to_owned())
    }

    pub fn entry(&self, endpoint: &str) -> HostEntry {
        HostEntry {
            raw_address: endpoint.to_owned(),
            display_name: self.resolve(endpoint),
        }
    }
}
