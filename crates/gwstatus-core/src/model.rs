// ── Status record schemas and report rows ──
//
// One struct per status-point shape. Records are decoded into these
// immediately on fetch so reporters never touch untyped field maps; a
// missing or mistyped field fails the decode and the fetch reports an
// invalid result.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::CoreError;

// ── Gateway identity ─────────────────────────────────────────────────

/// Name of one gateway instance (its configured status prefix).
///
/// Never empty. Every status point is addressed as `"<name>:<suffix>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GatewayIdentity(String);

impl GatewayIdentity {
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::EmptyIdentity);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full status-point name for `suffix`, e.g. `gw1:clients`.
    pub fn point(&self, suffix: &str) -> String {
        format!("{}:{suffix}", self.0)
    }
}

impl fmt::Display for GatewayIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GatewayIdentity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ── Wire schemas ─────────────────────────────────────────────────────

/// `<id>:clients` and `<id>:cache`: a plain string array.
#[derive(Debug, Clone, Deserialize)]
pub struct StringList {
    pub value: Vec<String>,
}

/// Access-control decisions from the `permission` sub-structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PermissionSet {
    #[serde(rename = "put")]
    pub can_put: bool,
    #[serde(rename = "rpc")]
    pub can_rpc: bool,
}

/// Reply of the `<id>:asTest` call for one data item.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDetail {
    /// Item name as echoed by the gateway.
    pub pv: String,
    pub account: String,
    /// Originating endpoint, IPv4 with optional port.
    pub peer: String,
    /// Access-security group.
    pub asg: String,
    /// Access-security level.
    pub asl: i32,
    pub permission: PermissionSet,
}

/// `<id>:{ds,us}:byhost:{tx,rx}`.
#[derive(Debug, Clone, Deserialize)]
pub struct HostRateTable {
    pub value: HostRateColumns,
}

/// Co-indexed columns of a host rate table. `account` is only published
/// for downstream tables.
#[derive(Debug, Clone, Deserialize)]
pub struct HostRateColumns {
    pub name: Vec<String>,
    pub rate: Vec<f64>,
    #[serde(default)]
    pub account: Vec<String>,
}

/// `<id>:{ds,us}:bypv:{tx,rx}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRateTable {
    pub value: ItemRateColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemRateColumns {
    pub name: Vec<String>,
    pub rate: Vec<f64>,
}

// ── Report rows ──────────────────────────────────────────────────────

/// An endpoint as published and as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub raw_address: String,
    pub display_name: String,
}

/// One row of a rate table.
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    /// Raw endpoint (host tables) or data-item name (item tables).
    pub subject: String,
    /// Requesting account, downstream host tables only.
    pub account: Option<String>,
    pub rate_bytes_per_second: f64,
}

/// Decoded and resolved detail for one cached item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    /// Name the caller asked about.
    pub requested: String,
    /// Name the gateway answered for.
    pub name: String,
    pub account: String,
    pub peer: HostEntry,
    pub access_group: String,
    pub access_level: i32,
    pub permissions: PermissionSet,
}

impl ItemReport {
    /// The echoed name, when it differs from the requested one.
    pub fn name_mismatch(&self) -> Option<&str> {
        (self.name != self.requested).then_some(self.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn identity_rejects_empty_name() {
        assert!(matches!(
            GatewayIdentity::new(""),
            Err(CoreError::EmptyIdentity)
        ));
    }

    #[test]
    fn identity_builds_point_names() {
        let id: GatewayIdentity = "gw1".parse().unwrap();
        assert_eq!(id.point("clients"), "gw1:clients");
        assert_eq!(id.point("ds:byhost:tx"), "gw1:ds:byhost:tx");
        assert_eq!(id.to_string(), "gw1");
    }

    #[test]
    fn item_detail_decodes_nested_permissions() {
        let detail: ItemDetail = serde_json::from_value(json!({
            "pv": "LINAC:BPM1:X",
            "account": "operator",
            "peer": "10.0.0.9:40112",
            "asg": "DEFAULT",
            "asl": 1,
            "permission": { "put": false, "rpc": true }
        }))
        .unwrap();

        assert_eq!(detail.asl, 1);
        assert_eq!(
            detail.permission,
            PermissionSet {
                can_put: false,
                can_rpc: true
            }
        );
    }

    #[test]
    fn item_detail_missing_permission_fails() {
        let result = serde_json::from_value::<ItemDetail>(json!({
            "pv": "X", "account": "a", "peer": "p", "asg": "g", "asl": 0
        }));
        assert!(result.is_err());
    }

    #[test]
    fn upstream_host_table_has_no_accounts() {
        let table: HostRateTable = serde_json::from_value(json!({
            "value": { "name": ["10.0.0.1"], "rate": [12] }
        }))
        .unwrap();
        assert!(table.value.account.is_empty());
        assert!((table.value.rate[0] - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mismatch_is_reported_only_when_names_differ() {
        let mut report = ItemReport {
            requested: "A".into(),
            name: "A".into(),
            account: "op".into(),
            peer: HostEntry {
                raw_address: "10.0.0.1".into(),
                display_name: "ioc1".into(),
            },
            access_group: "DEFAULT".into(),
            access_level: 0,
            permissions: PermissionSet {
                can_put: true,
                can_rpc: true,
            },
        };
        assert_eq!(report.name_mismatch(), None);

        report.name = "B".into();
        assert_eq!(report.name_mismatch(), Some("B"));
    }
}
