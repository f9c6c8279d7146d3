//! Connected devices, cached items, and per-item access details.

use std::io::{self, Write};

use tracing::warn;

use super::{DETAIL, DETAIL_DIAGNOSTIC, LIST, SECTION};
use crate::error::{FetchError, RpcError};
use crate::fetcher::StatusFetcher;
use crate::model::{GatewayIdentity, HostEntry, ItemDetail, ItemReport, StringList};
use crate::resolve::{AddressResolver, NameLookup};
use crate::source::StatusSource;

pub struct ConnectionReporter<'a, S, L> {
    fetcher: &'a StatusFetcher<S>,
    resolver: &'a AddressResolver<L>,
}

impl<'a, S: StatusSource, L: NameLookup> ConnectionReporter<'a, S, L> {
    pub fn new(fetcher: &'a StatusFetcher<S>, resolver: &'a AddressResolver<L>) -> Self {
        Self { fetcher, resolver }
    }

    /// Devices the gateway currently talks to, from `<id>:clients`.
    pub async fn list_connected_devices(
        &self,
        identity: &GatewayIdentity,
    ) -> Result<Vec<HostEntry>, FetchError> {
        let list: StringList = self
            .fetcher
            .fetch(&identity.point("clients"), "find IOC connections")
            .await?;
        Ok(list
            .value
            .iter()
            .map(|endpoint| self.resolver.entry(endpoint))
            .collect())
    }

    /// Data items in the gateway cache, from `<id>:cache`.
    pub async fn list_cached_items(
        &self,
        identity: &GatewayIdentity,
    ) -> Result<Vec<String>, FetchError> {
        let list: StringList = self
            .fetcher
            .fetch(&identity.point("cache"), "find PV data")
            .await?;
        Ok(list.value)
    }

    /// Ask `<id>:asTest` who requested `item` and what access applies.
    pub async fn describe_item(
        &self,
        identity: &GatewayIdentity,
        item: &str,
    ) -> Result<ItemReport, RpcError> {
        let detail: ItemDetail = self.fetcher.call(&identity.point("asTest"), item).await?;
        let peer = self.resolver.entry(&detail.peer);

        Ok(ItemReport {
            requested: item.to_owned(),
            name: detail.pv,
            account: detail.account,
            peer,
            access_group: detail.asg,
            access_level: detail.asl,
            permissions: detail.permission,
        })
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Print the connected-device list. `false` means the list could not
    /// be fetched and the gateway should be skipped.
    pub async fn report_devices<W: Write>(
        &self,
        identity: &GatewayIdentity,
        out: &mut W,
    ) -> io::Result<bool> {
        let devices = match self.list_connected_devices(identity).await {
            Ok(devices) => devices,
            Err(err) => {
                writeln!(out, "{SECTION}{err}")?;
                return Ok(false);
            }
        };

        if devices.is_empty() {
            writeln!(out, "{SECTION}No IOCs currently accessed")?;
        } else {
            writeln!(out, "{SECTION}Access to {} IOCs:", devices.len())?;
        }
        for device in &devices {
            writeln!(out, "{LIST}{}", device.display_name)?;
        }
        Ok(true)
    }

    /// Print the cached-item list with the access details of each item.
    ///
    /// A detail failure is printed under its item and the loop moves on;
    /// only a failure to fetch the list itself returns `false`.
    pub async fn report_items<W: Write>(
        &self,
        identity: &GatewayIdentity,
        out: &mut W,
    ) -> io::Result<bool> {
        let items = match self.list_cached_items(identity).await {
            Ok(items) => items,
            Err(err) => {
                writeln!(out, "{SECTION}{err}")?;
                return Ok(false);
            }
        };

        if items.is_empty() {
            writeln!(out, "{SECTION}No PVs currently accessed")?;
        } else {
            writeln!(out, "{SECTION}Access to {} PVs:", items.len())?;
        }
        for item in &items {
            writeln!(out, "{LIST}{item}")?;
            match self.describe_item(identity, item).await {
                Ok(report) => render_item(&report, out)?,
                Err(err) => render_detail_failure(identity, item, &err, out)?,
            }
        }
        Ok(true)
    }
}

fn render_item<W: Write>(report: &ItemReport, out: &mut W) -> io::Result<()> {
    if let Some(found) = report.name_mismatch() {
        warn!(requested = %report.requested, found, "gateway answered for a different item");
        writeln!(
            out,
            "{DETAIL_DIAGNOSTIC}<<Software Error>> Requested '{}' details but found '{found}'.  Attempting to continue.",
            report.requested
        )?;
    }

    writeln!(
        out,
        "{DETAIL}requested by: {} on {}",
        report.account, report.peer.display_name
    )?;
    writeln!(
        out,
        "{DETAIL}ASG applied: {} (ASL {})",
        report.access_group, report.access_level
    )?;
    writeln!(
        out,
        "{DETAIL}PUT operations are {}allowed",
        if report.permissions.can_put { "" } else { "NOT " }
    )?;
    writeln!(
        out,
        "{DETAIL}RPC operations are {}allowed",
        if report.permissions.can_rpc { "" } else { "NOT " }
    )
}

fn render_detail_failure<W: Write>(
    identity: &GatewayIdentity,
    item: &str,
    err: &RpcError,
    out: &mut W,
) -> io::Result<()> {
    match err {
        RpcError::Timeout => writeln!(
            out,
            "{DETAIL_DIAGNOSTIC}Cannot access gateway '{identity}' for details on '{item}'"
        ),
        RpcError::Failed { reason } => {
            warn!(%identity, item, %reason, "detail call failed");
            writeln!(out, "{DETAIL_DIAGNOSTIC}Cannot retrieve details for '{item}'")
        }
        RpcError::InvalidResult => writeln!(
            out,
            "{DETAIL_DIAGNOSTIC}No details available for '{item}' from gateway '{identity}'"
        ),
    }
}
