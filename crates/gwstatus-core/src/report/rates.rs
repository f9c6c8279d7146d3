//! Byte-rate tables.
//!
//! Gateways publish eight rate tables: `{ds,us} × {byhost,bypv} × {tx,rx}`.
//! A [`RateCategory`] picks direction and sense, a [`TableKind`] picks hosts
//! or items; together they name the status point, the fetch purpose, and the
//! sentence each row is printed with.

use std::io::{self, Write};

use tracing::debug;

use super::{DETAIL, LIST, format_rate};
use crate::error::RateError;
use crate::fetcher::StatusFetcher;
use crate::model::{GatewayIdentity, HostRateColumns, HostRateTable, ItemRateTable, RateEntry};
use crate::resolve::{AddressResolver, NameLookup};
use crate::source::StatusSource;
use crate::validate::check_equal_lengths;

// ── Categories ───────────────────────────────────────────────────────

/// Which leg of the gateway the traffic is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the clients consuming data from the gateway (`us`).
    Upstream,
    /// Toward the devices the gateway forwards requests to (`ds`).
    Downstream,
}

impl Direction {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Upstream => "us",
            Self::Downstream => "ds",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Transmit,
    Receive,
}

impl Sense {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Transmit => "tx",
            Self::Receive => "rx",
        }
    }
}

/// Rows keyed by endpoint or by data item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Host,
    Item,
}

impl TableKind {
    pub fn marker(self) -> &'static str {
        match self {
            Self::Host => "byhost",
            Self::Item => "bypv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateCategory {
    pub direction: Direction,
    pub sense: Sense,
}

impl RateCategory {
    pub const fn new(direction: Direction, sense: Sense) -> Self {
        Self { direction, sense }
    }

    /// `<id>:<ds|us>:<byhost|bypv>:<tx|rx>`
    pub fn point_name(self, identity: &GatewayIdentity, kind: TableKind) -> String {
        identity.point(&format!(
            "{}:{}:{}",
            self.direction.marker(),
            kind.marker(),
            self.sense.marker()
        ))
    }

    /// What a failed fetch of this table was trying to do.
    pub fn purpose(self, kind: TableKind) -> String {
        let peers = match (kind, self.direction) {
            (TableKind::Host, Direction::Downstream) => "IOCs",
            (TableKind::Item, Direction::Downstream) => "PVs",
            (_, Direction::Upstream) => "connected clients",
        };
        let what = match kind {
            TableKind::Host => "",
            TableKind::Item => "PV ",
        };
        match self.sense {
            Sense::Transmit => format!("retrieve {what}transmission rates to {peers}"),
            Sense::Receive => format!("retrieve {what}reception rates from {peers}"),
        }
    }

    /// Request traffic shown only with `-r`: receive on the server leg,
    /// transmit on the client leg.
    pub fn is_reverse(self) -> bool {
        matches!(
            (self.direction, self.sense),
            (Direction::Downstream, Sense::Receive) | (Direction::Upstream, Sense::Transmit)
        )
    }
}

/// One report line for a rate row. `subject` is already display-ready.
fn sentence(kind: TableKind, category: RateCategory, entry: &RateEntry, subject: &str) -> String {
    let rate = format_rate(entry.rate_bytes_per_second);
    let account = entry.account.as_deref().unwrap_or_default();

    match (kind, category.direction, category.sense) {
        (TableKind::Host, Direction::Downstream, Sense::Transmit) => {
            format!("Gateway transmits {rate} bytes/second  to  {account} on {subject}")
        }
        (TableKind::Host, Direction::Downstream, Sense::Receive) => {
            format!("Gateway receives  {rate} bytes/second from {account} on {subject}")
        }
        (TableKind::Host, Direction::Upstream, Sense::Transmit) => {
            format!("Gateway transmits {rate} bytes/second  to  {subject}")
        }
        (TableKind::Host, Direction::Upstream, Sense::Receive) => {
            format!("Gateway receives  {rate} bytes/second from {subject}")
        }
        (TableKind::Item, Direction::Downstream, Sense::Transmit) => {
            format!("Gateway forwards {rate} bytes/second of {subject} data to clients")
        }
        (TableKind::Item, Direction::Downstream, Sense::Receive) => {
            format!("Gateway requests {rate} bytes/second of {subject} data")
        }
        (TableKind::Item, Direction::Upstream, Sense::Transmit) => {
            format!("Gateway sends {rate} bytes/second to request {subject} data")
        }
        (TableKind::Item, Direction::Upstream, Sense::Receive) => {
            format!("Gateway receives {rate} bytes/second of {subject} data")
        }
    }
}

// ── Reporter ─────────────────────────────────────────────────────────

pub struct RateReporter<'a, S, L> {
    fetcher: &'a StatusFetcher<S>,
    resolver: &'a AddressResolver<L>,
}

impl<'a, S: StatusSource, L: NameLookup> RateReporter<'a, S, L> {
    pub fn new(fetcher: &'a StatusFetcher<S>, resolver: &'a AddressResolver<L>) -> Self {
        Self { fetcher, resolver }
    }

    /// Fetch and validate a host table. Rows keep the published order and
    /// raw endpoints.
    pub async fn host_rates(
        &self,
        identity: &GatewayIdentity,
        category: RateCategory,
    ) -> Result<Vec<RateEntry>, RateError> {
        let name = category.point_name(identity, TableKind::Host);
        let table: HostRateTable = self
            .fetcher
            .fetch(&name, &category.purpose(TableKind::Host))
            .await?;
        let HostRateColumns {
            name: hosts,
            rate,
            account,
        } = table.value;

        let with_accounts = category.direction == Direction::Downstream;
        let mut columns = vec![("hosts", hosts.len()), ("speeds", rate.len())];
        if with_accounts {
            columns.push(("accounts", account.len()));
        }
        check_equal_lengths(&columns)?;

        let mut accounts = account.into_iter();
        Ok(hosts
            .into_iter()
            .zip(rate)
            .map(|(subject, rate_bytes_per_second)| RateEntry {
                subject,
                account: if with_accounts { accounts.next() } else { None },
                rate_bytes_per_second,
            })
            .collect())
    }

    /// Fetch and validate an item table.
    pub async fn item_rates(
        &self,
        identity: &GatewayIdentity,
        category: RateCategory,
    ) -> Result<Vec<RateEntry>, RateError> {
        let name = category.point_name(identity, TableKind::Item);
        let table: ItemRateTable = self
            .fetcher
            .fetch(&name, &category.purpose(TableKind::Item))
            .await?;
        let columns = table.value;

        check_equal_lengths(&[("PVs", columns.name.len()), ("speeds", columns.rate.len())])?;

        Ok(columns
            .name
            .into_iter()
            .zip(columns.rate)
            .map(|(subject, rate_bytes_per_second)| RateEntry {
                subject,
                account: None,
                rate_bytes_per_second,
            })
            .collect())
    }

    /// Print one rate table, at most `limit` rows.
    ///
    /// Returns `false` when the table could not be shown; the failure has
    /// already been printed in its place.
    pub async fn report<W: Write>(
        &self,
        identity: &GatewayIdentity,
        kind: TableKind,
        category: RateCategory,
        limit: usize,
        out: &mut W,
    ) -> io::Result<bool> {
        let rows = match kind {
            TableKind::Host => self.host_rates(identity, category).await,
            TableKind::Item => self.item_rates(identity, category).await,
        };

        let rows = match rows {
            Ok(rows) => rows,
            Err(RateError::Fetch(err)) => {
                writeln!(out, "{DETAIL}{err}")?;
                return Ok(false);
            }
            Err(RateError::Inconsistent(err)) => {
                match kind {
                    TableKind::Host => writeln!(
                        out,
                        "{DETAIL}Software Error: data rate details are inconsistent. {err}"
                    )?,
                    TableKind::Item => writeln!(
                        out,
                        "{LIST}Software Error: PV data rate details are inconsistent. {err}"
                    )?,
                }
                return Ok(false);
            }
        };

        if rows.len() > limit {
            debug!(
                point = %category.point_name(identity, kind),
                available = rows.len(),
                limit,
                "truncating rate table"
            );
        }

        for entry in rows.iter().take(limit) {
            let subject = match kind {
                TableKind::Host => self.resolver.resolve(&entry.subject),
                TableKind::Item => entry.subject.clone(),
            };
            writeln!(out, "{DETAIL}{}", sentence(kind, category, entry, &subject))?;
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::error::{FetchError, InconsistencyError};
    use crate::testing::{FakeSource, Reply, StaticLookup};

    const DS_TX: RateCategory = RateCategory::new(Direction::Downstream, Sense::Transmit);
    const DS_RX: RateCategory = RateCategory::new(Direction::Downstream, Sense::Receive);
    const US_TX: RateCategory = RateCategory::new(Direction::Upstream, Sense::Transmit);
    const US_RX: RateCategory = RateCategory::new(Direction::Upstream, Sense::Receive);

    fn gw() -> GatewayIdentity {
        GatewayIdentity::new("gw").unwrap()
    }

    fn lookup() -> AddressResolver<StaticLookup> {
        AddressResolver::new(
            StaticLookup::default()
                .with([10, 0, 0, 1], "ioc1")
                .with([10, 0, 0, 2], "ioc2"),
        )
    }

    async fn render(
        source: FakeSource,
        kind: TableKind,
        category: RateCategory,
        limit: usize,
    ) -> (bool, String) {
        let fetcher = StatusFetcher::new(source);
        let resolver = lookup();
        let reporter = RateReporter::new(&fetcher, &resolver);
        let mut out = Vec::new();
        let shown = reporter
            .report(&gw(), kind, category, limit, &mut out)
            .await
            .unwrap();
        (shown, String::from_utf8(out).unwrap())
    }

    fn item_table(count: usize) -> serde_json::Value {
        let names: Vec<String> = (0..count).map(|i| format!("PV{i}")).collect();
        let rates: Vec<f64> = (0..count).map(|i| f64::from(u32::try_from(i).unwrap())).collect();
        json!({ "value": { "name": names, "rate": rates } })
    }

    #[test]
    fn point_names_follow_the_markers() {
        assert_eq!(DS_TX.point_name(&gw(), TableKind::Host), "gw:ds:byhost:tx");
        assert_eq!(US_RX.point_name(&gw(), TableKind::Item), "gw:us:bypv:rx");
    }

    #[test]
    fn purposes_read_naturally() {
        assert_eq!(
            DS_TX.purpose(TableKind::Host),
            "retrieve transmission rates to IOCs"
        );
        assert_eq!(
            US_RX.purpose(TableKind::Item),
            "retrieve PV reception rates from connected clients"
        );
    }

    #[test]
    fn reverse_categories() {
        assert!(DS_RX.is_reverse());
        assert!(US_TX.is_reverse());
        assert!(!DS_TX.is_reverse());
        assert!(!US_RX.is_reverse());
    }

    #[tokio::test(start_paused = true)]
    async fn downstream_host_rows_pair_account_and_host() {
        let source = FakeSource::new().point(
            "gw:ds:byhost:tx",
            json!({ "value": {
                "name": ["10.0.0.1:5064", "10.0.0.2:5064"],
                "rate": [1024.0, 12.5],
                "account": ["alice", "bob"]
            }}),
        );

        let (shown, text) = render(source, TableKind::Host, DS_TX, usize::MAX).await;

        assert!(shown);
        assert_eq!(
            text,
            "            Gateway transmits 1024 bytes/second  to  alice on ioc1\n\
             \x20           Gateway transmits 12.5 bytes/second  to  bob on ioc2\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn upstream_host_rows_have_no_account() {
        let source = FakeSource::new().point(
            "gw:us:byhost:rx",
            json!({ "value": { "name": ["10.0.0.1"], "rate": [3.0] } }),
        );

        let (_, text) = render(source, TableKind::Host, US_RX, usize::MAX).await;

        assert_eq!(text, "            Gateway receives  3 bytes/second from ioc1\n");
    }

    #[tokio::test(start_paused = true)]
    async fn item_rows_are_not_resolved() {
        let source = FakeSource::new().point(
            "gw:us:bypv:tx",
            json!({ "value": { "name": ["10.0.0.1"], "rate": [0.5] } }),
        );

        let (_, text) = render(source, TableKind::Item, US_TX, usize::MAX).await;

        assert_eq!(
            text,
            "            Gateway sends 0.5 bytes/second to request 10.0.0.1 data\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn equal_columns_give_one_line_per_row_in_order() {
        let source = FakeSource::new().point("gw:ds:bypv:tx", item_table(6));

        let (_, text) = render(source, TableKind::Item, DS_TX, usize::MAX).await;
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(
                *line,
                format!("            Gateway forwards {i} bytes/second of PV{i} data to clients")
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn limit_keeps_the_first_rows() {
        let source = FakeSource::new().point("gw:ds:bypv:rx", item_table(10));

        let (_, text) = render(source, TableKind::Item, DS_RX, 3).await;

        assert_eq!(
            text,
            "            Gateway requests 0 bytes/second of PV0 data\n\
             \x20           Gateway requests 1 bytes/second of PV1 data\n\
             \x20           Gateway requests 2 bytes/second of PV2 data\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn limit_above_available_shows_everything() {
        let source = FakeSource::new().point("gw:us:bypv:rx", item_table(2));

        let (_, text) = render(source, TableKind::Item, US_RX, 5).await;

        assert_eq!(text.lines().count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn mismatched_columns_emit_one_diagnostic_and_no_rows() {
        let source = FakeSource::new().point(
            "gw:us:byhost:tx",
            json!({ "value": { "name": ["10.0.0.1", "10.0.0.2", "10.0.0.3"], "rate": [1.0, 2.0] } }),
        );

        let (shown, text) = render(source, TableKind::Host, US_TX, usize::MAX).await;

        assert!(!shown);
        assert_eq!(
            text,
            "            Software Error: data rate details are inconsistent. (3 hosts, 2 speeds)\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn short_account_column_fails_downstream_only() {
        let table = json!({ "value": {
            "name": ["10.0.0.1", "10.0.0.2"],
            "rate": [1.0, 2.0],
            "account": ["alice"]
        }});
        let source = FakeSource::new()
            .point("gw:ds:byhost:rx", table.clone())
            .point("gw:us:byhost:rx", table);
        let fetcher = StatusFetcher::new(source);
        let resolver = lookup();
        let reporter = RateReporter::new(&fetcher, &resolver);

        let downstream = reporter.host_rates(&gw(), DS_RX).await;
        let upstream = reporter.host_rates(&gw(), US_RX).await.unwrap();

        assert_eq!(
            downstream.unwrap_err(),
            RateError::Inconsistent(InconsistencyError {
                expected: 2,
                actual: 1,
                expected_label: "hosts",
                actual_label: "accounts",
            })
        );
        assert_eq!(upstream.len(), 2);
        assert!(upstream.iter().all(|row| row.account.is_none()));
    }

    #[tokio::test(start_paused = true)]
    async fn mismatched_item_columns() {
        let source = FakeSource::new().point(
            "gw:ds:bypv:tx",
            json!({ "value": { "name": ["A"], "rate": [1.0, 2.0] } }),
        );

        let (shown, text) = render(source, TableKind::Item, DS_TX, usize::MAX).await;

        assert!(!shown);
        assert_eq!(
            text,
            "        Software Error: PV data rate details are inconsistent. (1 PVs, 2 speeds)\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_failure_is_printed_in_place() {
        let source = FakeSource::new().reply("gw:ds:byhost:tx", Reply::Hang);

        let (shown, text) = render(source, TableKind::Host, DS_TX, usize::MAX).await;

        assert!(!shown);
        assert_eq!(
            text,
            "            Attempt to retrieve transmission rates to IOCs could not be completed.\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn empty_table_is_not_an_error() {
        let source = FakeSource::new().point("gw:us:bypv:rx", item_table(0));
        let fetcher = StatusFetcher::new(source);
        let resolver = lookup();
        let reporter = RateReporter::new(&fetcher, &resolver);

        assert_eq!(reporter.item_rates(&gw(), US_RX).await, Ok(Vec::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_table_surfaces_as_fetch_error() {
        let source = FakeSource::new().point("gw:us:bypv:rx", json!({ "value": [] }));
        let fetcher = StatusFetcher::new(source);
        let resolver = lookup();
        let reporter = RateReporter::new(&fetcher, &resolver);

        assert_eq!(
            reporter.item_rates(&gw(), US_RX).await,
            Err(RateError::Fetch(FetchError::InvalidResult {
                purpose: "retrieve PV reception rates from connected clients".into()
            }))
        );
    }
}
