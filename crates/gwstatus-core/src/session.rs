// ── Gateway status session ──
//
// Drives the report for one gateway name:
//
//   Unconfigured → Named → Probed(reachable | unreachable) → Reported
//
// An unreachable gateway ends at Probed; the driver moves on to the next
// name with a fresh session. There is no retry between states.

use std::io::Write;

use tracing::{debug, info};

use crate::config::ReportConfig;
use crate::context::StatusContext;
use crate::error::CoreError;
use crate::model::GatewayIdentity;
use crate::report::{
    ConnectionReporter, Direction, RateCategory, RateReporter, Sense, TableKind,
};
use crate::report::{LIST, SECTION};
use crate::resolve::NameLookup;
use crate::source::StatusSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconfigured,
    Named,
    Probed { reachable: bool },
    Reported,
}

impl SessionState {
    fn label(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Named => "named",
            Self::Probed { reachable: true } => "probed (reachable)",
            Self::Probed { reachable: false } => "probed (unreachable)",
            Self::Reported => "reported",
        }
    }
}

/// How far one gateway's report got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The device listing failed; nothing else was asked.
    Unreachable,
    /// The item listing failed after the device listing succeeded.
    Partial,
    /// Every section was attempted.
    Complete,
}

/// Rate sections in report order: table kind, then legs with their
/// primary and reverse categories.
const RATE_SECTIONS: [(TableKind, &str); 2] = [
    (TableKind::Host, "Client and IOC Transfer Rates :"),
    (TableKind::Item, "PV Transfer Rates:"),
];

const RATE_LEGS: [(&str, [RateCategory; 2]); 2] = [
    (
        "Gateway's Server Side:",
        [
            RateCategory::new(Direction::Downstream, Sense::Transmit),
            RateCategory::new(Direction::Downstream, Sense::Receive),
        ],
    ),
    (
        "Gateway's Client Side:",
        [
            RateCategory::new(Direction::Upstream, Sense::Receive),
            RateCategory::new(Direction::Upstream, Sense::Transmit),
        ],
    ),
];

pub struct GatewayStatusSession<'a, S, L> {
    context: &'a StatusContext<S, L>,
    config: &'a ReportConfig,
    identity: Option<GatewayIdentity>,
    state: SessionState,
}

impl<'a, S: StatusSource, L: NameLookup> GatewayStatusSession<'a, S, L> {
    pub fn new(context: &'a StatusContext<S, L>, config: &'a ReportConfig) -> Self {
        Self {
            context,
            config,
            identity: None,
            state: SessionState::Unconfigured,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn identity(&self) -> Option<&GatewayIdentity> {
        self.identity.as_ref()
    }

    fn expect(&self, expected: SessionState) -> Result<(), CoreError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidState {
                expected: expected.label(),
                found: self.state.label(),
            })
        }
    }

    /// Fix the gateway this session reports on and print its header.
    pub fn set_identity<W: Write>(
        &mut self,
        identity: GatewayIdentity,
        out: &mut W,
    ) -> Result<(), CoreError> {
        self.expect(SessionState::Unconfigured)?;

        info!(gateway = %identity, "reporting gateway status");
        writeln!(out, "Gateway {identity}:")?;

        self.identity = Some(identity);
        self.state = SessionState::Named;
        Ok(())
    }

    /// List connected devices; a failed listing marks the gateway
    /// unreachable.
    pub async fn probe<W: Write>(&mut self, out: &mut W) -> Result<bool, CoreError> {
        self.expect(SessionState::Named)?;
        let Some(identity) = self.identity.as_ref() else {
            return Err(CoreError::InvalidState {
                expected: SessionState::Named.label(),
                found: self.state.label(),
            });
        };

        let connections = ConnectionReporter::new(&self.context.fetcher, &self.context.resolver);
        let reachable = connections.report_devices(identity, out).await?;
        if !reachable {
            info!(gateway = %identity, "gateway unreachable, skipping");
        }

        self.state = SessionState::Probed { reachable };
        Ok(reachable)
    }

    /// Cached items, then every rate section in fixed order.
    ///
    /// Returns `false` when the item listing failed and the rate sections
    /// were skipped.
    pub async fn report<W: Write>(&mut self, out: &mut W) -> Result<bool, CoreError> {
        self.expect(SessionState::Probed { reachable: true })?;
        let Some(identity) = self.identity.as_ref() else {
            return Err(CoreError::InvalidState {
                expected: SessionState::Named.label(),
                found: self.state.label(),
            });
        };

        let connections = ConnectionReporter::new(&self.context.fetcher, &self.context.resolver);
        let listed = connections.report_items(identity, out).await?;

        if listed {
            let rates = RateReporter::new(&self.context.fetcher, &self.context.resolver);
            for (kind, title) in RATE_SECTIONS {
                writeln!(out, "{SECTION}{title}")?;
                let limit = self.config.limits.for_table(kind);

                for (leg, categories) in RATE_LEGS {
                    writeln!(out, "{LIST}{leg}")?;
                    for category in categories {
                        if category.is_reverse() && !self.config.show_request_rates {
                            debug!(?category, "reverse rates not requested");
                            continue;
                        }
                        rates.report(identity, kind, category, limit, out).await?;
                    }
                }
            }
        }

        self.state = SessionState::Reported;
        Ok(listed)
    }

    /// Run the whole sequence for `identity`.
    pub async fn run<W: Write>(
        &mut self,
        identity: GatewayIdentity,
        out: &mut W,
    ) -> Result<SessionOutcome, CoreError> {
        self.set_identity(identity, out)?;

        if !self.probe(out).await? {
            return Ok(SessionOutcome::Unreachable);
        }

        if self.report(out).await? {
            Ok(SessionOutcome::Complete)
        } else {
            Ok(SessionOutcome::Partial)
        }
    }
}
