// ── Report configuration ──
//
// What to show and how much of it. Built once by the CLI from its options
// and handed to every session by reference -- core never reads config files
// or process arguments.

use std::time::Duration;

use crate::report::rates::TableKind;

/// Bound applied to every status-point read and RPC call.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Result-count caps for rate tables. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportLimits {
    /// Cap applied to host and item tables alike (`-m`).
    pub global: Option<usize>,
    /// Cap for host-rate tables (`-c`).
    pub hosts: Option<usize>,
    /// Cap for item-rate tables (`-p`).
    pub items: Option<usize>,
}

impl ReportLimits {
    /// Effective row cap for one table kind: the smallest configured cap,
    /// or `usize::MAX` when none applies.
    pub fn for_table(&self, kind: TableKind) -> usize {
        let per_kind = match kind {
            TableKind::Host => self.hosts,
            TableKind::Item => self.items,
        };
        [self.global, per_kind]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(usize::MAX)
    }
}

/// Per-run report settings shared by every gateway session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportConfig {
    /// Also show reverse-direction request rates (`-r`).
    pub show_request_rates: bool,
    pub limits: ReportLimits,
}
