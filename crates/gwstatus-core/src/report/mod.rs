// Text reports for one gateway.
//
// Lines are written to any `io::Write`; indentation mirrors nesting so a
// failed sub-query shows up right where its data would have been.

pub mod connections;
pub mod format;
pub mod rates;

pub use connections::ConnectionReporter;
pub use format::format_rate;
pub use rates::{Direction, RateCategory, RateReporter, Sense, TableKind};

/// Section lines and list headers.
pub(crate) const SECTION: &str = "    ";
/// Sub-section headers and list members.
pub(crate) const LIST: &str = "        ";
/// Per-item detail lines and rate rows.
pub(crate) const DETAIL: &str = "            ";
/// Per-item detail diagnostics sit just left of the detail column.
pub(crate) const DETAIL_DIAGNOSTIC: &str = "       ";
