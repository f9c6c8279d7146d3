// ── Shared per-run context ──
//
// Built once per process and borrowed by every gateway session: one
// transport, one name service.

use crate::fetcher::StatusFetcher;
use crate::resolve::AddressResolver;
use crate::source::StatusSource;

pub struct StatusContext<S, L> {
    pub fetcher: StatusFetcher<S>,
    pub resolver: AddressResolver<L>,
}

impl<S: StatusSource, L> StatusContext<S, L> {
    pub fn new(source: S, resolver: AddressResolver<L>) -> Self {
        Self {
            fetcher: StatusFetcher::new(source),
            resolver,
        }
    }
}
