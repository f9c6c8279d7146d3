// In-memory stand-ins for the transport and the name service.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::Ipv4Addr;

use serde_json::Value;

use crate::error::SourceError;
use crate::resolve::NameLookup;
use crate::source::StatusSource;

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Value(Value),
    Error(SourceError),
    /// Never answers; only a timeout ends the wait.
    Hang,
}

impl Reply {
    async fn answer(&self) -> Result<Value, SourceError> {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Error(err) => Err(err.clone()),
            Self::Hang => std::future::pending().await,
        }
    }
}

/// Status points keyed by full name; `asTest` replies keyed by the `pv`
/// argument. Unknown names fail like an unreachable bridge.
#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    points: HashMap<String, Reply>,
    details: HashMap<String, Reply>,
    calls: RefCell<Vec<String>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn point(self, name: &str, value: Value) -> Self {
        self.reply(name, Reply::Value(value))
    }

    pub(crate) fn reply(mut self, name: &str, reply: Reply) -> Self {
        self.points.insert(name.to_owned(), reply);
        self
    }

    pub(crate) fn detail(mut self, pv: &str, reply: Reply) -> Self {
        self.details.insert(pv.to_owned(), reply);
        self
    }

    /// Every status-point name requested so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl StatusSource for FakeSource {
    async fn get(&self, name: &str) -> Result<Value, SourceError> {
        self.calls.borrow_mut().push(name.to_owned());
        match self.points.get(name) {
            Some(reply) => reply.answer().await,
            None => Err(SourceError::Failed(format!("no status point {name}"))),
        }
    }

    async fn rpc(&self, name: &str, args: &Value) -> Result<Value, SourceError> {
        self.calls.borrow_mut().push(name.to_owned());
        let pv = args["pv"].as_str().unwrap_or_default();
        match self.details.get(pv) {
            Some(reply) => reply.answer().await,
            None => Err(SourceError::Failed(format!("no detail for {pv}"))),
        }
    }
}

/// Fixed reverse-lookup table.
#[derive(Debug, Default)]
pub(crate) struct StaticLookup(HashMap<Ipv4Addr, String>);

impl StaticLookup {
    pub(crate) fn with(mut self, addr: [u8; 4], name: &str) -> Self {
        self.0.insert(Ipv4Addr::from(addr), name.to_owned());
        self
    }
}

impl NameLookup for StaticLookup {
    fn reverse(&self, addr: Ipv4Addr) -> Option<String> {
        self.0.get(&addr).cloned()
    }
}
