//! Store capability, handlers and bus configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Capability set every store registered on a bus must provide.
///
/// The bus forwards each call verbatim; fire-once semantics of `one` and
/// handler bookkeeping belong to the store.
pub trait Store: Send + Sync {
    /// Register `handler` for `event`.
    fn on(&self, event: &str, handler: Handler) -> Result<()>;

    /// Register `handler` for a single delivery of `event`.
    fn one(&self, event: &str, handler: Handler) -> Result<()>;

    /// Remove `handler` from `event`.
    fn off(&self, event: &str, handler: &Handler) -> Result<()>;

    /// Publish `event` with `args`.
    fn trigger(&self, event: &str, args: &[Value]) -> Result<()>;
}

type HandlerFn = dyn Fn(&[Value]) -> Result<()> + Send + Sync;

/// A shared event callback.
///
/// Clones compare equal; two handlers built from separate `new` calls never
/// do, even if built from the same closure. `off` relies on this identity.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<()> + Send + Sync + 'static,
    {
        Handler(Arc::new(f))
    }

    pub fn call(&self, args: &[Value]) -> Result<()> {
        (self.0)(args)
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", self.addr())
    }
}

/// What a broadcast does when a store returns an error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPolicy {
    /// Stop at the first failing store and return its error.
    #[default]
    FailFast,
    /// Visit every store, then report all failures together.
    Isolate,
}

/// Configuration for a [`ControlBus`](super::ControlBus).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Failure handling during broadcast.
    /// Default: `FailFast`
    pub delivery: DeliveryPolicy,
}
