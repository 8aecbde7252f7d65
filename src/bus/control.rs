//! Control bus fanning store calls out to every registered store.

use crate::error::{BootstrapError, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

use super::types::{BusConfig, DeliveryPolicy, Handler, Store};

/// Broadcasts `on`/`one`/`off`/`trigger` to a dynamic set of stores.
///
/// Stores are visited in registration order. A broadcast works on the set
/// registered when it started; the registry lock is released before any
/// store runs, so stores may call back into the bus.
pub struct ControlBus {
    /// Registered stores, in registration order.
    stores: RwLock<Vec<Arc<dyn Store>>>,
    config: BusConfig,
}

impl ControlBus {
    /// Create an empty bus with fail-fast delivery.
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    pub fn with_config(config: BusConfig) -> Self {
        Self {
            stores: RwLock::new(Vec::new()),
            config,
        }
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Append a store. A store added twice receives every broadcast twice.
    pub fn add_store(&self, store: Arc<dyn Store>) {
        let mut stores = self.stores.write();
        stores.push(store);
        debug!(stores = stores.len(), "store added to control bus");
    }

    /// Detach every store.
    pub fn reset(&self) {
        let mut stores = self.stores.write();
        if !stores.is_empty() {
            debug!(stores = stores.len(), "control bus reset");
        }
        stores.clear();
    }

    /// Number of registrations (duplicates counted).
    pub fn store_count(&self) -> usize {
        self.stores.read().len()
    }

    pub fn on(&self, event: &str, handler: Handler) -> Result<()> {
        self.broadcast("on", event, |store| store.on(event, handler.clone()))
    }

    pub fn one(&self, event: &str, handler: Handler) -> Result<()> {
        self.broadcast("one", event, |store| store.one(event, handler.clone()))
    }

    pub fn off(&self, event: &str, handler: &Handler) -> Result<()> {
        self.broadcast("off", event, |store| store.off(event, handler))
    }

    pub fn trigger(&self, event: &str, args: &[Value]) -> Result<()> {
        self.broadcast("trigger", event, |store| store.trigger(event, args))
    }

    /// Internal broadcast helper.
    fn broadcast<F>(&self, op: &'static str, event: &str, call: F) -> Result<()>
    where
        F: Fn(&dyn Store) -> Result<()>,
    {
        let stores = self.stores.read().clone();
        trace!(op, event, stores = stores.len(), "broadcast");

        match self.config.delivery {
            DeliveryPolicy::FailFast => {
                for (index, store) in stores.iter().enumerate() {
                    if let Err(e) = call(store.as_ref()) {
                        debug!(op, event, index, error = %e, "broadcast aborted");
                        return Err(e);
                    }
                }
                Ok(())
            }
            DeliveryPolicy::Isolate => {
                let mut failures = Vec::new();
                for (index, store) in stores.iter().enumerate() {
                    if let Err(e) = call(store.as_ref()) {
                        debug!(op, event, index, error = %e, "store failed, continuing");
                        failures.push(e);
                    }
                }
                if failures.is_empty() {
                    Ok(())
                } else {
                    Err(BootstrapError::Delivery {
                        event: event.to_string(),
                        failures,
                    })
                }
            }
        }
    }
}

impl Default for ControlBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A bus is itself a store, so buses can be nested.
impl Store for ControlBus {
    fn on(&self, event: &str, handler: Handler) -> Result<()> {
        ControlBus::on(self, event, handler)
    }

    fn one(&self, event: &str, handler: Handler) -> Result<()> {
        ControlBus::one(self, event, handler)
    }

    fn off(&self, event: &str, handler: &Handler) -> Result<()> {
        ControlBus::off(self, event, handler)
    }

    fn trigger(&self, event: &str, args: &[Value]) -> Result<()> {
        ControlBus::trigger(self, event, args)
    }
}
