//! Global error trap and its installation slot.

use crate::types::ErrorEvent;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

use super::sink::{DiagnosticSink, ErrorRecord};

/// Error trap configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapConfig {
    /// Path of the page, used as the record prefix.
    /// Default: "/"
    pub page_path: String,

    /// Ask the host to suppress its default reporting for actionable errors.
    /// Default: false
    pub suppress_default_on_error: bool,
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            page_path: "/".to_string(),
            suppress_default_on_error: false,
        }
    }
}

/// Handler for uncaught runtime errors.
pub struct ErrorTrap {
    config: TrapConfig,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl ErrorTrap {
    /// Create a trap with no diagnostic sink.
    pub fn new(config: TrapConfig) -> Self {
        Self { config, sink: None }
    }

    pub fn with_sink(config: TrapConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            config,
            sink: Some(sink),
        }
    }

    pub fn config(&self) -> &TrapConfig {
        &self.config
    }

    /// Handle an error event. Returns true if the host should suppress its
    /// default handling.
    ///
    /// Line `0` events are ignored and never suppressed. Otherwise the record
    /// goes to the sink (one attempt, failures discarded) and the configured
    /// suppression flag is returned.
    pub fn handle(&self, event: &ErrorEvent) -> bool {
        if !event.is_actionable() {
            trace!(url = %event.url, "ignoring error without location");
            return false;
        }

        if let Some(sink) = &self.sink {
            let record = self.record(event);
            if let Err(e) = sink.log(&record) {
                trace!(error = %e, "diagnostic sink failed");
            }
        }

        self.config.suppress_default_on_error
    }

    fn record(&self, event: &ErrorEvent) -> ErrorRecord {
        ErrorRecord {
            page_path: self.config.page_path.clone(),
            url: event.url.clone(),
            line: event.line,
            message: event.message.clone(),
        }
    }
}

/// The single global slot the host runtime calls on uncaught errors.
///
/// Holds at most one trap; installing replaces the previous occupant, so a
/// repeated install never logs an event twice.
#[derive(Default)]
pub struct ErrorHook {
    slot: RwLock<Option<Arc<ErrorTrap>>>,
}

impl ErrorHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `trap`, returning the trap it replaced.
    pub fn install(&self, trap: Arc<ErrorTrap>) -> Option<Arc<ErrorTrap>> {
        let mut slot = self.slot.write();
        if let Some(current) = &*slot {
            if Arc::ptr_eq(current, &trap) {
                debug!("error trap already installed");
                return None;
            }
        }
        debug!(replacing = slot.is_some(), "installing error trap");
        slot.replace(trap)
    }

    pub fn uninstall(&self) -> Option<Arc<ErrorTrap>> {
        self.slot.write().take()
    }

    pub fn is_installed(&self) -> bool {
        self.slot.read().is_some()
    }

    /// Entry point for the host. With no trap installed, returns false.
    pub fn dispatch(&self, event: &ErrorEvent) -> bool {
        let trap = self.slot.read().clone();
        match trap {
            Some(trap) => trap.handle(event),
            None => false,
        }
    }
}
