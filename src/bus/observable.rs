//! Reference store with per-event handler lists.

use crate::error::Result;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

use super::types::{Handler, Store};

/// Event name whose listeners receive every event.
pub const WILDCARD: &str = "*";

#[derive(Clone)]
struct Listener {
    handler: Handler,
    once: bool,
}

/// An in-process observable store.
///
/// - Event strings may name several events separated by whitespace
/// - `one` listeners are removed as they run, so each fires exactly once
/// - `*` listeners see every trigger, with the event name prepended to the
///   arguments
/// - Handlers run in registration order; the first error stops the trigger
///
/// Handlers run with no lock held and may register or remove listeners.
/// New listeners apply from the next trigger; a `one` listener removed by an
/// earlier handler is skipped.
#[derive(Default)]
pub struct Observable {
    listeners: Mutex<HashMap<String, Vec<Listener>>>,
}

impl Observable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listeners currently registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.lock().get(event).map_or(0, Vec::len)
    }

    /// Remove every listener for each named event; `*` clears everything.
    pub fn off_all(&self, event: &str) {
        let mut listeners = self.listeners.lock();
        for name in event.split_whitespace() {
            if name == WILDCARD {
                listeners.clear();
            } else {
                listeners.remove(name);
            }
        }
    }

    fn add(&self, event: &str, handler: Handler, once: bool) {
        let mut listeners = self.listeners.lock();
        for name in event.split_whitespace() {
            listeners.entry(name.to_string()).or_default().push(Listener {
                handler: handler.clone(),
                once,
            });
        }
    }

    /// Snapshot of the listeners registered for `name`.
    fn due(&self, name: &str) -> Vec<Listener> {
        self.listeners.lock().get(name).cloned().unwrap_or_default()
    }

    /// Whether `listener` may run now. A fire-once listener is removed here,
    /// and is refused if it is no longer registered.
    fn claim(&self, name: &str, listener: &Listener) -> bool {
        if !listener.once {
            return true;
        }
        let mut listeners = self.listeners.lock();
        let Some(list) = listeners.get_mut(name) else {
            return false;
        };
        let Some(index) = list
            .iter()
            .position(|l| l.once && l.handler == listener.handler)
        else {
            return false;
        };
        list.remove(index);
        if list.is_empty() {
            listeners.remove(name);
        }
        true
    }
}

impl Store for Observable {
    fn on(&self, event: &str, handler: Handler) -> Result<()> {
        self.add(event, handler, false);
        Ok(())
    }

    fn one(&self, event: &str, handler: Handler) -> Result<()> {
        self.add(event, handler, true);
        Ok(())
    }

    /// Remove `handler` from each named event; under `*`, from all events.
    fn off(&self, event: &str, handler: &Handler) -> Result<()> {
        let mut listeners = self.listeners.lock();
        for name in event.split_whitespace() {
            if name == WILDCARD {
                for list in listeners.values_mut() {
                    list.retain(|l| &l.handler != handler);
                }
            } else if let Some(list) = listeners.get_mut(name) {
                list.retain(|l| &l.handler != handler);
            }
        }
        listeners.retain(|_, list| !list.is_empty());
        Ok(())
    }

    fn trigger(&self, event: &str, args: &[Value]) -> Result<()> {
        for name in event.split_whitespace() {
            let direct = self.due(name);
            let wildcard = if name == WILDCARD {
                Vec::new()
            } else {
                self.due(WILDCARD)
            };

            for listener in &direct {
                if self.claim(name, listener) {
                    listener.handler.call(args)?;
                }
            }

            if !wildcard.is_empty() {
                let mut named = Vec::with_capacity(args.len() + 1);
                named.push(Value::from(name));
                named.extend_from_slice(args);
                for listener in &wildcard {
                    if self.claim(WILDCARD, listener) {
                        listener.handler.call(&named)?;
                    }
                }
            }
        }
        Ok(())
    }
}
