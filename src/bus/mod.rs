//! Control bus for fanning events out to stores.
//!
//! UI code publishes intents on the bus; every registered store receives
//! each call in registration order:
//! - `on` / `one` / `off` register and remove handlers on every store
//! - `trigger` publishes an event with JSON arguments
//!
//! The bus keeps no handler state of its own. [`Observable`] is a ready-made
//! store for callers that do not bring their own.
//!
//! # Example
//!
//! ```ignore
//! let bus = ControlBus::new();
//! let todos = Arc::new(Observable::new());
//! bus.add_store(todos.clone());
//!
//! todos.on("todo_add", Handler::new(|args| {
//!     println!("adding {:?}", args);
//!     Ok(())
//! }))?;
//!
//! bus.trigger("todo_add", &[json!({"title": "write docs"})])?;
//! ```

mod control;
mod observable;
mod types;

pub use control::ControlBus;
pub use observable::{Observable, WILDCARD};
pub use types::{BusConfig, DeliveryPolicy, Handler, Store};
