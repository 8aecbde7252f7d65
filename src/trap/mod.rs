//! Global trap for uncaught runtime errors.
//!
//! The host calls [`ErrorHook::dispatch`] with `(message, url, line)`:
//! - Line `0` (no usable location) is ignored and never suppressed
//! - Other errors are logged to an optional [`DiagnosticSink`], best effort
//! - The return value tells the host whether to suppress its own reporting
//!
//! # Example
//!
//! ```ignore
//! let hook = ErrorHook::new();
//! let trap = ErrorTrap::with_sink(TrapConfig::default(), Arc::new(TracingSink));
//! hook.install(Arc::new(trap));
//!
//! let suppress = hook.dispatch(&ErrorEvent::new("x is undefined", "/app.js", 12));
//! ```

mod handler;
mod sink;

pub use handler::{ErrorHook, ErrorTrap, TrapConfig};
pub use sink::{ChannelSink, DiagnosticSink, ErrorRecord, RecordReceiver, TracingSink};
