//! # Mountbus
//!
//! Page bootstrap for component-based front ends.
//!
//! ## Core Concepts
//!
//! - **Error Trap**: Global handler for uncaught runtime errors with a
//!   best-effort diagnostic sink
//! - **Control Bus**: Fans `on`/`one`/`off`/`trigger` out to every registered store
//! - **Mount Markers**: `<script type="tag" tagname="...">` elements whose JSON
//!   body configures a component mounted in their place
//!
//! ## Example
//!
//! ```ignore
//! use mountbus::{Bootstrap, BootstrapConfig, ComponentRegistry, Document, ErrorHook};
//!
//! let bootstrap = Bootstrap::new(BootstrapConfig::default());
//! let hook = ErrorHook::new();
//! bootstrap.install_trap(&hook, Some(Arc::new(TracingSink)));
//!
//! let registry = ComponentRegistry::new();
//! registry.register_passthrough("x-greet")?;
//! let report = bootstrap.run(&mut document, &registry)?;
//!
//! let bus = bootstrap.control_bus();
//! bus.add_store(Arc::new(Observable::new()));
//! bus.trigger("ready", &[])?;
//! ```

pub mod bootstrap;
pub mod bus;
pub mod dom;
pub mod error;
pub mod mount;
pub mod trap;
pub mod types;

// Re-exports
pub use bootstrap::{BootReport, Bootstrap, BootstrapConfig};
pub use bus::{BusConfig, ControlBus, DeliveryPolicy, Handler, Observable, Store, WILDCARD};
pub use dom::{Document, Element, NodeId};
pub use error::{BootstrapError, Result};
pub use mount::{
    execute, mount_markers, scan, ComponentRegistry, MarkerSignature, MountRequest,
    MountedComponent, Mounter, ScanConfig,
};
pub use trap::{
    ChannelSink, DiagnosticSink, ErrorHook, ErrorRecord, ErrorTrap, RecordReceiver, TracingSink,
    TrapConfig,
};
pub use types::*;
