//! Declarative component mounting.
//!
//! Pages declare components with marker elements:
//!
//! ```text
//! <script type="tag" tagname="x-greet">{"title": "Hi"}</script>
//! <script type="inline" data-tag="todo-list">{"items": []}</script>
//! ```
//!
//! Mounting is split in two steps:
//! - [`scan`] finds markers and parses their JSON options without touching
//!   the document
//! - [`execute`] inserts an empty `<x-greet>` before the marker and asks the
//!   [`Mounter`] to attach the live component
//!
//! [`mount_markers`] runs both for every marker. [`ComponentRegistry`] is a
//! table-driven `Mounter` for hosts without their own component library.

mod registry;
mod scanner;
mod types;

pub use registry::{ComponentRegistry, MountedComponent};
pub use scanner::{execute, mount_markers, scan};
pub use types::{MarkerSignature, MountRequest, Mounter, ScanConfig};
