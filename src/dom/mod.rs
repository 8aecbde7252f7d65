//! In-memory document model.
//!
//! A small arena-backed element tree standing in for the host page. It
//! supports exactly what the bootstrap needs:
//! - Attributes and text content per element
//! - Document-order traversal
//! - Inserting a node before a sibling
//!
//! # Example
//!
//! ```ignore
//! let mut doc = Document::new();
//! let body = doc.body();
//! let marker = doc.append(
//!     body,
//!     Element::new("script")
//!         .attr("type", "tag")
//!         .attr("tagname", "x-greet")
//!         .text(r#"{"title":"Hi"}"#),
//! )?;
//! ```

mod document;

pub use document::{Document, Element, NodeId};
