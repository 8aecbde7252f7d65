//! Marker signatures, scan configuration and the mounting capability.

use crate::dom::{Document, NodeId};
use crate::error::Result;
use crate::types::TagName;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a mount marker is recognised in markup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSignature {
    /// Element name of the marker, e.g. `script`.
    pub element: String,
    /// Required value of the marker's `type` attribute.
    pub type_value: String,
    /// Attribute holding the component tag name.
    pub tag_attribute: String,
}

impl MarkerSignature {
    /// `<script type="tag" tagname="...">`
    pub fn tag() -> Self {
        Self {
            element: "script".to_string(),
            type_value: "tag".to_string(),
            tag_attribute: "tagname".to_string(),
        }
    }

    /// `<script type="inline" data-tag="...">`
    pub fn inline() -> Self {
        Self {
            element: "script".to_string(),
            type_value: "inline".to_string(),
            tag_attribute: "data-tag".to_string(),
        }
    }

    /// Whether `node` is a marker of this kind.
    pub fn matches(&self, document: &Document, node: NodeId) -> bool {
        let element_matches = document
            .tag(node)
            .is_some_and(|tag| tag.as_str().eq_ignore_ascii_case(&self.element));
        element_matches
            && document
                .attribute(node, "type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(&self.type_value))
    }
}

/// Scanner configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Recognised marker kinds, tried in order.
    /// Default: tag and inline markers
    pub signatures: Vec<MarkerSignature>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            signatures: vec![MarkerSignature::tag(), MarkerSignature::inline()],
        }
    }
}

/// A component to instantiate, discovered by [`scan`](super::scan).
#[derive(Clone, Debug, PartialEq)]
pub struct MountRequest {
    /// The marker element the component is inserted before.
    pub marker: NodeId,
    pub tag: TagName,
    /// Parsed marker content.
    pub options: Value,
}

/// The external mounting library.
pub trait Mounter {
    /// Handle to a live component.
    type Instance;

    /// Attach component `tag` to the element `target` with `options`.
    fn mount(
        &self,
        document: &Document,
        target: NodeId,
        tag: &TagName,
        options: &Value,
    ) -> Result<Self::Instance>;

    /// Activate every known custom element already present in the document.
    fn mount_all(&self, document: &Document) -> Result<Vec<Self::Instance>>;
}
