//! Arena-backed element tree.

use crate::error::{BootstrapError, Result};
use crate::types::TagName;
use std::fmt;

/// Identifier of a node inside a [`Document`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Description of an element subtree to append.
#[derive(Clone, Debug)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }
}

struct Node {
    tag: TagName,
    attributes: Vec<(String, String)>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An element tree rooted at `<html>` with a `<body>` child.
///
/// Nodes are never freed; removing a node only detaches it, so a `NodeId`
/// stays valid for the life of the document.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    body: NodeId,
}

impl Document {
    /// Create an empty document (`<html><body></body></html>`).
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
        };
        doc.root = doc.alloc(TagName::from_static("html"));
        doc.body = doc.alloc(TagName::from_static("body"));
        doc.nodes[doc.root.0].children.push(doc.body);
        doc.nodes[doc.body.0].parent = Some(doc.root);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Total nodes ever created, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, tag: TagName) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag,
            attributes: Vec::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(BootstrapError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .ok_or(BootstrapError::NodeNotFound(id))
    }

    /// Create a detached, empty element.
    pub fn create_element(&mut self, tag: &str) -> Result<NodeId> {
        let tag = TagName::new(tag)?;
        Ok(self.alloc(tag))
    }

    /// Append an element subtree as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.create_element(&element.tag)?;
        {
            let node = self.node_mut(id)?;
            node.attributes = element.attributes;
            node.text = element.text;
        }
        self.append_child(parent, id)?;
        for child in element.children {
            self.append(id, child)?;
        }
        Ok(id)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Move `child` to the end of `parent`'s children.
    ///
    /// Fails with [`BootstrapError::Hierarchy`] if `child` is `parent` or one
    /// of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_inclusive_ancestor(child, parent) {
            return Err(BootstrapError::Hierarchy {
                node: child,
                parent,
            });
        }
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Insert `node` immediately before `reference`, under the same parent.
    ///
    /// Fails with [`BootstrapError::Detached`] if `reference` has no parent and
    /// with [`BootstrapError::Hierarchy`] if `node` is an ancestor of
    /// `reference`. Inserting a node before itself is a no-op.
    pub fn insert_before(&mut self, node: NodeId, reference: NodeId) -> Result<()> {
        self.node(node)?;
        let parent = self
            .node(reference)?
            .parent
            .ok_or(BootstrapError::Detached(reference))?;
        if node == reference {
            return Ok(());
        }
        if self.is_inclusive_ancestor(node, parent) {
            return Err(BootstrapError::Hierarchy { node, parent });
        }
        self.detach(node)?;

        let siblings = &mut self.node_mut(parent)?.children;
        let position = siblings
            .iter()
            .position(|&id| id == reference)
            .ok_or(BootstrapError::Detached(reference))?;
        siblings.insert(position, node);
        self.node_mut(node)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `id` from its parent. No-op for an already detached node.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        if let Some(parent) = self.node_mut(id)?.parent.take() {
            self.node_mut(parent)?.children.retain(|&c| c != id);
        }
        Ok(())
    }

    pub fn tag(&self, id: NodeId) -> Option<&TagName> {
        self.nodes.get(id.0).map(|n| &n.tag)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let position = siblings.iter().position(|&c| c == id)?;
        position.checked_sub(1).map(|p| siblings[p])
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(id.0).and_then(|n| {
            n.attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        })
    }

    /// All attributes of `id`, in insertion order.
    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        self.nodes
            .get(id.0)
            .map(|n| n.attributes.as_slice())
            .unwrap_or(&[])
    }

    /// Set or replace an attribute.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let node = self.node_mut(id)?;
        match node
            .attributes
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some(i) => node.attributes[i].1 = value.to_string(),
            None => node.attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    /// The element's own text content (the body of a script element).
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.0).map(|n| n.text.as_str())
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.node_mut(id)?.text = text.to_string();
        Ok(())
    }

    /// Whether `id` is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root, id)
    }

    /// All attached elements in document order (pre-order, root first).
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("attached", &self.elements().len())
            .finish()
    }
}
