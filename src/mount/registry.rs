//! Reference mounter backed by a table of component factories.

use crate::dom::{Document, NodeId};
use crate::error::{BootstrapError, Result};
use crate::types::TagName;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use super::types::Mounter;

type Factory = dyn Fn(&Value) -> Result<Value> + Send + Sync;

/// A component attached to a document node.
#[derive(Clone, Debug, PartialEq)]
pub struct MountedComponent {
    pub tag: TagName,
    pub node: NodeId,
    /// State built by the component factory from its options.
    pub state: Value,
}

/// Maps tag names to component factories.
///
/// Each node is mounted at most once: `mount_all` skips nodes that already
/// carry a component, and an explicit `mount` on such a node fails.
#[derive(Default)]
pub struct ComponentRegistry {
    factories: RwLock<HashMap<TagName, Arc<Factory>>>,
    mounted: Mutex<HashSet<NodeId>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component whose state is built from its options.
    pub fn register<F>(&self, tag: &str, factory: F) -> Result<()>
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        let tag = TagName::new(tag)?;
        debug!(%tag, "component registered");
        self.factories.write().insert(tag, Arc::new(factory));
        Ok(())
    }

    /// Register a component whose state is its options, unchanged.
    pub fn register_passthrough(&self, tag: &str) -> Result<()> {
        self.register(tag, |options| Ok(options.clone()))
    }

    pub fn is_registered(&self, tag: &TagName) -> bool {
        self.factories.read().contains_key(tag)
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.lock().len()
    }

    /// Element attributes as a JSON object of strings.
    fn attribute_options(document: &Document, node: NodeId) -> Value {
        let options: Map<String, Value> = document
            .attributes(node)
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), Value::from(v.as_str())))
            .collect();
        Value::Object(options)
    }
}

impl Mounter for ComponentRegistry {
    type Instance = MountedComponent;

    fn mount(
        &self,
        document: &Document,
        target: NodeId,
        tag: &TagName,
        options: &Value,
    ) -> Result<MountedComponent> {
        if document.tag(target).is_none() {
            return Err(BootstrapError::NodeNotFound(target));
        }
        let factory = self
            .factories
            .read()
            .get(tag)
            .cloned()
            .ok_or_else(|| BootstrapError::UnknownComponent(tag.to_string()))?;

        if self.mounted.lock().contains(&target) {
            return Err(BootstrapError::Mount {
                tag: tag.to_string(),
                reason: format!("node {} already mounted", target),
            });
        }

        let state = factory(options)?;
        self.mounted.lock().insert(target);
        debug!(%tag, node = %target, "component mounted");

        Ok(MountedComponent {
            tag: tag.clone(),
            node: target,
            state,
        })
    }

    fn mount_all(&self, document: &Document) -> Result<Vec<MountedComponent>> {
        let mut instances = Vec::new();
        for node in document.elements() {
            let Some(tag) = document.tag(node) else {
                continue;
            };
            if !tag.is_custom()
                || !self.is_registered(tag)
                || self.mounted.lock().contains(&node)
            {
                continue;
            }
            let options = Self::attribute_options(document, node);
            instances.push(self.mount(document, node, tag, &options)?);
        }
        debug!(mounted = instances.len(), "wildcard mount complete");
        Ok(instances)
    }
}
