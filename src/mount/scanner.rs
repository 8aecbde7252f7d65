//! Marker discovery and execution.

use crate::dom::Document;
use crate::error::{BootstrapError, Result};
use crate::types::TagName;
use serde_json::Value;
use tracing::{debug, trace};

use super::types::{MountRequest, Mounter, ScanConfig};

/// Find every mount marker in document order.
///
/// Pure: the document is not modified. The first malformed marker (missing
/// or invalid tag name, unparsable content) fails the whole scan.
pub fn scan(document: &Document, config: &ScanConfig) -> Result<Vec<MountRequest>> {
    let mut requests = Vec::new();

    for node in document.elements() {
        let Some(signature) = config
            .signatures
            .iter()
            .find(|s| s.matches(document, node))
        else {
            continue;
        };

        let raw = document
            .attribute(node, &signature.tag_attribute)
            .ok_or_else(|| BootstrapError::MissingAttribute {
                node,
                attribute: signature.tag_attribute.clone(),
            })?;
        let tag = TagName::new(raw.trim())?;
        let options = parse_options(&tag, document.text(node).unwrap_or_default())?;

        trace!(%node, %tag, "found mount marker");
        requests.push(MountRequest {
            marker: node,
            tag,
            options,
        });
    }

    debug!(markers = requests.len(), "marker scan complete");
    Ok(requests)
}

fn parse_options(tag: &TagName, content: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| BootstrapError::InvalidConfig {
        tag: tag.to_string(),
        reason: e.to_string(),
    })
}

/// Insert an empty `<tag>` before the marker and mount the component on it.
///
/// The marker stays in place. A marker no longer attached to the document
/// fails with [`BootstrapError::Detached`] and leaves the document untouched.
/// If the mount fails, the inserted element is removed again.
pub fn execute<M: Mounter>(
    document: &mut Document,
    mounter: &M,
    request: &MountRequest,
) -> Result<M::Instance> {
    if !document.is_attached(request.marker) {
        return Err(BootstrapError::Detached(request.marker));
    }

    let node = document.create_element(request.tag.as_str())?;
    document.insert_before(node, request.marker)?;
    trace!(marker = %request.marker, %node, tag = %request.tag, "mounting");

    match mounter.mount(document, node, &request.tag, &request.options) {
        Ok(instance) => Ok(instance),
        Err(e) => {
            debug!(%node, tag = %request.tag, error = %e, "mount failed, removing element");
            document.detach(node)?;
            Err(e)
        }
    }
}

/// Scan, then execute every request in document order.
///
/// Nothing is inserted if the scan fails. A mount failure stops the run;
/// components mounted before it stay mounted.
pub fn mount_markers<M: Mounter>(
    document: &mut Document,
    mounter: &M,
    config: &ScanConfig,
) -> Result<Vec<M::Instance>> {
    let requests = scan(document, config)?;
    let mut instances = Vec::with_capacity(requests.len());
    for request in &requests {
        instances.push(execute(document, mounter, request)?);
    }
    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, NodeId};
    use crate::mount::MarkerSignature;
    use parking_lot::Mutex;
    use serde_json::json;

    /// Mounter that records calls and returns the target node.
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<(NodeId, String, Value)>>,
    }

    impl Mounter for Recording {
        type Instance = NodeId;

        fn mount(
            &self,
            document: &Document,
            target: NodeId,
            tag: &TagName,
            options: &Value,
        ) -> Result<NodeId> {
            assert!(document.is_attached(target));
            self.calls
                .lock()
                .push((target, tag.to_string(), options.clone()));
            Ok(target)
        }

        fn mount_all(&self, _document: &Document) -> Result<Vec<NodeId>> {
            Ok(Vec::new())
        }
    }

    fn marker(tag: &str, content: &str) -> Element {
        Element::new("script")
            .attr("type", "tag")
            .attr("tagname", tag)
            .text(content)
    }

    #[test]
    fn test_scan_finds_markers_in_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let first = doc.append(body, marker("x-greet", r#"{"title":"Hi"}"#)).unwrap();
        doc.append(body, Element::new("p").text("not a marker")).unwrap();
        let second = doc
            .append(
                body,
                Element::new("div").child(
                    Element::new("script")
                        .attr("type", "inline")
                        .attr("data-tag", "todo-list")
                        .text("[1, 2]"),
                ),
            )
            .unwrap();

        let requests = scan(&doc, &ScanConfig::default()).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].marker, first);
        assert_eq!(requests[0].tag.as_str(), "x-greet");
        assert_eq!(requests[0].options, json!({"title": "Hi"}));
        assert_eq!(requests[1].marker, doc.children(second)[0]);
        assert_eq!(requests[1].options, json!([1, 2]));
    }

    #[test]
    fn test_scan_respects_signatures() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, marker("x-a", "{}")).unwrap();
        doc.append(
            body,
            Element::new("script")
                .attr("type", "inline")
                .attr("data-tag", "x-b")
                .text("{}"),
        )
        .unwrap();

        let config = ScanConfig {
            signatures: vec![MarkerSignature::inline()],
        };
        let requests = scan(&doc, &config).unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tag.as_str(), "x-b");
    }

    #[test]
    fn test_scan_does_not_modify_document() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, marker("x-greet", "{}")).unwrap();
        let before = doc.elements();

        scan(&doc, &ScanConfig::default()).unwrap();
        assert_eq!(doc.elements(), before);
    }

    #[test]
    fn test_scan_invalid_json() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, marker("x-greet", "not-json")).unwrap();

        let result = scan(&doc, &ScanConfig::default());
        assert!(matches!(
            result,
            Err(BootstrapError::InvalidConfig { ref tag, .. }) if tag == "x-greet"
        ));
    }

    #[test]
    fn test_scan_empty_content_is_invalid() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, marker("x-greet", "  ")).unwrap();

        assert!(matches!(
            scan(&doc, &ScanConfig::default()),
            Err(BootstrapError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_scan_missing_tag_attribute() {
        let mut doc = Document::new();
        let body = doc.body();
        let node = doc
            .append(body, Element::new("script").attr("type", "tag").text("{}"))
            .unwrap();

        match scan(&doc, &ScanConfig::default()) {
            Err(BootstrapError::MissingAttribute { node: n, attribute }) => {
                assert_eq!(n, node);
                assert_eq!(attribute, "tagname");
            }
            other => panic!("Expected MissingAttribute, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_malformed_tag_name() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, marker("x greet", "{}")).unwrap();

        assert!(matches!(
            scan(&doc, &ScanConfig::default()),
            Err(BootstrapError::InvalidTagName(_))
        ));
    }

    #[test]
    fn test_execute_inserts_before_marker() {
        let mut doc = Document::new();
        let body = doc.body();
        let m = doc.append(body, marker("x-greet", r#"{"title":"Hi"}"#)).unwrap();
        let mounter = Recording::default();

        let requests = scan(&doc, &ScanConfig::default()).unwrap();
        let node = execute(&mut doc, &mounter, &requests[0]).unwrap();

        assert_eq!(doc.previous_sibling(m), Some(node));
        assert_eq!(doc.tag(node).unwrap().as_str(), "x-greet");
        assert!(doc.children(node).is_empty());
        assert!(doc.is_attached(m));

        let calls = mounter.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "x-greet");
        assert_eq!(calls[0].2, json!({"title": "Hi"}));
    }

    struct Rejecting;

    impl Mounter for Rejecting {
        type Instance = ();

        fn mount(&self, _: &Document, _: NodeId, tag: &TagName, _: &Value) -> Result<()> {
            Err(BootstrapError::UnknownComponent(tag.to_string()))
        }

        fn mount_all(&self, _document: &Document) -> Result<Vec<()>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_execute_failed_mount_removes_element() {
        let mut doc = Document::new();
        let body = doc.body();
        let m = doc.append(body, marker("x-missing", "{}")).unwrap();
        let before = doc.elements();

        let requests = scan(&doc, &ScanConfig::default()).unwrap();
        let result = execute(&mut doc, &Rejecting, &requests[0]);

        assert!(matches!(result, Err(BootstrapError::UnknownComponent(_))));
        assert_eq!(doc.elements(), before);
        assert_eq!(doc.children(body), &[m]);
        assert_eq!(doc.previous_sibling(m), None);
    }

    #[test]
    fn test_execute_detached_marker() {
        let mut doc = Document::new();
        let body = doc.body();
        let wrapper = doc
            .append(body, Element::new("div").child(marker("x-greet", "{}")))
            .unwrap();
        let requests = scan(&doc, &ScanConfig::default()).unwrap();

        // Parent removed between discovery and execution.
        doc.detach(wrapper).unwrap();
        let nodes_before = doc.len();

        let mounter = Recording::default();
        let result = execute(&mut doc, &mounter, &requests[0]);
        assert!(matches!(result, Err(BootstrapError::Detached(_))));
        assert_eq!(doc.len(), nodes_before);
        assert!(mounter.calls.lock().is_empty());
    }

    #[test]
    fn test_mount_markers_in_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, marker("x-one", "1")).unwrap();
        doc.append(body, marker("x-two", "2")).unwrap();
        let mounter = Recording::default();

        let instances = mount_markers(&mut doc, &mounter, &ScanConfig::default()).unwrap();
        assert_eq!(instances.len(), 2);

        let calls = mounter.calls.lock();
        let tags: Vec<&str> = calls.iter().map(|c| c.1.as_str()).collect();
        assert_eq!(tags, vec!["x-one", "x-two"]);
    }

    #[test]
    fn test_mount_markers_bad_marker_mounts_nothing() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.append(body, marker("x-one", "{}")).unwrap();
        doc.append(body, marker("x-two", "{oops")).unwrap();
        let nodes_before = doc.len();
        let mounter = Recording::default();

        assert!(mount_markers(&mut doc, &mounter, &ScanConfig::default()).is_err());
        assert!(mounter.calls.lock().is_empty());
        assert_eq!(doc.len(), nodes_before);
    }
}
