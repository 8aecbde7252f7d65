//! One-shot page bootstrap tying the trap, bus and mount scan together.

use crate::bus::{BusConfig, ControlBus};
use crate::dom::Document;
use crate::error::{BootstrapError, Result};
use crate::mount::{mount_markers, Mounter, ScanConfig};
use crate::trap::{DiagnosticSink, ErrorHook, ErrorTrap, TrapConfig};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Bootstrap configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub trap: TrapConfig,
    pub scan: ScanConfig,
    pub bus: BusConfig,
    /// Also activate custom elements already present in markup.
    /// Default: false
    pub mount_all: bool,
}

impl BootstrapConfig {
    /// Load from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Instances produced by a bootstrap run.
#[derive(Debug)]
pub struct BootReport<I> {
    /// Components mounted from markers, in document order.
    pub markers: Vec<I>,
    /// Components activated by the wildcard pass.
    pub custom: Vec<I>,
}

/// Page bootstrap. [`run`](Bootstrap::run) mounts the page once.
pub struct Bootstrap {
    config: BootstrapConfig,
    ran: AtomicBool,
}

impl Bootstrap {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            ran: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Install the error trap into `hook`. Safe to repeat.
    pub fn install_trap(
        &self,
        hook: &ErrorHook,
        sink: Option<Arc<dyn DiagnosticSink>>,
    ) -> Arc<ErrorTrap> {
        let config = self.config.trap.clone();
        let trap = Arc::new(match sink {
            Some(sink) => ErrorTrap::with_sink(config, sink),
            None => ErrorTrap::new(config),
        });
        hook.install(trap.clone());
        trap
    }

    /// A fresh control bus using the configured delivery policy.
    pub fn control_bus(&self) -> ControlBus {
        ControlBus::with_config(self.config.bus.clone())
    }

    pub fn has_run(&self) -> bool {
        self.ran.load(Ordering::SeqCst)
    }

    /// Mount every marker, then run the wildcard pass if enabled.
    ///
    /// Runs at most once; later calls fail with
    /// [`BootstrapError::AlreadyBootstrapped`] and leave the document alone.
    /// A failed run still counts.
    pub fn run<M: Mounter>(
        &self,
        document: &mut Document,
        mounter: &M,
    ) -> Result<BootReport<M::Instance>> {
        if self
            .ran
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(BootstrapError::AlreadyBootstrapped);
        }

        let markers = mount_markers(document, mounter, &self.config.scan)?;
        let custom = if self.config.mount_all {
            mounter.mount_all(document)?
        } else {
            Vec::new()
        };
        debug!(
            page = %self.config.trap.page_path,
            markers = markers.len(),
            custom = custom.len(),
            "bootstrap mounts complete"
        );
        info!(
            mounted = markers.len() + custom.len(),
            "page bootstrapped"
        );

        Ok(BootReport { markers, custom })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::DeliveryPolicy;
    use crate::dom::Element;
    use crate::mount::ComponentRegistry;
    use crate::trap::ChannelSink;
    use crate::types::ErrorEvent;

    #[test]
    fn test_config_from_json() {
        let config = BootstrapConfig::from_json_str(
            r#"{
                "trap": {"page_path": "/todos", "suppress_default_on_error": true},
                "bus": {"delivery": "isolate"},
                "mount_all": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.trap.page_path, "/todos");
        assert!(config.trap.suppress_default_on_error);
        assert_eq!(config.bus.delivery, DeliveryPolicy::Isolate);
        assert!(config.mount_all);
        assert_eq!(config.scan.signatures.len(), 2);
    }

    #[test]
    fn test_config_invalid_json() {
        assert!(matches!(
            BootstrapConfig::from_json_str("{"),
            Err(BootstrapError::Serialization(_))
        ));
    }

    #[test]
    fn test_install_trap() {
        let bootstrap = Bootstrap::new(BootstrapConfig::default());
        let hook = ErrorHook::new();
        let (sink, receiver) = ChannelSink::new(8);

        bootstrap.install_trap(&hook, Some(Arc::new(sink.clone())));
        bootstrap.install_trap(&hook, Some(Arc::new(sink)));

        hook.dispatch(&ErrorEvent::new("boom", "/app.js", 4));
        assert_eq!(receiver.try_recv().unwrap().to_string(), "/ @ /app.js:4 boom");
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_run_once() {
        let bootstrap = Bootstrap::new(BootstrapConfig::default());
        let registry = ComponentRegistry::new();
        registry.register_passthrough("x-greet").unwrap();

        let mut doc = Document::new();
        let body = doc.body();
        doc.append(
            body,
            Element::new("script")
                .attr("type", "tag")
                .attr("tagname", "x-greet")
                .text("{}"),
        )
        .unwrap();

        let report = bootstrap.run(&mut doc, &registry).unwrap();
        assert_eq!(report.markers.len(), 1);
        assert!(report.custom.is_empty());
        assert!(bootstrap.has_run());

        let nodes = doc.len();
        assert!(matches!(
            bootstrap.run(&mut doc, &registry),
            Err(BootstrapError::AlreadyBootstrapped)
        ));
        assert_eq!(doc.len(), nodes);
    }

    #[test]
    fn test_run_with_mount_all() {
        let bootstrap = Bootstrap::new(BootstrapConfig {
            mount_all: true,
            ..Default::default()
        });
        let registry = ComponentRegistry::new();
        registry.register_passthrough("x-greet").unwrap();
        registry.register_passthrough("x-footer").unwrap();

        let mut doc = Document::new();
        let body = doc.body();
        doc.append(
            body,
            Element::new("script")
                .attr("type", "inline")
                .attr("data-tag", "x-greet")
                .text(r#"{"title":"Hi"}"#),
        )
        .unwrap();
        doc.append(body, Element::new("x-footer")).unwrap();

        let report = bootstrap.run(&mut doc, &registry).unwrap();
        assert_eq!(report.markers.len(), 1);
        // The marker-created <x-greet> is not mounted a second time.
        assert_eq!(report.custom.len(), 1);
        assert_eq!(report.custom[0].tag.as_str(), "x-footer");
    }

    #[test]
    fn test_failed_run_counts() {
        let bootstrap = Bootstrap::new(BootstrapConfig::default());
        let registry = ComponentRegistry::new();

        let mut doc = Document::new();
        let body = doc.body();
        doc.append(
            body,
            Element::new("script")
                .attr("type", "tag")
                .attr("tagname", "x-unknown")
                .text("{}"),
        )
        .unwrap();

        assert!(matches!(
            bootstrap.run(&mut doc, &registry),
            Err(BootstrapError::UnknownComponent(_))
        ));
        assert!(matches!(
            bootstrap.run(&mut doc, &registry),
            Err(BootstrapError::AlreadyBootstrapped)
        ));
    }

    #[test]
    fn test_control_bus_uses_config() {
        let bootstrap = Bootstrap::new(BootstrapConfig {
            bus: BusConfig {
                delivery: DeliveryPolicy::Isolate,
            },
            ..Default::default()
        });
        let bus = bootstrap.control_bus();
        assert_eq!(bus.config().delivery, DeliveryPolicy::Isolate);
        assert_eq!(bus.store_count(), 0);
    }
}
