//! Runtime lifecycle events and the listener that handles them.
//!
//! The host runtime emits three events, each handled synchronously and
//! exactly once per occurrence:
//!
//! - **initialization completed** (once, at startup): the raw bridge is
//!   handed over, instrumentation layers are applied, and the result
//!   becomes the only bridge used for the rest of the process
//! - **code installed** (zero or more times): best-effort diagnostics
//! - **shutdown** (at most once, terminal): forwarded to the runtime
//!
//! The listener holds no state beyond its flags and collaborators; both
//! are fixed at construction, so there is no ambient mutable global to
//! coordinate.

use std::fmt;
use std::sync::Arc;

use opal_core::{ConfigSnapshot, DiagnosticError, InstrumentationConfig, TraceSink};

use crate::bridge::{CompilationArtifact, InstalledCode, VmBridge};
use crate::counting::{CallCounters, CountingHook};
use crate::intercept::Intercepted;
use crate::logging::LoggingHook;

/// Label attached to structured dumps emitted on code installation.
const INSTALL_DUMP_LABEL: &str = "After code installation";

/// Host-runtime services the listener delegates to.
pub trait RuntimeHandle: Send + Sync {
    /// Begin runtime shutdown. Idempotency is the runtime's concern.
    fn shutdown(&self);

    /// Capture the runtime configuration for reporting.
    fn config_snapshot(&self) -> ConfigSnapshot;
}

/// Code-cache queries used by install diagnostics.
pub trait CodeCacheHandle {
    /// Render installed code as human-readable assembly.
    fn disassemble(&self, code: &InstalledCode) -> Result<String, DiagnosticError>;
}

/// Structured dump destination for compilation artifacts.
pub trait DumpSink: Send + Sync {
    /// Persist a labeled sequence of opaque values.
    fn dump(&self, payload: &[&dyn fmt::Debug], label: &str) -> Result<(), DiagnosticError>;
}

/// Handles the host runtime's lifecycle notifications.
///
/// The wrap order applied at initialization is fixed: counting innermost,
/// logging outermost. Trace lines therefore describe already-counted
/// calls, and the counters never include formatting overhead.
pub struct VmEventListener {
    config: InstrumentationConfig,
    runtime: Arc<dyn RuntimeHandle>,
    dumper: Arc<dyn DumpSink>,
    sink: Arc<dyn TraceSink>,
    /// Allocated only when counting is enabled.
    counters: Option<Arc<CallCounters>>,
}

impl VmEventListener {
    /// Create a listener with the given flags and collaborators.
    pub fn new(
        config: InstrumentationConfig,
        runtime: Arc<dyn RuntimeHandle>,
        dumper: Arc<dyn DumpSink>,
        sink: Arc<dyn TraceSink>,
    ) -> Self {
        let counters = config.count_calls.then(|| Arc::new(CallCounters::new()));
        Self {
            config,
            runtime,
            dumper,
            sink,
            counters,
        }
    }

    /// Per-method bridge call counters, present when counting is enabled.
    pub fn counters(&self) -> Option<&Arc<CallCounters>> {
        self.counters.as_ref()
    }

    /// The runtime is going down; forward to its shutdown procedure.
    pub fn notify_shutdown(&self) {
        self.runtime.shutdown();
    }

    /// Code was installed into the code cache.
    ///
    /// Two independent, flag-gated diagnostic effects, in order: dump the
    /// artifact, then log its disassembly. Collaborator failures
    /// propagate to the host; with both flags off no collaborator is
    /// touched.
    pub fn notify_install(
        &self,
        code_cache: &dyn CodeCacheHandle,
        installed: &InstalledCode,
        artifact: &CompilationArtifact,
    ) -> Result<(), DiagnosticError> {
        if self.config.dump_on_install {
            let payload: [&dyn fmt::Debug; 2] = [artifact, installed];
            self.dumper.dump(&payload, INSTALL_DUMP_LABEL)?;
        }
        if self.config.log_install {
            let text = code_cache.disassemble(installed)?;
            self.sink.line(&text);
        }
        Ok(())
    }

    /// The bridge is ready; layer instrumentation onto it and hand it
    /// back. The returned bridge is the only one used thereafter.
    ///
    /// With counting and logging both disabled the input box is returned
    /// untouched, with no wrapping and no per-call overhead.
    pub fn complete_initialization(
        &self,
        runtime: &dyn RuntimeHandle,
        bridge: Box<dyn VmBridge>,
    ) -> Box<dyn VmBridge> {
        let mut bridge = bridge;
        if let Some(counters) = &self.counters {
            bridge = Box::new(Intercepted::new(
                bridge,
                CountingHook::new(Arc::clone(counters)),
            ));
        }
        if self.config.log_calls {
            bridge = Box::new(Intercepted::new(
                bridge,
                LoggingHook::new(Arc::clone(&self.sink)),
            ));
        }
        if self.config.print_config {
            runtime.config_snapshot().print_to(self.sink.as_ref());
        }
        bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use opal_core::{BufferSink, ConfigValue};

    use crate::test_support::TestBridge;

    #[derive(Default)]
    struct StubRuntime {
        shutdowns: AtomicUsize,
    }

    impl RuntimeHandle for StubRuntime {
        fn shutdown(&self) {
            self.shutdowns.fetch_add(1, Ordering::Relaxed);
        }

        fn config_snapshot(&self) -> ConfigSnapshot {
            let mut snap = ConfigSnapshot::new();
            snap.record("b", Ok(ConfigValue::Int(2)));
            snap.record("a", Ok(ConfigValue::Int(1)));
            snap
        }
    }

    #[derive(Default)]
    struct StubDumper {
        dumps: AtomicUsize,
    }

    impl DumpSink for StubDumper {
        fn dump(&self, _payload: &[&dyn fmt::Debug], _label: &str) -> Result<(), DiagnosticError> {
            self.dumps.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    fn make_listener(
        config: InstrumentationConfig,
    ) -> (VmEventListener, Arc<StubRuntime>, Arc<StubDumper>, Arc<BufferSink>) {
        let runtime = Arc::new(StubRuntime::default());
        let dumper = Arc::new(StubDumper::default());
        let sink = Arc::new(BufferSink::new());
        let listener = VmEventListener::new(config, runtime.clone(), dumper.clone(), sink.clone());
        (listener, runtime, dumper, sink)
    }

    #[test]
    fn test_shutdown_forwards_to_runtime() {
        let (listener, runtime, _, _) = make_listener(InstrumentationConfig::disabled());
        listener.notify_shutdown();
        assert_eq!(runtime.shutdowns.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_counters_exist_only_when_counting_enabled() {
        let (listener, _, _, _) = make_listener(InstrumentationConfig::disabled());
        assert!(listener.counters().is_none());

        let config = InstrumentationConfig {
            count_calls: true,
            ..Default::default()
        };
        let (listener, _, _, _) = make_listener(config);
        assert!(listener.counters().is_some());
    }

    #[test]
    fn test_initialization_prints_config_sorted() {
        let config = InstrumentationConfig {
            print_config: true,
            ..Default::default()
        };
        let (listener, runtime, _, sink) = make_listener(config);

        let bridge = listener.complete_initialization(runtime.as_ref(), Box::new(TestBridge::new()));
        drop(bridge);

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(" a "), "{lines:?}");
        assert!(lines[1].contains(" b "), "{lines:?}");
    }
}
