//! Transparent interception of bridge calls.
//!
//! [`Intercepted`] layers one observation hook over the compiler-to-VM
//! bridge. The hook runs before and after each method; the inner result
//! is returned to the caller unchanged. Layers compose by wrapping again,
//! so a bridge can carry zero, one, or several hooks.
//!
//! # Ordering
//!
//! Each call observes `before` → inner method → `after` in program order
//! on its own thread. No ordering is guaranteed between concurrent calls
//! on different threads.
//!
//! # Hook failures
//!
//! A hook that fails is a defect in the instrumentation, not in the call
//! it observed: the failure is reported through `tracing`, counted on an
//! observable fault counter, and dropped. The bridge caller still
//! receives the inner call's result.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use opal_core::{BridgeError, BridgeResult, HookError};

use crate::bridge::{BridgeMethod, VmBridge};

/// Borrowed views of a call's arguments.
///
/// Formatting is deferred: building the slice costs a stack array of
/// pointers, nothing more, so hooks that ignore the arguments (counting)
/// never pay for rendering them.
pub type CallArgs<'a> = &'a [&'a dyn fmt::Debug];

/// The outcome a call produced, as seen by `after` hooks.
#[derive(Clone, Copy)]
pub enum CallOutcome<'a> {
    /// The call returned a value.
    Ok(&'a dyn fmt::Debug),
    /// The call failed with a bridge error.
    Err(&'a BridgeError),
}

/// Observer invoked around every intercepted bridge call.
///
/// Hooks observe; they must not influence the call. The method set, the
/// signatures, and which failures propagate are all properties of the
/// wrapped bridge alone.
pub trait CallHook: Send + Sync {
    /// Called before the inner method runs.
    fn before(&self, method: BridgeMethod, args: CallArgs<'_>) -> Result<(), HookError>;

    /// Called after the inner method returned or failed.
    fn after(
        &self,
        method: BridgeMethod,
        args: CallArgs<'_>,
        outcome: CallOutcome<'_>,
    ) -> Result<(), HookError>;
}

/// Shared handle onto an interceptor's hook-fault counter.
///
/// Stays usable after the interceptor disappears behind `dyn VmBridge`.
#[derive(Debug, Clone, Default)]
pub struct HookFaults(Arc<AtomicU64>);

impl HookFaults {
    /// Number of hook failures swallowed so far.
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

/// A bridge layered with one observation hook.
///
/// Implements [`VmBridge`] itself; the forwarding methods are generated
/// next to the trait in `bridge.rs`.
pub struct Intercepted<H> {
    inner: Box<dyn VmBridge>,
    hook: H,
    faults: HookFaults,
}

impl<H: CallHook> Intercepted<H> {
    /// Wrap `inner`, observing every call with `hook`.
    pub fn new(inner: Box<dyn VmBridge>, hook: H) -> Self {
        Self {
            inner,
            hook,
            faults: HookFaults::default(),
        }
    }

    /// Handle onto this layer's fault counter.
    pub fn faults(&self) -> HookFaults {
        self.faults.clone()
    }

    #[inline]
    pub(crate) fn inner(&self) -> &dyn VmBridge {
        self.inner.as_ref()
    }

    pub(crate) fn hook_before(&self, method: BridgeMethod, args: CallArgs<'_>) {
        if let Err(err) = self.hook.before(method, args) {
            self.note_fault(method, "before", &err);
        }
    }

    pub(crate) fn hook_after<T: fmt::Debug>(
        &self,
        method: BridgeMethod,
        args: CallArgs<'_>,
        result: &BridgeResult<T>,
    ) {
        let outcome = match result {
            Ok(value) => CallOutcome::Ok(value),
            Err(err) => CallOutcome::Err(err),
        };
        if let Err(err) = self.hook.after(method, args, outcome) {
            self.note_fault(method, "after", &err);
        }
    }

    fn note_fault(&self, method: BridgeMethod, stage: &str, err: &HookError) {
        self.faults.record();
        tracing::warn!(
            target: "opal::bridge",
            "{} hook failed during {stage}: {err}",
            method.name()
        );
    }
}
