//! Instrumentation boundary between the Opal JIT compiler and the
//! hosting runtime.
//!
//! The compiler reaches the runtime through exactly one interface, the
//! compiler-to-VM bridge. This crate owns that interface and the
//! machinery that can wrap it, at initialization time, in transparent
//! observation layers:
//!
//! ```text
//! host runtime ─ complete_initialization(bridge) ─► VmEventListener
//!                                                        │
//!                      ┌─────────────────────────────────┘
//!                      ▼
//!        ┌──────────────────────────────┐
//!        │ LoggingHook   (outermost)    │  one trace line per call
//!        │ ┌──────────────────────────┐ │
//!        │ │ CountingHook (innermost) │ │  per-method atomic counters
//!        │ │ ┌──────────────────────┐ │ │
//!        │ │ │    real VmBridge     │ │ │
//!        │ │ └──────────────────────┘ │ │
//!        │ └──────────────────────────┘ │
//!        └──────────────────────────────┘
//! ```
//!
//! Every layer preserves the bridge contract exactly, down to which
//! failures propagate. With all flags disabled the bridge is handed back
//! untouched and nothing is allocated.
//!
//! The listener also handles the two remaining lifecycle events: code
//! installation (flag-gated dump and disassembly diagnostics) and
//! shutdown (forwarded to the runtime).

// Bridge contract and interception
pub mod bridge;
pub mod intercept;

// Observation layers
pub mod counting;
pub mod logging;

// Lifecycle integration
pub mod events;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use bridge::{
    BridgeMethod, CompilationArtifact, InstalledCode, MethodHandle, TypeHandle, VmBridge,
};
pub use counting::{CallCounters, CountingHook};
pub use events::{CodeCacheHandle, DumpSink, RuntimeHandle, VmEventListener};
pub use intercept::{CallArgs, CallHook, CallOutcome, HookFaults, Intercepted};
pub use logging::LoggingHook;
