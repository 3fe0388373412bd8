//! Per-method call counting across the bridge.
//!
//! Counters are a fixed-size table of atomics indexed by [`BridgeMethod`]:
//! increments are lock-free, never lost under concurrent compilation
//! threads, and never reset for the life of the process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rustc_hash::FxHashMap;

use opal_core::{HookError, TraceSink};

use crate::bridge::BridgeMethod;
use crate::intercept::{CallArgs, CallHook, CallOutcome};

/// Monotonic per-method invocation counts for the process lifetime.
#[derive(Debug)]
pub struct CallCounters {
    counts: [AtomicU64; BridgeMethod::COUNT],
}

impl CallCounters {
    /// Create a zeroed counter table.
    pub fn new() -> Self {
        Self {
            counts: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }

    /// Record one invocation of `method`.
    #[inline]
    pub fn record(&self, method: BridgeMethod) {
        self.counts[method.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for one method.
    #[inline]
    pub fn get(&self, method: BridgeMethod) -> u64 {
        self.counts[method.index()].load(Ordering::Relaxed)
    }

    /// Total invocations across all methods.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| c.load(Ordering::Relaxed)).sum()
    }

    /// Non-zero counts keyed by method.
    pub fn snapshot(&self) -> FxHashMap<BridgeMethod, u64> {
        BridgeMethod::ALL
            .iter()
            .filter_map(|&method| {
                let count = self.get(method);
                (count > 0).then_some((method, count))
            })
            .collect()
    }

    /// Emit one line per invoked method, sorted by method name.
    ///
    /// Intended for end-of-run diagnostics.
    pub fn report(&self, sink: &dyn TraceSink) {
        let mut rows: Vec<(&str, u64)> = BridgeMethod::ALL
            .iter()
            .filter_map(|&method| {
                let count = self.get(method);
                (count > 0).then_some((method.name(), count))
            })
            .collect();
        rows.sort_unstable();
        for (name, count) in rows {
            sink.line(&format!("{count:>12} {name}"));
        }
    }
}

impl Default for CallCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Hook that counts each call before it runs.
///
/// `after` is a no-op: the counter measures genuine calls, not
/// observation or formatting overhead layered above it.
#[derive(Debug, Clone)]
pub struct CountingHook {
    counters: Arc<CallCounters>,
}

impl CountingHook {
    /// Create a hook feeding the given counters.
    pub fn new(counters: Arc<CallCounters>) -> Self {
        Self { counters }
    }
}

impl CallHook for CountingHook {
    fn before(&self, method: BridgeMethod, _args: CallArgs<'_>) -> Result<(), HookError> {
        self.counters.record(method);
        Ok(())
    }

    fn after(
        &self,
        _method: BridgeMethod,
        _args: CallArgs<'_>,
        _outcome: CallOutcome<'_>,
    ) -> Result<(), HookError> {
        Ok(())
    }
}
