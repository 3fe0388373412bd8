//! Interception overhead benchmarks.
//!
//! Measures the per-call cost the observation layers add on top of a
//! trivial bridge implementation:
//!
//! - **raw**: the bridge called directly
//! - **counted**: one counting layer (atomic increment per call)
//! - **counted_logged**: counting plus logging into a discard sink
//!   (line formatting dominates)
//!
//! The disabled configuration has no entry here on purpose: with the
//! flags off the listener returns the input bridge unchanged, so there
//! is nothing to measure.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use opal_bridge::{
    CallCounters, CompilationArtifact, CountingHook, InstalledCode, Intercepted, LoggingHook,
    MethodHandle, TypeHandle, VmBridge,
};
use opal_core::{BridgeResult, NullSink};

/// Bridge whose methods do no work, isolating the layer overhead.
#[derive(Debug, Default)]
struct InertBridge;

impl VmBridge for InertBridge {
    fn resolve_type(&self, name: &str) -> BridgeResult<TypeHandle> {
        Ok(TypeHandle(name.len() as u64))
    }

    fn resolve_method(&self, owner: TypeHandle, name: &str) -> BridgeResult<MethodHandle> {
        Ok(MethodHandle(owner.0 + name.len() as u64))
    }

    fn method_bytecode(&self, method: MethodHandle) -> BridgeResult<Arc<[u8]>> {
        Ok(Arc::from(vec![method.0 as u8]))
    }

    fn invocation_count(&self, method: MethodHandle) -> BridgeResult<u64> {
        Ok(method.0)
    }

    fn install_code(
        &self,
        method: MethodHandle,
        artifact: &CompilationArtifact,
    ) -> BridgeResult<InstalledCode> {
        Ok(InstalledCode::new(
            Arc::clone(&artifact.method_name),
            method.0,
            artifact.code_size(),
        ))
    }

    fn invalidate_code(&self, _code: &InstalledCode) -> BridgeResult<()> {
        Ok(())
    }
}

fn counted(counters: &Arc<CallCounters>) -> Box<dyn VmBridge> {
    Box::new(Intercepted::new(
        Box::new(InertBridge),
        CountingHook::new(Arc::clone(counters)),
    ))
}

fn bench_bridge_call(c: &mut Criterion) {
    let mut group = c.benchmark_group("bridge_call");

    let raw = InertBridge;
    group.bench_function("raw", |b| {
        b.iter(|| raw.invocation_count(black_box(MethodHandle(7))).unwrap())
    });

    let counters = Arc::new(CallCounters::new());
    let counted_bridge = counted(&counters);
    group.bench_function("counted", |b| {
        b.iter(|| {
            counted_bridge
                .invocation_count(black_box(MethodHandle(7)))
                .unwrap()
        })
    });

    let logged_bridge: Box<dyn VmBridge> = Box::new(Intercepted::new(
        counted(&counters),
        LoggingHook::new(Arc::new(NullSink)),
    ));
    group.bench_function("counted_logged", |b| {
        b.iter(|| {
            logged_bridge
                .invocation_count(black_box(MethodHandle(7)))
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_bridge_call);
criterion_main!(benches);
