//! Shared doubles for the unit tests: a deterministic in-memory bridge
//! and a hook that records every observation.

use std::sync::Arc;

use parking_lot::Mutex;

use opal_core::{BridgeError, BridgeResult, HookError};

use crate::bridge::{
    CompilationArtifact, InstalledCode, MethodHandle, TypeHandle, VmBridge,
};
use crate::intercept::{CallArgs, CallHook, CallOutcome};
use crate::BridgeMethod;

/// Deterministic bridge: handles are derived from the inputs, and the
/// name `"missing"` fails resolution.
#[derive(Debug, Default)]
pub(crate) struct TestBridge;

impl TestBridge {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl VmBridge for TestBridge {
    fn resolve_type(&self, name: &str) -> BridgeResult<TypeHandle> {
        if name == "missing" {
            return Err(BridgeError::unresolved_type(name));
        }
        Ok(TypeHandle(name.len() as u64))
    }

    fn resolve_method(&self, owner: TypeHandle, name: &str) -> BridgeResult<MethodHandle> {
        if name == "missing" {
            return Err(BridgeError::unresolved_method(owner.0, name));
        }
        Ok(MethodHandle(owner.0 * 100 + name.len() as u64))
    }

    fn method_bytecode(&self, method: MethodHandle) -> BridgeResult<Arc<[u8]>> {
        Ok(Arc::from(vec![method.0 as u8, 0x2a]))
    }

    fn invocation_count(&self, method: MethodHandle) -> BridgeResult<u64> {
        Ok(method.0 * 10)
    }

    fn install_code(
        &self,
        method: MethodHandle,
        artifact: &CompilationArtifact,
    ) -> BridgeResult<InstalledCode> {
        if artifact.code.is_empty() {
            return Err(BridgeError::install_rejected("empty artifact"));
        }
        Ok(InstalledCode::new(
            Arc::clone(&artifact.method_name),
            0x4000 + method.0,
            artifact.code_size(),
        ))
    }

    fn invalidate_code(&self, _code: &InstalledCode) -> BridgeResult<()> {
        Ok(())
    }
}

/// Hook that records every observation as `name:stage:method[:outcome]`
/// and optionally fails after recording.
#[derive(Clone)]
pub(crate) struct RecordingHook {
    name: &'static str,
    fail: bool,
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingHook {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            fail: false,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Same hook, but every callback fails after recording.
    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    fn outcome(&self) -> Result<(), HookError> {
        if self.fail {
            Err(HookError::new("deliberate test failure"))
        } else {
            Ok(())
        }
    }
}

impl CallHook for RecordingHook {
    fn before(&self, method: BridgeMethod, _args: CallArgs<'_>) -> Result<(), HookError> {
        self.events
            .lock()
            .push(format!("{}:before:{}", self.name, method.name()));
        self.outcome()
    }

    fn after(
        &self,
        method: BridgeMethod,
        _args: CallArgs<'_>,
        outcome: CallOutcome<'_>,
    ) -> Result<(), HookError> {
        let kind = match outcome {
            CallOutcome::Ok(_) => "ok",
            CallOutcome::Err(_) => "err",
        };
        self.events
            .lock()
            .push(format!("{}:after:{}:{}", self.name, method.name(), kind));
        self.outcome()
    }
}
