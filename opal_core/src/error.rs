//! Error types for the compiler-to-VM boundary.
//!
//! The taxonomy follows the recovery policy, not the call site:
//!
//! - [`BridgeError`]: the underlying bridge failed. Propagated verbatim
//!   through every interception layer to the original caller.
//! - [`HookError`]: an instrumentation hook failed. Recovered locally by
//!   the interceptor; never reaches the bridge caller.
//! - [`DiagnosticError`]: a diagnostic collaborator (dump sink,
//!   disassembler) failed. Propagated from the install notification path.
//! - [`FieldReadError`]: one configuration field could not be read.
//!   Skipped per field during snapshot capture.

use thiserror::Error;

/// The result type for calls crossing the compiler-to-VM bridge.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failure raised by the runtime while servicing a bridge call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A named type could not be resolved by the runtime.
    #[error("unresolved type: {name}")]
    UnresolvedType {
        /// The fully qualified name that failed to resolve.
        name: String,
    },

    /// Method lookup failed on a resolved type.
    #[error("unresolved method: {name} on type #{owner}")]
    UnresolvedMethod {
        /// Raw handle of the owning type.
        owner: u64,
        /// The method name that failed to resolve.
        name: String,
    },

    /// A handle crossing the bridge no longer refers to a live entity.
    #[error("stale handle: {message}")]
    StaleHandle {
        /// What the handle referred to.
        message: String,
    },

    /// The runtime rejected a code installation.
    #[error("code installation rejected: {message}")]
    InstallRejected {
        /// Why the artifact was rejected.
        message: String,
    },

    /// The runtime-side code cache has no room for the artifact.
    #[error("code cache full: requested {requested} bytes")]
    CodeCacheFull {
        /// Size of the rejected artifact in bytes.
        requested: usize,
    },

    /// Invariant violation inside the runtime.
    #[error("internal runtime error: {message}")]
    Internal {
        /// Description of the violated invariant.
        message: String,
    },
}

impl BridgeError {
    /// Create an unresolved-type error.
    #[must_use]
    pub fn unresolved_type(name: impl Into<String>) -> Self {
        Self::UnresolvedType { name: name.into() }
    }

    /// Create an unresolved-method error.
    #[must_use]
    pub fn unresolved_method(owner: u64, name: impl Into<String>) -> Self {
        Self::UnresolvedMethod {
            owner,
            name: name.into(),
        }
    }

    /// Create a stale-handle error.
    #[must_use]
    pub fn stale_handle(message: impl Into<String>) -> Self {
        Self::StaleHandle {
            message: message.into(),
        }
    }

    /// Create an install-rejected error.
    #[must_use]
    pub fn install_rejected(message: impl Into<String>) -> Self {
        Self::InstallRejected {
            message: message.into(),
        }
    }

    /// Create an internal runtime error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Failure raised by an instrumentation hook.
///
/// A hook failure is a defect in the instrumentation itself. The
/// interceptor reports and counts it, then drops it; the outcome of the
/// observed call is never affected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("instrumentation hook failed: {message}")]
pub struct HookError {
    /// What went wrong inside the hook.
    pub message: String,
}

impl HookError {
    /// Create a hook error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure on a diagnostics-only path (dump, disassembly).
///
/// These paths are developer-facing and rare; the install notification
/// propagates them instead of masking a broken collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticError {
    /// The code-cache collaborator could not disassemble installed code.
    #[error("disassembly failed: {message}")]
    Disassembly {
        /// Disassembler failure description.
        message: String,
    },

    /// The structured dump sink rejected a payload.
    #[error("dump failed: {message}")]
    Dump {
        /// Dump sink failure description.
        message: String,
    },
}

impl DiagnosticError {
    /// Create a disassembly error.
    #[must_use]
    pub fn disassembly(message: impl Into<String>) -> Self {
        Self::Disassembly {
            message: message.into(),
        }
    }

    /// Create a dump error.
    #[must_use]
    pub fn dump(message: impl Into<String>) -> Self {
        Self::Dump {
            message: message.into(),
        }
    }
}

/// A configuration field whose value could not be read at capture time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("config field unreadable: {message}")]
pub struct FieldReadError {
    /// Why the field read failed.
    pub message: String,
}

impl FieldReadError {
    /// Create a field-read error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_error_display() {
        let err = BridgeError::unresolved_type("core.List");
        assert_eq!(err.to_string(), "unresolved type: core.List");

        let err = BridgeError::unresolved_method(7, "append");
        assert_eq!(err.to_string(), "unresolved method: append on type #7");

        let err = BridgeError::CodeCacheFull { requested: 4096 };
        assert_eq!(err.to_string(), "code cache full: requested 4096 bytes");
    }

    #[test]
    fn test_bridge_error_equality_survives_clone() {
        let err = BridgeError::stale_handle("installed code #3");
        assert_eq!(err, err.clone());
    }

    #[test]
    fn test_hook_error_display() {
        let err = HookError::new("sink closed");
        assert_eq!(err.to_string(), "instrumentation hook failed: sink closed");
    }

    #[test]
    fn test_diagnostic_error_display() {
        let err = DiagnosticError::disassembly("unknown opcode 0xf1");
        assert_eq!(err.to_string(), "disassembly failed: unknown opcode 0xf1");

        let err = DiagnosticError::dump("disk full");
        assert_eq!(err.to_string(), "dump failed: disk full");
    }
}
