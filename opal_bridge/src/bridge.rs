//! The compiler-to-VM bridge interface.
//!
//! [`VmBridge`] is the single contract through which the JIT compiler
//! calls into the hosting runtime: symbol resolution, profile queries, and
//! code installation. Exactly one implementation exists per process; the
//! event listener may layer interception around it at initialization.
//!
//! The trait, the [`BridgeMethod`] identity enum, and the forwarding impl
//! for [`Intercepted`] are generated together from one method list by the
//! `vm_bridge!` macro, so the three cannot drift apart. Adding a bridge
//! method means adding one line to the macro invocation.

use std::fmt;
use std::sync::Arc;

use opal_core::BridgeResult;

use crate::intercept::{CallHook, Intercepted};

// =============================================================================
// Bridge Handles
// =============================================================================

/// Opaque handle to a runtime-resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandle(pub u64);

/// Opaque handle to a runtime-resolved method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodHandle(pub u64);

/// Output of one JIT compilation, ready for installation.
#[derive(Debug, Clone)]
pub struct CompilationArtifact {
    /// Name of the compiled method.
    pub method_name: Arc<str>,
    /// Compilation tier that produced the code.
    pub tier: u8,
    /// Emitted machine code.
    pub code: Arc<[u8]>,
}

impl CompilationArtifact {
    /// Create an artifact.
    pub fn new(method_name: impl Into<Arc<str>>, tier: u8, code: impl Into<Arc<[u8]>>) -> Self {
        Self {
            method_name: method_name.into(),
            tier,
            code: code.into(),
        }
    }

    /// Size of the emitted code in bytes.
    #[inline]
    pub fn code_size(&self) -> usize {
        self.code.len()
    }
}

/// Code the runtime has accepted into its code cache.
#[derive(Debug, Clone)]
pub struct InstalledCode {
    /// Name of the installed method.
    pub name: Arc<str>,
    /// Entry address of the installed code.
    pub entry_address: u64,
    /// Size of the installed code in bytes.
    pub code_size: usize,
}

impl InstalledCode {
    /// Create an installed-code descriptor.
    pub fn new(name: impl Into<Arc<str>>, entry_address: u64, code_size: usize) -> Self {
        Self {
            name: name.into(),
            entry_address,
            code_size,
        }
    }
}

// =============================================================================
// Bridge Interface
// =============================================================================

/// Defines [`VmBridge`], [`BridgeMethod`], and the forwarding impl for
/// [`Intercepted`] from a single method list.
///
/// Each generated forwarding method observes the call, invokes the inner
/// implementation with the original arguments, observes the outcome, and
/// returns the inner result unchanged.
macro_rules! vm_bridge {
    (
        $(
            $(#[$doc:meta])*
            $variant:ident => fn $method:ident(&self $(, $arg:ident: $ty:ty)*) -> BridgeResult<$ok:ty>;
        )+
    ) => {
        /// The single contract through which the compiler calls into the
        /// hosting runtime.
        ///
        /// Implementations must be callable from concurrent compilation
        /// threads. Failures are returned as [`opal_core::BridgeError`]
        /// and cross every interception layer verbatim.
        pub trait VmBridge: Send + Sync {
            $(
                $(#[$doc])*
                fn $method(&self $(, $arg: $ty)*) -> BridgeResult<$ok>;
            )+
        }

        /// Identity of a bridge method, used by counters and trace lines.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BridgeMethod {
            $(
                #[doc = concat!("`", stringify!($method), "`")]
                $variant,
            )+
        }

        impl BridgeMethod {
            /// Every bridge method, in declaration order.
            pub const ALL: &'static [BridgeMethod] = &[$(BridgeMethod::$variant),+];

            /// Number of bridge methods.
            pub const COUNT: usize = Self::ALL.len();

            /// The method's source name.
            pub fn name(self) -> &'static str {
                match self {
                    $(BridgeMethod::$variant => stringify!($method),)+
                }
            }

            /// Dense index for per-method tables.
            #[inline]
            pub const fn index(self) -> usize {
                self as usize
            }
        }

        impl fmt::Display for BridgeMethod {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl<H: CallHook> VmBridge for Intercepted<H> {
            $(
                fn $method(&self $(, $arg: $ty)*) -> BridgeResult<$ok> {
                    let args: &[&dyn fmt::Debug] = &[$(&$arg),*];
                    self.hook_before(BridgeMethod::$variant, args);
                    let result = self.inner().$method($($arg),*);
                    self.hook_after(BridgeMethod::$variant, args, &result);
                    result
                }
            )+
        }
    };
}

vm_bridge! {
    /// Resolve a type by its fully qualified name.
    ResolveType => fn resolve_type(&self, name: &str) -> BridgeResult<TypeHandle>;

    /// Resolve a method declared on a previously resolved type.
    ResolveMethod => fn resolve_method(&self, owner: TypeHandle, name: &str) -> BridgeResult<MethodHandle>;

    /// Fetch the bytecode of a resolved method.
    MethodBytecode => fn method_bytecode(&self, method: MethodHandle) -> BridgeResult<Arc<[u8]>>;

    /// Read the interpreter's invocation count for a method.
    InvocationCount => fn invocation_count(&self, method: MethodHandle) -> BridgeResult<u64>;

    /// Hand a compilation artifact to the runtime for installation.
    InstallCode => fn install_code(&self, method: MethodHandle, artifact: &CompilationArtifact) -> BridgeResult<InstalledCode>;

    /// Drop previously installed code, forcing re-entry into the interpreter.
    InvalidateCode => fn invalidate_code(&self, code: &InstalledCode) -> BridgeResult<()>;
}
