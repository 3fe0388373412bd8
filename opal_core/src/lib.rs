//! Core diagnostics types for the Opal runtime.
//!
//! This crate holds the leaf types shared by the runtime's instrumentation
//! surfaces:
//!
//! - **Errors**: the failure taxonomy for the compiler-to-VM boundary
//!   (bridge failures, hook failures, diagnostic-path failures)
//! - **Configuration**: the process-wide instrumentation flags, read once
//!   at startup
//! - **Snapshots**: point-in-time, printable views of configuration objects
//! - **Trace sinks**: the line-oriented output channel used by call
//!   tracing, disassembly logs, and config reports

pub mod config;
pub mod error;
pub mod snapshot;
pub mod trace;

pub use config::InstrumentationConfig;
pub use error::{BridgeError, BridgeResult, DiagnosticError, FieldReadError, HookError};
pub use snapshot::{ConfigSnapshot, ConfigValue};
pub use trace::{BufferSink, NullSink, TraceSink, TracingSink};
