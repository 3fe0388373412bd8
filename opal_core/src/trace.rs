//! Line-oriented trace output.
//!
//! The runtime's diagnostic surfaces (call tracing, disassembly logs,
//! config reports) all write discrete lines to a shared sink. A sink may
//! be written from any compilation thread and must serialize concurrent
//! writes itself.

use parking_lot::Mutex;

/// A line-oriented diagnostic sink shared by all instrumentation layers.
pub trait TraceSink: Send + Sync {
    /// Emit one complete line.
    fn line(&self, line: &str);
}

/// Routes lines to the `tracing` subscriber at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn line(&self, line: &str) {
        tracing::info!(target: "opal::bridge", "{line}");
    }
}

/// Discards every line.
///
/// Used where a sink is required but output is not, e.g. benchmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn line(&self, _line: &str) {}
}

/// Captures lines in memory for later inspection.
///
/// Used by tests and by embedders that surface diagnostics in their own
/// UI instead of a log stream.
#[derive(Debug, Default)]
pub struct BufferSink {
    lines: Mutex<Vec<String>>,
}

impl BufferSink {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything captured so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Drain the captured lines.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }

    /// Number of lines captured so far.
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl TraceSink for BufferSink {
    fn line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}
