//! One trace line per bridge call.
//!
//! The logging layer sits outermost in the wrap order, so its lines
//! describe calls the counting layer has already recorded. `before`
//! emits nothing; the line is written in `after` so it can carry the
//! outcome.

use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use opal_core::{HookError, TraceSink};

use crate::bridge::BridgeMethod;
use crate::intercept::{CallArgs, CallHook, CallOutcome};

/// Placeholder for a value whose `Debug` impl reports an error.
const UNPRINTABLE: &str = "<unprintable>";

/// Hook that emits one line per completed call: method name, arguments,
/// and the result or failure description.
pub struct LoggingHook {
    sink: Arc<dyn TraceSink>,
}

impl LoggingHook {
    /// Create a hook writing to the given sink.
    pub fn new(sink: Arc<dyn TraceSink>) -> Self {
        Self { sink }
    }
}

impl CallHook for LoggingHook {
    fn before(&self, _method: BridgeMethod, _args: CallArgs<'_>) -> Result<(), HookError> {
        Ok(())
    }

    fn after(
        &self,
        method: BridgeMethod,
        args: CallArgs<'_>,
        outcome: CallOutcome<'_>,
    ) -> Result<(), HookError> {
        let mut line = String::with_capacity(64);
        line.push_str(method.name());
        line.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                line.push_str(", ");
            }
            push_rendered(&mut line, format_args!("{arg:?}"));
        }
        line.push(')');
        match outcome {
            CallOutcome::Ok(value) => {
                line.push_str(" -> ");
                push_rendered(&mut line, format_args!("{value:?}"));
            }
            CallOutcome::Err(err) => {
                line.push_str(" ! ");
                push_rendered(&mut line, format_args!("{err}"));
            }
        }
        self.sink.line(&line);
        Ok(())
    }
}

/// Append rendered text, rolling back to a placeholder when the value's
/// formatting impl fails partway through.
fn push_rendered(line: &mut String, value: fmt::Arguments<'_>) {
    let start = line.len();
    if line.write_fmt(value).is_err() {
        line.truncate(start);
        line.push_str(UNPRINTABLE);
    }
}
