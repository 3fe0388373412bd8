//! Point-in-time views of runtime configuration.
//!
//! A [`ConfigSnapshot`] is captured once, printed in sorted field order,
//! and not retained. Field reads are best-effort: a field whose value
//! cannot be read is skipped and counted, never fatal.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::FieldReadError;
use crate::trace::TraceSink;

/// A single configuration value in printable form.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Machine address or other value best shown in hex.
    Address(u64),
    /// Floating-point value.
    Float(f64),
    /// String value.
    Str(String),
}

impl ConfigValue {
    /// Short type name used in the report's first column.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Address(_) => "address",
            ConfigValue::Float(_) => "float",
            ConfigValue::Str(_) => "str",
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(v) => write!(f, "{v}"),
            ConfigValue::Int(v) => write!(f, "{v}"),
            ConfigValue::Address(v) => write!(f, "{v:#x}"),
            ConfigValue::Float(v) => write!(f, "{v}"),
            ConfigValue::Str(v) => f.write_str(v),
        }
    }
}

/// An immutable mapping from field name to value, captured at print time.
///
/// Iteration order is lexicographic by field name regardless of insertion
/// order, so reports are deterministic and reproducible.
#[derive(Debug, Default, Clone)]
pub struct ConfigSnapshot {
    fields: BTreeMap<String, ConfigValue>,
    skipped: u64,
}

impl ConfigSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one field read.
    ///
    /// Successful reads are kept; failed reads are skipped and counted on
    /// the [`skipped_fields`](Self::skipped_fields) diagnostic counter.
    pub fn record(&mut self, name: impl Into<String>, value: Result<ConfigValue, FieldReadError>) {
        let name = name.into();
        match value {
            Ok(value) => {
                self.fields.insert(name, value);
            }
            Err(err) => {
                self.skipped += 1;
                tracing::debug!(target: "opal::config", "skipping field {name}: {err}");
            }
        }
    }

    /// Number of fields whose read failed during capture.
    pub fn skipped_fields(&self) -> u64 {
        self.skipped
    }

    /// Number of captured fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the snapshot holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a captured field by name.
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.fields.get(name)
    }

    /// Iterate fields in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Print every captured field, one line each, sorted by field name.
    ///
    /// Line format: right-aligned type name, left-aligned field name,
    /// pretty-printed value. Returns the number of lines emitted.
    pub fn print_to(&self, sink: &dyn TraceSink) -> usize {
        for (name, value) in self.iter() {
            sink.line(&format!("{:>9} {:<40} = {}", value.type_name(), name, value));
        }
        self.fields.len()
    }
}
