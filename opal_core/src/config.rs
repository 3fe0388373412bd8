//! Process-wide instrumentation flags.
//!
//! The flags are read once, at process start, and handed to the event
//! listener by value. Nothing in this module is globally mutable; code
//! that wants different flags constructs a different config.

use crate::snapshot::{ConfigSnapshot, ConfigValue};

/// Environment variable enabling per-method bridge call counting.
pub const ENV_COUNT_CALLS: &str = "OPAL_COUNT_CALLS";
/// Environment variable enabling one trace line per bridge call.
pub const ENV_LOG_CALLS: &str = "OPAL_LOG_CALLS";
/// Environment variable enabling structured dumps on code installation.
pub const ENV_DUMP_ON_INSTALL: &str = "OPAL_DUMP_ON_INSTALL";
/// Environment variable enabling disassembly logs on code installation.
pub const ENV_LOG_INSTALL: &str = "OPAL_LOG_INSTALL";
/// Environment variable enabling the config report at initialization.
pub const ENV_PRINT_CONFIG: &str = "OPAL_PRINT_CONFIG";

/// Flags controlling the instrumentation of the compiler-to-VM bridge.
///
/// The default is everything off: the bridge is handed back untouched and
/// lifecycle notifications perform no diagnostic work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentationConfig {
    /// Count every call crossing the bridge, per method.
    pub count_calls: bool,
    /// Emit one trace line per call crossing the bridge.
    pub log_calls: bool,
    /// Dump compilation artifacts when code is installed.
    pub dump_on_install: bool,
    /// Log disassembly when code is installed.
    pub log_install: bool,
    /// Print the runtime configuration after bridge initialization.
    pub print_config: bool,
}

impl InstrumentationConfig {
    /// All instrumentation off.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Everything on. Used by tests and debugging sessions.
    pub fn all_enabled() -> Self {
        Self {
            count_calls: true,
            log_calls: true,
            dump_on_install: true,
            log_install: true,
            print_config: true,
        }
    }

    /// Read the flags from the environment.
    ///
    /// Intended to be called once at startup; a flag is on when its
    /// variable is set to `1` or `true` (case-insensitive).
    pub fn from_env() -> Self {
        Self {
            count_calls: env_flag(ENV_COUNT_CALLS),
            log_calls: env_flag(ENV_LOG_CALLS),
            dump_on_install: env_flag(ENV_DUMP_ON_INSTALL),
            log_install: env_flag(ENV_LOG_INSTALL),
            print_config: env_flag(ENV_PRINT_CONFIG),
        }
    }

    /// Capture the flags as a printable snapshot.
    pub fn snapshot(&self) -> ConfigSnapshot {
        let mut snap = ConfigSnapshot::new();
        snap.record("count_calls", Ok(ConfigValue::Bool(self.count_calls)));
        snap.record("log_calls", Ok(ConfigValue::Bool(self.log_calls)));
        snap.record("dump_on_install", Ok(ConfigValue::Bool(self.dump_on_install)));
        snap.record("log_install", Ok(ConfigValue::Bool(self.log_install)));
        snap.record("print_config", Ok(ConfigValue::Bool(self.print_config)));
        snap
    }
}

fn env_flag(name: &str) -> bool {
    match std::env::var(name) {
        Ok(value) => {
            let value = value.trim();
            value == "1" || value.eq_ignore_ascii_case("true")
        }
        Err(_) => false,
    }
}
