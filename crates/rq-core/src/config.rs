use std::collections::HashMap;

use crate::diagnostics::DiagnosticSink;
use crate::policy::RoundingPolicy;

/// Key selecting the rounding policy. `EV` selects round-to-even.
pub const ROUNDING_MODE_KEY: &str = "TF_QUANTIZED_ROUND";

/// Key enabling operand tracing. Any non-empty value enables it.
pub const SHOW_DATA_KEY: &str = "TF_SHOW_DATA";

/// A string key/value lookup the configuration is sampled from.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads settings from the process environment.
///
/// A value that is not valid UTF-8 is still present; it is converted lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfig;

impl ConfigSource for EnvConfig {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }
}

/// In-memory settings, for embedding applications and tests.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value. Returns self for builder-style usage.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

impl ConfigSource for MapConfig {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Resolved, immutable configuration for a `Requantizer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequantConfig {
    /// Rounding policy used for every call.
    pub policy: RoundingPolicy,
    /// Whether the diagnostic sink receives before/after traces.
    pub diagnostics: bool,
}

impl RequantConfig {
    pub fn new(policy: RoundingPolicy, diagnostics: bool) -> Self {
        Self {
            policy,
            diagnostics,
        }
    }

    /// Sample both settings from `source`.
    ///
    /// An unrecognized rounding mode is reported to `sink` and falls back to
    /// the default policy.
    pub fn from_source(source: &dyn ConfigSource, sink: &dyn DiagnosticSink) -> Self {
        Self {
            policy: RoundingPolicy::from_config_value(
                source.get(ROUNDING_MODE_KEY).as_deref(),
                sink,
            ),
            diagnostics: diagnostics_flag(source),
        }
    }
}

/// True iff `SHOW_DATA_KEY` is present and non-empty, whatever its content.
pub(crate) fn diagnostics_flag(source: &dyn ConfigSource) -> bool {
    source
        .get(SHOW_DATA_KEY)
        .map(|v| !v.is_empty())
        .unwrap_or(false)
}
