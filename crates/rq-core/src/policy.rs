use std::fmt;
use std::sync::OnceLock;

use crate::config::{diagnostics_flag, ConfigSource, EnvConfig, RequantConfig, ROUNDING_MODE_KEY};
use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::round_to_even::RoundToEven;
use crate::single_rounding::SingleRounding;
use crate::strategy::RoundingStrategy;

/// Process-wide rounding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundingPolicy {
    /// Single biased rounding shift (the default).
    #[default]
    SingleRounding,
    /// Unbiased round-half-to-even.
    RoundToEven,
}

impl RoundingPolicy {
    /// Map a rounding-mode setting to a policy.
    ///
    /// - absent or empty => `SingleRounding`
    /// - `"EV"` => `RoundToEven`
    /// - anything else => `SingleRounding`, with a warning sent to `sink`
    pub fn from_config_value(value: Option<&str>, sink: &dyn DiagnosticSink) -> RoundingPolicy {
        match value {
            None | Some("") => RoundingPolicy::SingleRounding,
            Some("EV") => RoundingPolicy::RoundToEven,
            Some(other) => {
                sink.warn(&format!(
                    "unrecognized rounding mode {:?} in {}, using {}",
                    other,
                    ROUNDING_MODE_KEY,
                    RoundingPolicy::SingleRounding
                ));
                RoundingPolicy::SingleRounding
            }
        }
    }

    /// Returns the strategy implementing this policy.
    pub fn strategy(&self) -> Box<dyn RoundingStrategy> {
        match self {
            RoundingPolicy::SingleRounding => Box::new(SingleRounding),
            RoundingPolicy::RoundToEven => Box::new(RoundToEven),
        }
    }
}

impl fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingPolicy::SingleRounding => write!(f, "single-rounding"),
            RoundingPolicy::RoundToEven => write!(f, "round-to-even"),
        }
    }
}

/// Memoizes the policy and the diagnostics flag, each sampled at most once.
///
/// Concurrent first callers block until the winning thread has initialized
/// the value, so every caller sees the same result and an unrecognized
/// rounding mode is warned about once.
#[derive(Debug, Default)]
pub struct PolicyCell {
    policy: OnceLock<RoundingPolicy>,
    diagnostics: OnceLock<bool>,
}

impl PolicyCell {
    pub const fn new() -> Self {
        Self {
            policy: OnceLock::new(),
            diagnostics: OnceLock::new(),
        }
    }

    pub fn policy(&self, source: &dyn ConfigSource, sink: &dyn DiagnosticSink) -> RoundingPolicy {
        *self.policy.get_or_init(|| {
            RoundingPolicy::from_config_value(source.get(ROUNDING_MODE_KEY).as_deref(), sink)
        })
    }

    pub fn diagnostics_enabled(&self, source: &dyn ConfigSource) -> bool {
        *self.diagnostics.get_or_init(|| diagnostics_flag(source))
    }

    pub fn config(&self, source: &dyn ConfigSource, sink: &dyn DiagnosticSink) -> RequantConfig {
        RequantConfig::new(self.policy(source, sink), self.diagnostics_enabled(source))
    }
}

static PROCESS_CONFIG: PolicyCell = PolicyCell::new();

/// The process-wide rounding policy, sampled from the environment on first use.
pub fn resolve_policy() -> RoundingPolicy {
    PROCESS_CONFIG.policy(&EnvConfig, &LogSink)
}

/// Whether process-wide operand tracing is enabled, sampled on first use.
pub fn resolve_diagnostics_enabled() -> bool {
    PROCESS_CONFIG.diagnostics_enabled(&EnvConfig)
}
