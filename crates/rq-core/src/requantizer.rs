use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::config::RequantConfig;
use crate::diagnostics::{DiagnosticSink, LogSink, Operands, TraceEvent};
use crate::error::{RequantError, Result};
use crate::output::OutputStage;
use crate::policy::{resolve_diagnostics_enabled, resolve_policy};
use crate::strategy::RoundingStrategy;

/// Applies quantized multipliers with a fixed rounding strategy.
///
/// The configuration is injected at construction and never changes, so a
/// single `Requantizer` can be shared by every worker of a matrix
/// computation.
pub struct Requantizer {
    strategy: Box<dyn RoundingStrategy>,
    diagnostics: bool,
    sink: Arc<dyn DiagnosticSink>,
}

impl Requantizer {
    /// Build from a resolved configuration, tracing through the `log` facade.
    pub fn new(config: RequantConfig) -> Self {
        Self::with_sink(config, Arc::new(LogSink))
    }

    pub fn with_sink(config: RequantConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_strategy(config.policy.strategy(), config.diagnostics, sink)
    }

    /// Build around an arbitrary strategy.
    pub fn with_strategy(
        strategy: Box<dyn RoundingStrategy>,
        diagnostics: bool,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            strategy,
            diagnostics,
            sink,
        }
    }

    /// Build from the process-wide configuration.
    pub fn from_process_config() -> Self {
        Self::new(RequantConfig::new(
            resolve_policy(),
            resolve_diagnostics_enabled(),
        ))
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    /// Scale one accumulator.
    #[inline]
    pub fn apply(&self, x: i32, multiplier: i32, shift: i32) -> Result<i32> {
        if !self.diagnostics {
            return self.strategy.scale(x, multiplier, shift);
        }

        let operands = Operands {
            x,
            multiplier,
            shift,
        };
        self.sink.trace(&TraceEvent::Before(operands));
        let result = self.strategy.scale(x, multiplier, shift)?;
        self.sink.trace(&TraceEvent::After { operands, result });
        Ok(result)
    }

    /// Scale every accumulator in place with one multiplier and shift.
    pub fn apply_slice(&self, acc: &mut [i32], multiplier: i32, shift: i32) -> Result<()> {
        for v in acc.iter_mut() {
            *v = self.apply(*v, multiplier, shift)?;
        }
        Ok(())
    }

    /// Scale row-major `[channels, cols]` accumulators in place, with
    /// channel `r` using `multipliers[r]` and `shifts[r]`.
    pub fn apply_per_channel(
        &self,
        acc: &mut [i32],
        multipliers: &[i32],
        shifts: &[i32],
    ) -> Result<()> {
        let channels = multipliers.len();
        if shifts.len() != channels {
            return Err(RequantError::ChannelMismatch {
                what: "shifts",
                expected: channels,
                got: shifts.len(),
            });
        }
        if channels == 0 {
            if acc.is_empty() {
                return Ok(());
            }
            return Err(RequantError::ChannelMismatch {
                what: "multipliers",
                expected: 1,
                got: 0,
            });
        }
        if acc.len() % channels != 0 {
            return Err(RequantError::ChannelMismatch {
                what: "accumulators",
                expected: (acc.len() / channels + 1) * channels,
                got: acc.len(),
            });
        }

        let cols = acc.len() / channels;
        for (r, row) in acc.chunks_mut(cols.max(1)).enumerate() {
            self.apply_slice(row, multipliers[r], shifts[r])?;
        }
        Ok(())
    }

    /// Scale each accumulator and pass it through `stage`.
    pub fn requantize(
        &self,
        acc: &[i32],
        multiplier: i32,
        shift: i32,
        stage: &OutputStage,
    ) -> Result<Vec<i32>> {
        acc.iter()
            .map(|&x| self.apply(x, multiplier, shift).map(|v| stage.finish(v)))
            .collect()
    }
}

impl Default for Requantizer {
    fn default() -> Self {
        Self::new(RequantConfig::default())
    }
}

impl fmt::Debug for Requantizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Requantizer")
            .field("strategy", &self.strategy.name())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

fn process_requantizer() -> &'static Requantizer {
    static PROCESS: OnceLock<Requantizer> = OnceLock::new();
    PROCESS.get_or_init(Requantizer::from_process_config)
}

/// Scale `x` by `multiplier * 2^(shift - 31)` using the process-wide policy.
pub fn apply_multiplier(x: i32, multiplier: i32, shift: i32) -> Result<i32> {
    process_requantizer().apply(x, multiplier, shift)
}
