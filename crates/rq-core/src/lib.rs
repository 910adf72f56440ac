//! `rq-core` - Quantized-multiplier application for fixed-point inference.
//!
//! This crate provides:
//! - The single-rounding and round-to-even scaling primitives
//! - A `RoundingStrategy` trait with one implementation per rounding policy
//! - Configuration sources and a once-only `PolicyCell` for policy resolution
//! - An injectable `DiagnosticSink` for operand tracing
//! - The `Requantizer` dispatcher, including batch and per-channel forms

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod policy;
pub mod requantizer;
pub mod round_to_even;
pub mod single_rounding;
pub mod strategy;

// Re-export primary types at the crate root for convenience.
pub use config::{ConfigSource, EnvConfig, MapConfig, RequantConfig};
pub use diagnostics::{DiagnosticSink, LogSink, NullSink, Operands, TraceEvent};
pub use error::{RequantError, Result};
pub use output::OutputStage;
pub use policy::{resolve_diagnostics_enabled, resolve_policy, PolicyCell, RoundingPolicy};
pub use requantizer::{apply_multiplier, Requantizer};
pub use round_to_even::{
    round_to_even, scale_round_to_even, scale_round_to_even_intended, RoundToEven,
};
pub use single_rounding::{scale_single, scale_single_wide, SingleRounding};
pub use strategy::RoundingStrategy;

/// Smallest legal value of the `shift` parameter (a right shift by 31).
pub const MIN_SHIFT: i32 = -31;

/// Largest legal value of the `shift` parameter (a left shift by 7).
pub const MAX_SHIFT: i32 = 7;
