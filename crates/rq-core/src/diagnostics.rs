use std::fmt;

/// Operand snapshot passed to a `DiagnosticSink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operands {
    pub x: i32,
    pub multiplier: i32,
    pub shift: i32,
}

/// A trace point around one scaling call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEvent {
    /// Fired before dispatching to the rounding strategy.
    Before(Operands),
    /// Fired after the strategy returned successfully.
    After { operands: Operands, result: i32 },
}

impl TraceEvent {
    pub fn tag(&self) -> &'static str {
        match self {
            TraceEvent::Before(_) => "before",
            TraceEvent::After { .. } => "after",
        }
    }

    pub fn operands(&self) -> &Operands {
        match self {
            TraceEvent::Before(operands) => operands,
            TraceEvent::After { operands, .. } => operands,
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.operands();
        match self {
            TraceEvent::Before(_) => write!(
                f,
                "before scaling: x={} multiplier={} shift={}",
                o.x, o.multiplier, o.shift
            ),
            TraceEvent::After { result, .. } => write!(
                f,
                "after scaling: x={} multiplier={} shift={} result={}",
                o.x, o.multiplier, o.shift, result
            ),
        }
    }
}

/// Collaborator receiving operand traces and configuration warnings.
///
/// Where the text ends up is up to the implementation.
pub trait DiagnosticSink: Send + Sync {
    /// Record a trace point. Only called when diagnostics are enabled.
    fn trace(&self, event: &TraceEvent);

    /// Report a non-fatal problem, such as an unrecognized rounding mode.
    fn warn(&self, message: &str);
}

/// Sink forwarding to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn trace(&self, event: &TraceEvent) {
        log::debug!("{}", event);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn trace(&self, _event: &TraceEvent) {}

    fn warn(&self, _message: &str) {}
}
