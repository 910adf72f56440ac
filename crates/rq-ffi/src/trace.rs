use std::os::raw::c_void;

use rq_core::{DiagnosticSink, TraceEvent};

use crate::types::{RQTraceCallback, RQTracePhase};

/// Diagnostic sink forwarding traces to a C callback.
///
/// Warnings have no C counterpart and go to the `log` facade.
pub struct CallbackSink {
    callback: RQTraceCallback,
    user_data: *mut c_void,
}

// The caller guarantees `user_data` may be used from any thread that calls
// into the requantizer it was registered with.
unsafe impl Send for CallbackSink {}
unsafe impl Sync for CallbackSink {}

impl CallbackSink {
    pub fn new(callback: RQTraceCallback, user_data: *mut c_void) -> Self {
        Self {
            callback,
            user_data,
        }
    }
}

impl DiagnosticSink for CallbackSink {
    fn trace(&self, event: &TraceEvent) {
        let Some(cb) = self.callback else {
            log::debug!("{}", event);
            return;
        };
        let o = event.operands();
        let (phase, result) = match event {
            TraceEvent::Before(_) => (RQTracePhase::Before, 0),
            TraceEvent::After { result, .. } => (RQTracePhase::After, *result),
        };
        cb(phase, o.x, o.multiplier, o.shift, result, self.user_data);
    }

    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}
