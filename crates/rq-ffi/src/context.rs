use std::os::raw::c_void;
use std::sync::Arc;

use rq_core::{RequantConfig, Requantizer};

use crate::trace::CallbackSink;
use crate::types::{RQRoundingPolicy, RQTraceCallback};

/// Opaque handle owning a requantizer with an explicit configuration.
pub struct RQRequantizer {
    pub inner: Requantizer,
}

impl RQRequantizer {
    pub fn new(
        policy: RQRoundingPolicy,
        diagnostics: bool,
        callback: RQTraceCallback,
        user_data: *mut c_void,
    ) -> Self {
        let config = RequantConfig::new(policy.into(), diagnostics);
        let sink = Arc::new(CallbackSink::new(callback, user_data));
        Self {
            inner: Requantizer::with_sink(config, sink),
        }
    }
}
