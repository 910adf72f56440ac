use std::os::raw::c_void;

use rq_core::RoundingPolicy;

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RQStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorPrecondition = 2,
    ErrorInternal = 3,
}

/// Rounding policy selector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RQRoundingPolicy {
    SingleRounding = 0,
    RoundToEven = 1,
}

impl From<RQRoundingPolicy> for RoundingPolicy {
    fn from(p: RQRoundingPolicy) -> Self {
        match p {
            RQRoundingPolicy::SingleRounding => RoundingPolicy::SingleRounding,
            RQRoundingPolicy::RoundToEven => RoundingPolicy::RoundToEven,
        }
    }
}

impl From<RoundingPolicy> for RQRoundingPolicy {
    fn from(p: RoundingPolicy) -> Self {
        match p {
            RoundingPolicy::SingleRounding => RQRoundingPolicy::SingleRounding,
            RoundingPolicy::RoundToEven => RQRoundingPolicy::RoundToEven,
        }
    }
}

/// Which side of a scaling call a trace callback is reporting.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RQTracePhase {
    Before = 0,
    After = 1,
}

/// Callback receiving operand traces. `result` is 0 for `Before`.
pub type RQTraceCallback = Option<
    extern "C" fn(
        phase: RQTracePhase,
        x: i32,
        multiplier: i32,
        shift: i32,
        result: i32,
        user_data: *mut c_void,
    ),
>;
