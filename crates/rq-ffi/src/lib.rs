mod context;
mod error;
mod trace;
mod types;

pub use context::*;
pub use error::*;
pub use types::*;

use std::ffi::CString;
use std::os::raw::{c_char, c_void};
use std::panic::AssertUnwindSafe;

/// Execute a closure that returns an `RQStatus`, catching any panics
/// (including debug range assertions) as `RQStatus::ErrorInternal`.
///
/// Requantizers hold no state a panic could leave half-updated, so the
/// closure is asserted unwind safe.
fn catch_panic<F: FnOnce() -> RQStatus>(f: F) -> RQStatus {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic");
            RQStatus::ErrorInternal
        }
    }
}

/// Build a mutable slice from a C pointer/length pair. A zero length
/// accepts a null pointer.
unsafe fn slice_mut<'a>(data: *mut i32, len: usize) -> Option<&'a mut [i32]> {
    if len == 0 {
        return Some(&mut []);
    }
    if data.is_null() {
        return None;
    }
    Some(std::slice::from_raw_parts_mut(data, len))
}

unsafe fn slice_ref<'a>(data: *const i32, len: usize) -> Option<&'a [i32]> {
    if len == 0 {
        return Some(&[]);
    }
    if data.is_null() {
        return None;
    }
    Some(std::slice::from_raw_parts(data, len))
}

/// Install `env_logger` as the `log` backend. Safe to call more than once.
#[no_mangle]
pub extern "C" fn rq_init_logging() {
    let _ = env_logger::try_init();
}

/// Rounding policy of the process-wide path, resolved on first use.
#[no_mangle]
pub extern "C" fn rq_resolved_policy() -> RQRoundingPolicy {
    rq_core::resolve_policy().into()
}

/// Scale one accumulator with the process-wide policy, writing the result
/// into `*out`.
#[no_mangle]
pub unsafe extern "C" fn rq_apply_multiplier(
    x: i32,
    multiplier: i32,
    shift: i32,
    out: *mut i32,
) -> RQStatus {
    catch_panic(|| {
        if out.is_null() {
            set_last_error("out is null");
            return RQStatus::ErrorInvalidArgument;
        }
        match rq_core::apply_multiplier(x, multiplier, shift) {
            Ok(v) => {
                unsafe { *out = v };
                RQStatus::Ok
            }
            Err(e) => report(&e),
        }
    })
}

/// Shift `value` right by `amount` bits, rounding ties to even.
#[no_mangle]
pub unsafe extern "C" fn rq_round_to_even(value: i64, amount: u32, out: *mut i64) -> RQStatus {
    if out.is_null() {
        set_last_error("out is null");
        return RQStatus::ErrorInvalidArgument;
    }
    match rq_core::round_to_even(value, amount) {
        Ok(v) => {
            *out = v;
            RQStatus::Ok
        }
        Err(e) => report(&e),
    }
}

/// Create a requantizer with an explicit policy.
///
/// When `diagnostics` is true, `callback` (if non-null) receives a trace
/// before and after each scaling call, together with `user_data`. The
/// caller must later call `rq_requantizer_destroy`.
#[no_mangle]
pub extern "C" fn rq_requantizer_create(
    policy: RQRoundingPolicy,
    diagnostics: bool,
    callback: RQTraceCallback,
    user_data: *mut c_void,
    out: *mut *mut RQRequantizer,
) -> RQStatus {
    catch_panic(|| {
        if out.is_null() {
            set_last_error("out is null");
            return RQStatus::ErrorInvalidArgument;
        }
        let rq = Box::new(RQRequantizer::new(policy, diagnostics, callback, user_data));
        unsafe {
            *out = Box::into_raw(rq);
        }
        RQStatus::Ok
    })
}

/// Destroy a requantizer previously created by `rq_requantizer_create`.
///
/// Passing a null pointer is a no-op and returns `RQStatus::Ok`.
#[no_mangle]
pub unsafe extern "C" fn rq_requantizer_destroy(rq: *mut RQRequantizer) -> RQStatus {
    if rq.is_null() {
        return RQStatus::Ok;
    }
    drop(Box::from_raw(rq));
    RQStatus::Ok
}

/// Scale one accumulator, writing the result into `*out`.
#[no_mangle]
pub unsafe extern "C" fn rq_requantizer_apply(
    rq: *const RQRequantizer,
    x: i32,
    multiplier: i32,
    shift: i32,
    out: *mut i32,
) -> RQStatus {
    catch_panic(|| {
        if rq.is_null() || out.is_null() {
            set_last_error("null argument");
            return RQStatus::ErrorInvalidArgument;
        }
        let rq = unsafe { &*rq };
        match rq.inner.apply(x, multiplier, shift) {
            Ok(v) => {
                unsafe { *out = v };
                RQStatus::Ok
            }
            Err(e) => report(&e),
        }
    })
}

/// Scale `len` accumulators at `data` in place.
#[no_mangle]
pub unsafe extern "C" fn rq_requantizer_apply_slice(
    rq: *const RQRequantizer,
    data: *mut i32,
    len: usize,
    multiplier: i32,
    shift: i32,
) -> RQStatus {
    catch_panic(|| {
        if rq.is_null() {
            set_last_error("null argument");
            return RQStatus::ErrorInvalidArgument;
        }
        let rq = unsafe { &*rq };
        let Some(acc) = (unsafe { slice_mut(data, len) }) else {
            set_last_error("data is null");
            return RQStatus::ErrorInvalidArgument;
        };
        match rq.inner.apply_slice(acc, multiplier, shift) {
            Ok(()) => RQStatus::Ok,
            Err(e) => report(&e),
        }
    })
}

/// Scale row-major `[channels, len / channels]` accumulators in place with
/// per-channel multipliers and shifts.
#[no_mangle]
pub unsafe extern "C" fn rq_requantizer_apply_per_channel(
    rq: *const RQRequantizer,
    data: *mut i32,
    len: usize,
    multipliers: *const i32,
    shifts: *const i32,
    channels: usize,
) -> RQStatus {
    catch_panic(|| {
        if rq.is_null() {
            set_last_error("null argument");
            return RQStatus::ErrorInvalidArgument;
        }
        let rq = unsafe { &*rq };
        let slices = unsafe {
            (
                slice_mut(data, len),
                slice_ref(multipliers, channels),
                slice_ref(shifts, channels),
            )
        };
        let (Some(acc), Some(multipliers), Some(shifts)) = slices else {
            set_last_error("null buffer");
            return RQStatus::ErrorInvalidArgument;
        };
        match rq.inner.apply_per_channel(acc, multipliers, shifts) {
            Ok(()) => RQStatus::Ok,
            Err(e) => report(&e),
        }
    })
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error on this
/// thread, or null if there is none. The caller must free the returned
/// string with `rq_free_string`.
#[no_mangle]
pub extern "C" fn rq_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `rq_last_error`.
#[no_mangle]
pub unsafe extern "C" fn rq_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
