use std::cell::RefCell;
use std::ffi::CString;

use rq_core::RequantError;

use crate::types::RQStatus;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store an error message for later retrieval via `rq_last_error`.
pub fn set_last_error(msg: impl Into<String>) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg.into()).ok();
    });
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Record `err` as the last error and map it to a status code.
pub fn report(err: &RequantError) -> RQStatus {
    set_last_error(err.to_string());
    if err.is_precondition_violation() {
        RQStatus::ErrorPrecondition
    } else {
        RQStatus::ErrorInvalidArgument
    }
}
