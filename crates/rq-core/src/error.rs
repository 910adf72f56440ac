use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequantError {
    #[error("precondition violated: multiplier must be >= 0, got {0}")]
    NegativeMultiplier(i32),
    #[error("precondition violated: shift {shift} outside [{min}, {max}]")]
    ShiftOutOfRange { shift: i32, min: i32, max: i32 },
    #[error("precondition violated: shift amount {0} outside [1, 63]")]
    InvalidShiftAmount(i64),
    #[error("channel mismatch: {what} has {got} entries, expected {expected}")]
    ChannelMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("invalid output range: min {min} > max {max}")]
    InvalidOutputRange { min: i32, max: i32 },
}

impl RequantError {
    /// Returns true for the errors raised by the scaling preconditions
    /// (negative multiplier, shift out of range, unusable shift amount).
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            RequantError::NegativeMultiplier(_)
                | RequantError::ShiftOutOfRange { .. }
                | RequantError::InvalidShiftAmount(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RequantError>;
