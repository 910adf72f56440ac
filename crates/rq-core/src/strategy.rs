use crate::error::{RequantError, Result};
use crate::{MAX_SHIFT, MIN_SHIFT};

/// Trait for the interchangeable rounding strategies applied to a
/// quantized multiplier.
///
/// Implementations are pure: the same operands always produce the same
/// result, and they hold no mutable state, so one instance can be shared
/// across any number of worker threads.
pub trait RoundingStrategy: Send + Sync {
    /// Returns the name of this strategy (e.g., "single-rounding").
    fn name(&self) -> &str;

    /// Rescale the accumulator `x` by the fraction `multiplier * 2^(shift - 31)`.
    fn scale(&self, x: i32, multiplier: i32, shift: i32) -> Result<i32>;
}

/// Check the operand preconditions shared by every strategy.
pub(crate) fn check_operands(multiplier: i32, shift: i32) -> Result<()> {
    if multiplier < 0 {
        return Err(RequantError::NegativeMultiplier(multiplier));
    }
    if !(MIN_SHIFT..=MAX_SHIFT).contains(&shift) {
        return Err(RequantError::ShiftOutOfRange {
            shift,
            min: MIN_SHIFT,
            max: MAX_SHIFT,
        });
    }
    Ok(())
}

/// Narrow a 64-bit scaled value to i32.
///
/// Out-of-range values mean the multiplier and shift do not fit the
/// accumulator magnitude; that is a caller bug, checked in debug builds only.
#[inline]
pub(crate) fn narrow(wide: i64) -> i32 {
    debug_assert!(
        wide >= i32::MIN as i64 && wide <= i32::MAX as i64,
        "scaled value {} does not fit in i32",
        wide
    );
    wide as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_operands_bounds() {
        assert!(check_operands(0, MIN_SHIFT).is_ok());
        assert!(check_operands(i32::MAX, MAX_SHIFT).is_ok());
        assert_eq!(check_operands(-1, 0), Err(RequantError::NegativeMultiplier(-1)));
        assert!(check_operands(1, MIN_SHIFT - 1).is_err());
        assert!(check_operands(1, MAX_SHIFT + 1).is_err());
    }

    #[test]
    fn test_narrow_in_range() {
        assert_eq!(narrow(i32::MIN as i64), i32::MIN);
        assert_eq!(narrow(i32::MAX as i64), i32::MAX);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not fit in i32")]
    fn test_narrow_out_of_range_asserts() {
        narrow(i32::MAX as i64 + 1);
    }
}
