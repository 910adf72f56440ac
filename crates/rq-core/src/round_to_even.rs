//! Unbiased (round-half-to-even) shifting.
//!
//! The `RoundToEven` strategy feeds `x * shift` into the rounding primitive
//! and shifts by `shift`, leaving `multiplier` unused, matching deployed
//! behavior. `scale_round_to_even_intended` applies the same rounding to
//! `x * multiplier` with the usual `31 - shift` total shift.

use crate::error::{RequantError, Result};
use crate::strategy::{check_operands, narrow, RoundingStrategy};

/// Arithmetic right shift of `value` by `amount` bits, rounding exact ties
/// to the even neighbor.
///
/// Computes `(value + ((value >> amount) & 1) + (2^(amount-1) - 1)) >> amount`.
/// The sum is formed in i128 so values near the i64 bounds cannot wrap; the
/// result always fits back into i64.
pub fn round_to_even(value: i64, amount: u32) -> Result<i64> {
    if !(1..=63).contains(&amount) {
        return Err(RequantError::InvalidShiftAmount(amount as i64));
    }
    let v = value as i128;
    let odd = (v >> amount) & 1;
    let bias = (1i128 << (amount - 1)) - 1;
    Ok(((v + odd + bias) >> amount) as i64)
}

/// Round-to-even scaling as deployed: `round_to_even(x * shift, shift)`.
///
/// Requires `shift >= 1` on top of the common operand checks, since the
/// shift doubles as the rounding amount.
pub fn scale_round_to_even(x: i32, multiplier: i32, shift: i32) -> Result<i32> {
    check_operands(multiplier, shift)?;
    if shift < 1 {
        return Err(RequantError::InvalidShiftAmount(shift as i64));
    }

    let acc = x as i64 * shift as i64;
    round_to_even(acc, shift as u32).map(narrow)
}

/// Round-to-even scaling of `x * multiplier` by `31 - shift` bits.
///
/// Same scale factor as `scale_single`, differing only on exact ties.
pub fn scale_round_to_even_intended(x: i32, multiplier: i32, shift: i32) -> Result<i32> {
    check_operands(multiplier, shift)?;

    let total_shift = (31 - shift) as u32;
    let acc = x as i64 * multiplier as i64;
    round_to_even(acc, total_shift).map(narrow)
}

/// Round-to-even rounding strategy (policy value `EV`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundToEven;

impl RoundingStrategy for RoundToEven {
    fn name(&self) -> &str {
        "round-to-even"
    }

    fn scale(&self, x: i32, multiplier: i32, shift: i32) -> Result<i32> {
        scale_round_to_even(x, multiplier, shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::single_rounding::scale_single;
    use crate::{MAX_SHIFT, MIN_SHIFT};

    #[test]
    fn test_ties_round_to_even_at_amount_4() {
        // 2.5 -> 2, 3.5 -> 4, 4.5 -> 4, 5.5 -> 6
        assert_eq!(round_to_even(40, 4).unwrap(), 2);
        assert_eq!(round_to_even(56, 4).unwrap(), 4);
        assert_eq!(round_to_even(72, 4).unwrap(), 4);
        assert_eq!(round_to_even(88, 4).unwrap(), 6);
    }

    #[test]
    fn test_negative_ties_round_to_even() {
        // -2.5 -> -2, -3.5 -> -4
        assert_eq!(round_to_even(-40, 4).unwrap(), -2);
        assert_eq!(round_to_even(-56, 4).unwrap(), -4);
    }

    #[test]
    fn test_non_ties_round_to_nearest() {
        // 2.4375 -> 2, 2.5625 -> 3, 3.4375 -> 3
        assert_eq!(round_to_even(39, 4).unwrap(), 2);
        assert_eq!(round_to_even(41, 4).unwrap(), 3);
        assert_eq!(round_to_even(55, 4).unwrap(), 3);
        // exact multiples are untouched
        assert_eq!(round_to_even(48, 4).unwrap(), 3);
        assert_eq!(round_to_even(-48, 4).unwrap(), -3);
    }

    #[test]
    fn test_amount_bounds() {
        assert_eq!(round_to_even(5, 0), Err(RequantError::InvalidShiftAmount(0)));
        assert_eq!(round_to_even(5, 64), Err(RequantError::InvalidShiftAmount(64)));
        assert_eq!(round_to_even(3, 1).unwrap(), 2);
        assert_eq!(round_to_even(i64::MAX, 63).unwrap(), 1);
        assert_eq!(round_to_even(i64::MIN, 63).unwrap(), -1);
    }

    #[test]
    fn test_deployed_formula_ignores_multiplier() {
        // 3 * 1 = 3, 3 / 2 = 1.5 -> 2
        assert_eq!(scale_round_to_even(3, 0, 1).unwrap(), 2);
        assert_eq!(scale_round_to_even(3, i32::MAX, 1).unwrap(), 2);
        // 5 * 1 = 5, 5 / 2 = 2.5 -> 2
        assert_eq!(scale_round_to_even(5, 1 << 30, 1).unwrap(), 2);
        // 100 * 2 = 200, 200 / 4 = 50
        assert_eq!(scale_round_to_even(100, 12345, 2).unwrap(), 50);
    }

    #[test]
    fn test_deployed_formula_rejects_non_positive_shift() {
        for shift in MIN_SHIFT..=0 {
            let err = scale_round_to_even(10, 1 << 30, shift).unwrap_err();
            assert_eq!(err, RequantError::InvalidShiftAmount(shift as i64));
            assert!(err.is_precondition_violation());
        }
    }

    #[test]
    fn test_deployed_formula_preconditions() {
        assert_eq!(scale_round_to_even(1, -5, 1), Err(RequantError::NegativeMultiplier(-5)));
        assert!(scale_round_to_even(1, 1, MAX_SHIFT + 1)
            .unwrap_err()
            .is_precondition_violation());
        assert!(scale_round_to_even(1, 1, MIN_SHIFT - 1)
            .unwrap_err()
            .is_precondition_violation());
    }

    #[test]
    fn test_deployed_formula_zero_accumulator() {
        for shift in 1..=MAX_SHIFT {
            assert_eq!(scale_round_to_even(0, 1 << 30, shift).unwrap(), 0);
        }
    }

    #[test]
    fn test_intended_formula_rounds_ties_to_even() {
        // 1 * 0.5 = 0.5 -> 0, where single rounding gives 1.
        assert_eq!(scale_round_to_even_intended(1, 1 << 30, 0).unwrap(), 0);
        assert_eq!(scale_single(1, 1 << 30, 0).unwrap(), 1);
        // 3 * 0.5 = 1.5 -> 2 under both.
        assert_eq!(scale_round_to_even_intended(3, 1 << 30, 0).unwrap(), 2);
        assert_eq!(scale_single(3, 1 << 30, 0).unwrap(), 2);
        // -1 * 0.5 = -0.5 -> 0, -3 * 0.5 = -1.5 -> -2
        assert_eq!(scale_round_to_even_intended(-1, 1 << 30, 0).unwrap(), 0);
        assert_eq!(scale_round_to_even_intended(-3, 1 << 30, 0).unwrap(), -2);
    }

    #[test]
    fn test_intended_formula_accepts_full_shift_range() {
        for shift in MIN_SHIFT..=MAX_SHIFT {
            assert_eq!(scale_round_to_even_intended(0, i32::MAX, shift).unwrap(), 0);
        }
        assert_eq!(scale_round_to_even_intended(1000, 1 << 30, -2).unwrap(), 125);
        assert!(scale_round_to_even_intended(1, -1, 0)
            .unwrap_err()
            .is_precondition_violation());
    }

    #[test]
    fn test_strategy_uses_deployed_formula() {
        assert_eq!(RoundToEven.name(), "round-to-even");
        assert_eq!(RoundToEven.scale(3, 0, 1).unwrap(), 2);
        assert!(RoundToEven.scale(3, 1 << 30, 0).is_err());
    }
}
