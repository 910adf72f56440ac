//! Single rounding shift: `(x * multiplier + 2^(total_shift - 1)) >> total_shift`.
//!
//! Compared to the reference double-rounding scheme this rounds exactly once,
//! which maps onto a SQDMULH followed by a rounding shift right on NEON: for
//! `k >= 1`, `((p >> 31) + (1 << (k - 1))) >> k == (p + (1 << (30 + k))) >> (31 + k)`.

use crate::error::Result;
use crate::strategy::{check_operands, narrow, RoundingStrategy};

/// Scale `x` with a single round-half-up shift, returning the unnarrowed
/// 64-bit value.
///
/// `|x * multiplier| < 2^62` and the rounding term is at most `2^61`, so the
/// sum never leaves the i64 range for any legal operands.
pub fn scale_single_wide(x: i32, multiplier: i32, shift: i32) -> Result<i64> {
    check_operands(multiplier, shift)?;

    let total_shift = 31 - shift;
    let round = 1i64 << (total_shift - 1);
    let product = x as i64 * multiplier as i64 + round;
    Ok(product >> total_shift)
}

/// Scale `x` by `multiplier * 2^(shift - 31)` with a single rounding shift.
pub fn scale_single(x: i32, multiplier: i32, shift: i32) -> Result<i32> {
    scale_single_wide(x, multiplier, shift).map(narrow)
}

/// Default rounding strategy: one biased (round-half-up) rounding shift.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleRounding;

impl RoundingStrategy for SingleRounding {
    fn name(&self) -> &str {
        "single-rounding"
    }

    fn scale(&self, x: i32, multiplier: i32, shift: i32) -> Result<i32> {
        scale_single(x, multiplier, shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RequantError;
    use crate::{MAX_SHIFT, MIN_SHIFT};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const HALF: i32 = 1 << 30;

    #[test]
    fn test_half_rounds_up() {
        // (2^30 + 2^30) >> 31 = 1
        assert_eq!(scale_single(1, HALF, 0).unwrap(), 1);
    }

    #[test]
    fn test_negative_half_rounds_toward_positive_infinity() {
        // -0.5 rounds up to 0 under round-half-up.
        assert_eq!(scale_single(-1, HALF, 0).unwrap(), 0);
        // -1.5 rounds up to -1.
        assert_eq!(scale_single(-3, HALF, 0).unwrap(), -1);
    }

    #[test]
    fn test_positive_shift_amplifies() {
        // 0.5 * 2^3 = 4
        assert_eq!(scale_single(1, HALF, 3).unwrap(), 4);
        assert_eq!(scale_single(100, HALF, 1).unwrap(), 100);
    }

    #[test]
    fn test_negative_shift_attenuates() {
        // 1000 * 0.5 / 4 = 125
        assert_eq!(scale_single(1000, HALF, -2).unwrap(), 125);
    }

    #[test]
    fn test_zero_accumulator() {
        for shift in MIN_SHIFT..=MAX_SHIFT {
            for &m in &[0, 1, HALF, i32::MAX] {
                assert_eq!(scale_single(0, m, shift).unwrap(), 0);
            }
        }
    }

    #[test]
    fn test_preconditions() {
        assert_eq!(scale_single(1, -1, 0), Err(RequantError::NegativeMultiplier(-1)));
        for shift in [MIN_SHIFT - 1, MAX_SHIFT + 1, i32::MIN, i32::MAX] {
            let err = scale_single(1, HALF, shift).unwrap_err();
            assert!(err.is_precondition_violation());
        }
    }

    #[test]
    fn test_extreme_operands_do_not_wrap() {
        for &x in &[i32::MAX, i32::MIN] {
            for shift in [MIN_SHIFT, MAX_SHIFT] {
                let total_shift = 31 - shift;
                let expected = (x as i128 * i32::MAX as i128 + (1i128 << (total_shift - 1)))
                    >> total_shift;
                let got = scale_single_wide(x, i32::MAX, shift).unwrap();
                assert_eq!(got as i128, expected, "x={} shift={}", x, shift);
            }
        }
    }

    #[test]
    fn test_matches_wide_reference() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let x: i32 = rng.gen();
            let m: i32 = rng.gen_range(0..=i32::MAX);
            let shift: i32 = rng.gen_range(MIN_SHIFT..=0);
            let total_shift = 31 - shift;
            let expected =
                (x as i128 * m as i128 + (1i128 << (total_shift - 1))) >> total_shift;
            assert_eq!(scale_single(x, m, shift).unwrap() as i128, expected);
        }
    }

    #[test]
    fn test_monotonic_in_accumulator() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let m: i32 = rng.gen_range(1..=i32::MAX);
            let shift: i32 = rng.gen_range(MIN_SHIFT..=0);
            let mut xs: Vec<i32> = (0..200).map(|_| rng.gen()).collect();
            xs.extend_from_slice(&[i32::MIN, -1, 0, 1, i32::MAX]);
            xs.sort_unstable();

            let ys: Vec<i32> = xs
                .iter()
                .map(|&x| scale_single(x, m, shift).unwrap())
                .collect();
            for w in ys.windows(2) {
                assert!(w[0] <= w[1], "m={} shift={} not monotonic", m, shift);
            }
        }
    }

    #[test]
    fn test_strategy_name() {
        assert_eq!(SingleRounding.name(), "single-rounding");
        assert_eq!(SingleRounding.scale(1, HALF, 0).unwrap(), 1);
    }
}
