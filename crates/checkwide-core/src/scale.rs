// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Scaled Multiply-Divide-Round
//!
//! Fixed-point primitives of the shape "multiply, optionally divide, round to
//! nearest, scale by a signed power of two, check the result width".
//!
//! Every operation splits its operands into sign and magnitude, forms the
//! product of the magnitudes in a `u128` (double the width of the inputs)
//! before any rounding or scaling, and carries the sign of the exact result as
//! the XOR of the operand signs. Rounding is applied to the magnitude, so ties
//! always go away from zero regardless of sign. Results are range-checked only
//! at the very end, through [`Outcome::from_sign_magnitude`].
//!
//! A positive `shift` scales up (left shift), a negative `shift` scales down
//! (right shift with rounding). Shift amounts must satisfy
//! `|shift| < 2 * BITS`; anything else is [`ArithError::ShiftRange`].
//!
//! A zero divisor in this family yields zero rather than an error, so that
//! "divide by group size" callers can treat empty groups as no-ops.

use crate::{
    division::{Rounding, div_rem_u128},
    error::ArithError,
    num::{int::KernelInt, outcome::Outcome},
};

/// Validates a scale shift for `T`.
#[inline]
fn check_shift<T: KernelInt>(shift: i32) -> Result<(), ArithError> {
    let limit = 2 * T::BITS as i64 - 1;
    let s = shift as i64;
    if s < -limit || s > limit {
        Err(ArithError::ShiftRange {
            shift: s,
            min: -limit,
            max: limit,
        })
    } else {
        Ok(())
    }
}

/// Scales a magnitude by `2^shift`, rounding half up on right shifts.
///
/// Returns `None` when a left shift loses bits out of the `u128`.
#[inline]
fn shift_magnitude(magnitude: u128, shift: i32) -> Option<u128> {
    match shift {
        0 => Some(magnitude),
        s if s > 0 => {
            let s = s as u32;
            if s >= u128::BITS || magnitude.leading_zeros() < s {
                if magnitude == 0 { Some(0) } else { None }
            } else {
                Some(magnitude << s)
            }
        }
        s => {
            let n = s.unsigned_abs();
            if n > u128::BITS {
                return Some(0);
            }
            // (m + 2^(n-1)) >> n, computed without leaving 128 bits: the half bit is
            // added one position above the final shift so the carry propagates first.
            let halved = magnitude >> (n - 1);
            Some((halved >> 1) + (halved & 1))
        }
    }
}

/// `x * y * 2^shift`, rounded half away from zero when scaling down.
///
/// # Errors
///
/// [`ArithError::ShiftRange`] if `|shift| >= 2 * BITS`.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::{num::outcome::Outcome, scale::mul_scale};
/// assert_eq!(mul_scale(0x30i64, 0x50, 4), Ok(Outcome::Fits(0xF000)));
/// // -3969 / 2 = -1984.5 rounds to -1985.
/// assert_eq!(mul_scale(0x31i64, -81, -1), Ok(Outcome::Fits(-1985)));
/// assert!(mul_scale(0x7FFF_FFFEi64, 0x7FFF_FFFD, 4).unwrap().is_overflow());
/// ```
pub fn mul_scale<T: KernelInt>(x: T, y: T, shift: i32) -> Result<Outcome<T>, ArithError> {
    check_shift::<T>(shift)?;
    let (xn, xm) = x.to_sign_magnitude();
    let (yn, ym) = y.to_sign_magnitude();
    let negative = xn != yn;
    // Both magnitudes are at most 2^64 - 1, so the product fits.
    let product = xm * ym;

    Ok(match shift_magnitude(product, shift) {
        Some(scaled) => Outcome::from_sign_magnitude(negative, scaled),
        None => Outcome::Overflow {
            wrapped: T::truncate_sign_magnitude(negative, product.wrapping_shl(shift as u32)),
            negative,
        },
    })
}

/// `x * 2^shift`, rounded half away from zero when scaling down.
///
/// # Errors
///
/// [`ArithError::ShiftRange`] if `|shift| >= 2 * BITS`.
#[inline]
pub fn scale<T: KernelInt>(x: T, shift: i32) -> Result<Outcome<T>, ArithError> {
    mul_scale(x, T::one(), shift)
}

/// Truncating quotient and remainder of `x * y / d`.
///
/// The quotient carries the sign of `x * y / d`, the remainder the sign of the
/// product, so negating either multiplicand negates both results. A zero
/// divisor yields `(0, 0)`.
///
/// # Errors
///
/// [`ArithError::Internal`] if the remainder does not fit `T`, which would
/// indicate a defect in the division engine.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::{num::outcome::Outcome, scale::mul_div_rem};
/// assert_eq!(mul_div_rem(123456i64, 456789, 1000), Ok((Outcome::Fits(56393342), 784)));
/// assert_eq!(mul_div_rem(-123456i64, 456789, 1000), Ok((Outcome::Fits(-56393342), -784)));
/// assert_eq!(mul_div_rem(5i64, 7, 0), Ok((Outcome::Fits(0), 0)));
/// ```
pub fn mul_div_rem<T: KernelInt>(x: T, y: T, d: T) -> Result<(Outcome<T>, T), ArithError> {
    if d.is_zero() {
        return Ok((Outcome::Fits(T::zero()), T::zero()));
    }
    let (xn, xm) = x.to_sign_magnitude();
    let (yn, ym) = y.to_sign_magnitude();
    let (dn, dm) = d.to_sign_magnitude();
    let product_negative = xn != yn;

    let (q, r) = div_rem_u128(xm * ym, dm, Rounding::Truncate)?;
    let remainder = T::from_sign_magnitude(product_negative, r)
        .ok_or(ArithError::Internal("remainder exceeds divisor width"))?;
    Ok((
        Outcome::from_sign_magnitude(product_negative != dn, q),
        remainder,
    ))
}

/// `x * y / d`, rounded half away from zero. A zero divisor yields `0`.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::{num::outcome::Outcome, scale::mul_div_round};
/// assert_eq!(mul_div_round(7i32, 3, 2), Ok(Outcome::Fits(11)));   // 10.5
/// assert_eq!(mul_div_round(-7i32, 3, 2), Ok(Outcome::Fits(-11))); // -10.5
/// assert_eq!(mul_div_round(7i32, 3, 0), Ok(Outcome::Fits(0)));
/// ```
pub fn mul_div_round<T: KernelInt>(x: T, y: T, d: T) -> Result<Outcome<T>, ArithError> {
    if d.is_zero() {
        return Ok(Outcome::Fits(T::zero()));
    }
    let (xn, xm) = x.to_sign_magnitude();
    let (yn, ym) = y.to_sign_magnitude();
    let (dn, dm) = d.to_sign_magnitude();

    let (q, _) = div_rem_u128(xm * ym, dm, Rounding::Nearest)?;
    Ok(Outcome::from_sign_magnitude((xn != yn) != dn, q))
}

/// `(x / 2^shift) / y`, rounded half away from zero. A negative `shift` scales
/// `x` up before dividing. A zero divisor yields `0`.
///
/// # Errors
///
/// [`ArithError::ShiftRange`] if `|shift| >= 2 * BITS`.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::{num::outcome::Outcome, scale::div_scale_round};
/// assert_eq!(div_scale_round(100i64, 2, 3), Ok(Outcome::Fits(8)));  // 25 / 3
/// assert_eq!(div_scale_round(-100i64, 2, 8), Ok(Outcome::Fits(-3))); // -3.125
/// assert_eq!(div_scale_round(3i64, -4, 2), Ok(Outcome::Fits(24)));
/// ```
pub fn div_scale_round<T: KernelInt>(x: T, shift: i32, y: T) -> Result<Outcome<T>, ArithError> {
    check_shift::<T>(shift)?;
    if y.is_zero() {
        return Ok(Outcome::Fits(T::zero()));
    }
    let (xn, xm) = x.to_sign_magnitude();
    let (yn, ym) = y.to_sign_magnitude();
    let negative = xn != yn;

    let (numerator, denominator) = if shift >= 0 {
        let s = shift as u32;
        if ym.leading_zeros() < s {
            // The denominator exceeds 2^128 > 2 * |x|: the quotient rounds to zero.
            return Ok(Outcome::Fits(T::zero()));
        }
        (xm, ym << s)
    } else {
        let s = shift.unsigned_abs();
        if xm.leading_zeros() < s {
            // |x| * 2^s >= 2^128 and |y| < 2^64, so the quotient exceeds every T.
            return Ok(Outcome::Overflow {
                wrapped: T::truncate_sign_magnitude(negative, u128::MAX),
                negative,
            });
        }
        (xm << s, ym)
    };

    let (q, _) = div_rem_u128(numerator, denominator, Rounding::Nearest)?;
    Ok(Outcome::from_sign_magnitude(negative, q))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Rounds `n / d` half away from zero over `i128`.
    fn round_div(n: i128, d: i128) -> i128 {
        let q = n / d;
        let r = n % d;
        if 2 * r.abs() >= d.abs() {
            if (n < 0) != (d < 0) { q - 1 } else { q + 1 }
        } else {
            q
        }
    }

    #[test]
    fn test_unsigned_scaled_multiply_rounds_before_truncating() {
        let r = mul_scale(0xFFFF0u64, 0x30001, -4).unwrap();
        let v = r.fits().unwrap();
        assert_eq!(crate::wide::hi_word(v), 2);
        assert_eq!(crate::wide::lo_word(v), 0xFFFD_FFFF);
    }

    #[test]
    fn test_mul_div_rem_sign_rules() {
        let (q, r) = mul_div_rem(123456i64, -456789, 1000).unwrap();
        assert_eq!((q, r), (Outcome::Fits(-56393342), -784));
        let (q, r) = mul_div_rem(123456i64, 456789, -1000).unwrap();
        assert_eq!((q, r), (Outcome::Fits(-56393342), 784));
        let (q, r) = mul_div_rem(-123456i64, -456789, -1000).unwrap();
        assert_eq!((q, r), (Outcome::Fits(-56393342), 784));
    }

    #[test]
    fn test_mul_div_rem_wide_intermediate() {
        // The product needs 126 bits; the quotient fits again.
        let (q, r) = mul_div_rem(i64::MAX, i64::MAX, i64::MAX).unwrap();
        assert_eq!((q, r), (Outcome::Fits(i64::MAX), 0));
        let (q, r) = mul_div_rem(u64::MAX, u64::MAX, u64::MAX - 1).unwrap();
        assert!(q.is_overflow());
        assert_eq!(r, 1);
        let (q, _) = mul_div_rem(i64::MIN, -1, 1).unwrap();
        assert_eq!(q.saturated(), i64::MAX);
    }

    #[test]
    fn test_mul_scale_overflow_sign_from_operands() {
        let r = mul_scale(-0x7FFF_FFFEi64, 0x7FFF_FFFD, 4).unwrap();
        assert_eq!(r.saturated(), i64::MIN);
        let r = mul_scale(0x7FFF_FFFEi64, 0x7FFF_FFFD, 4).unwrap();
        assert_eq!(r.saturated(), i64::MAX);
        let r = mul_scale(-2i32, 1, 40).unwrap();
        assert_eq!(r.saturated(), i32::MIN);
        let r = mul_scale(1u32, 1, -70);
        assert!(matches!(r, Err(ArithError::ShiftRange { shift: -70, .. })));
    }

    #[test]
    fn test_mul_scale_full_width_shifts() {
        assert_eq!(mul_scale(1i64, 1, -64), Ok(Outcome::Fits(0)));
        assert_eq!(mul_scale(i64::MIN, i64::MIN, -64), Ok(Outcome::Fits(1i64 << 62)));
        assert_eq!(mul_scale(u64::MAX, u64::MAX, -127), Ok(Outcome::Fits(2)));
        assert_eq!(mul_scale(0i64, 0, 127), Ok(Outcome::Fits(0)));
        assert!(mul_scale(1i64, 1, 64).unwrap().is_overflow());
        assert_eq!(mul_scale(1i64, 1, 62), Ok(Outcome::Fits(1i64 << 62)));
    }

    #[test]
    fn test_rounding_is_symmetric() {
        assert_eq!(scale(5i32, -1), Ok(Outcome::Fits(3)));
        assert_eq!(scale(-5i32, -1), Ok(Outcome::Fits(-3)));
        assert_eq!(scale(-4i32, -1), Ok(Outcome::Fits(-2)));
        assert_eq!(scale(-6i32, -2), Ok(Outcome::Fits(-2)));
        assert_eq!(scale(-1i32, -1), Ok(Outcome::Fits(-1)));
    }

    #[test]
    fn test_unsigned_results_saturate_high() {
        let r = div_scale_round(5u64, 0, 1).unwrap();
        assert_eq!(r, Outcome::Fits(5));
        let r = mul_div_round(u32::MAX, u32::MAX, 1).unwrap();
        assert_eq!(r.saturated(), u32::MAX);
    }

    #[test]
    fn test_div_scale_round_extremes() {
        assert_eq!(div_scale_round(i64::MAX, 127, 1), Ok(Outcome::Fits(0)));
        assert_eq!(div_scale_round(i64::MAX, 100, i64::MAX), Ok(Outcome::Fits(0)));
        assert_eq!(div_scale_round(7i64, 3, 0), Ok(Outcome::Fits(0)));
        let r = div_scale_round(i64::MAX, -100, 1).unwrap();
        assert_eq!(r.saturated(), i64::MAX);
        let r = div_scale_round(-1i64, -70, 1).unwrap();
        assert_eq!(r.saturated(), i64::MIN);
    }

    proptest! {
        #[test]
        fn prop_div_scale_round_matches_reference(
            x in any::<i64>(),
            shift in -40i32..40,
            y in any::<i64>().prop_filter("non-zero", |y| *y != 0),
        ) {
            let (n, d) = if shift >= 0 {
                (x as i128, (y as i128) << shift)
            } else {
                ((x as i128) << -shift, y as i128)
            };
            let expected = round_div(n, d);
            let got = div_scale_round(x, shift, y).unwrap();
            match i64::try_from(expected) {
                Ok(v) => prop_assert_eq!(got, Outcome::Fits(v)),
                Err(_) => {
                    prop_assert!(got.is_overflow());
                    prop_assert_eq!(got.saturated(), if expected < 0 { i64::MIN } else { i64::MAX });
                }
            }
        }

        #[test]
        fn prop_mul_div_round_matches_reference(
            x in any::<i32>(),
            y in any::<i32>(),
            d in any::<i32>().prop_filter("non-zero", |d| *d != 0),
        ) {
            let expected = round_div(x as i128 * y as i128, d as i128);
            let got = mul_div_round(x, y, d).unwrap();
            match i32::try_from(expected) {
                Ok(v) => prop_assert_eq!(got, Outcome::Fits(v)),
                Err(_) => prop_assert_eq!(
                    got.saturated(),
                    if expected < 0 { i32::MIN } else { i32::MAX }
                ),
            }
        }

        #[test]
        fn prop_mul_div_rem_reconstructs_product(
            x in any::<i32>(),
            y in any::<i32>(),
            d in any::<i32>().prop_filter("non-zero", |d| *d != 0),
        ) {
            let (q, r) = mul_div_rem(x as i64, y as i64, d as i64).unwrap();
            let q = q.fits().unwrap();
            prop_assert_eq!(q as i128 * d as i128 + r as i128, x as i128 * y as i128);
        }

        #[test]
        fn prop_mul_scale_matches_i128_for_left_shifts(
            x in any::<i32>(),
            y in any::<i32>(),
            shift in 0i32..=63,
        ) {
            let exact = (x as i128 * y as i128).checked_shl(shift as u32)
                .filter(|v| v >> shift == x as i128 * y as i128);
            let got = mul_scale(x as i64, y as i64, shift).unwrap();
            match exact.and_then(|v| i64::try_from(v).ok()) {
                Some(v) => prop_assert_eq!(got, Outcome::Fits(v)),
                None => prop_assert!(got.is_overflow()),
            }
        }
    }
}
