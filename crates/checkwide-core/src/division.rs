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

//! # Long Division
//!
//! Base-2^32 schoolbook division of multi-word non-negative integers. This is
//! the one genuinely multi-precision algorithm of the kernel; the scaled
//! multiply-divide family falls back to it whenever an intermediate no longer
//! fits a native 64-bit division.
//!
//! The divisor is normalized so that its top word has its most significant bit
//! set, which bounds the error of every trial quotient digit to two (Knuth,
//! TAOCP vol. 2, 4.3.1, Algorithm D). Single-word divisors take a short
//! division path.
//!
//! Word slices are least-significant word first. A zero divisor is reported as
//! [`ArithError::DivideByZero`]; it has no saturated answer and is never
//! routed through an overflow policy.

use crate::{
    error::ArithError,
    wide::{significant_words, u128_to_words, words_to_u128},
};
use smallvec::{SmallVec, smallvec};

/// Word storage for dividends, quotients and remainders.
pub type Words = SmallVec<[u32; 8]>;

const BASE: u64 = 1 << 32;

/// How the quotient is rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rounding {
    /// Discard the fractional part.
    #[default]
    Truncate,
    /// Round to nearest, ties away from zero. Implemented by adding half the
    /// divisor to the dividend before dividing.
    Nearest,
}

/// Quotient and remainder of a long division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LongQuotient {
    /// The quotient, as many words as the dividend.
    pub quotient: Words,
    /// The remainder, as many words as the divisor. Under
    /// [`Rounding::Nearest`] this is the remainder of the adjusted dividend.
    pub remainder: Words,
}

/// Divides `dividend` by `divisor`.
///
/// # Errors
///
/// Returns [`ArithError::DivideByZero`] if every divisor word is zero.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::division::{div_rem_words, Rounding};
/// // (2^64 + 5) / 3
/// let r = div_rem_words(&[5, 0, 1], &[3], Rounding::Truncate).unwrap();
/// assert_eq!(r.quotient.as_slice(), &[0x5555_5557, 0x5555_5555, 0]);
/// assert_eq!(r.remainder.as_slice(), &[0]);
///
/// // 7 / 2 rounds half away from zero.
/// let r = div_rem_words(&[7], &[2], Rounding::Nearest).unwrap();
/// assert_eq!(r.quotient.as_slice(), &[4]);
/// ```
pub fn div_rem_words(
    dividend: &[u32],
    divisor: &[u32],
    rounding: Rounding,
) -> Result<LongQuotient, ArithError> {
    let n = significant_words(divisor);
    if n == 0 {
        return Err(ArithError::DivideByZero);
    }
    let v = &divisor[..n];

    // At least one word more than the divisor, plus headroom for the rounding carry.
    let width = dividend.len().max(n) + 1;
    let mut u: Words = smallvec![0; width];
    u[..dividend.len()].copy_from_slice(dividend);

    if rounding == Rounding::Nearest {
        add_half(&mut u, v);
    }

    let (mut quotient, mut remainder) = if n == 1 {
        short_divide(&u, v[0])
    } else {
        knuth_divide(&u, v)
    };

    if quotient[dividend.len()..].iter().any(|&w| w != 0) {
        return Err(ArithError::Internal("quotient exceeds dividend width"));
    }
    quotient.truncate(dividend.len());
    remainder.resize(divisor.len(), 0);

    Ok(LongQuotient {
        quotient,
        remainder,
    })
}

/// Divides two `u128` values, using a native 64-bit division when both
/// operands fit and the word engine otherwise.
///
/// # Errors
///
/// Returns [`ArithError::DivideByZero`] if `divisor` is zero.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::division::{div_rem_u128, Rounding};
/// assert_eq!(div_rem_u128(56_393_342_784, 1000, Rounding::Truncate), Ok((56_393_342, 784)));
/// assert_eq!(div_rem_u128(u128::MAX, u64::MAX as u128, Rounding::Truncate), Ok(((1 << 64) + 1, 0)));
/// assert_eq!(div_rem_u128(15, 10, Rounding::Nearest).map(|(q, _)| q), Ok(2));
/// ```
pub fn div_rem_u128(
    dividend: u128,
    divisor: u128,
    rounding: Rounding,
) -> Result<(u128, u128), ArithError> {
    if divisor == 0 {
        return Err(ArithError::DivideByZero);
    }

    if let (Ok(n), Ok(d)) = (u64::try_from(dividend), u64::try_from(divisor)) {
        let adjusted = match rounding {
            Rounding::Truncate => Some(n),
            Rounding::Nearest => n.checked_add(d / 2),
        };
        if let Some(a) = adjusted {
            return Ok(((a / d) as u128, (a % d) as u128));
        }
    }

    let r = div_rem_words(&u128_to_words(dividend), &u128_to_words(divisor), rounding)?;
    let quotient =
        words_to_u128(&r.quotient).ok_or(ArithError::Internal("quotient exceeds 128 bits"))?;
    let remainder =
        words_to_u128(&r.remainder).ok_or(ArithError::Internal("remainder exceeds 128 bits"))?;
    Ok((quotient, remainder))
}

/// Adds `floor(v / 2)` to `u` in place. `u` must be long enough to absorb the carry.
fn add_half(u: &mut [u32], v: &[u32]) {
    let mut carry = 0u64;
    for i in 0..u.len() {
        let half = match v.get(i) {
            Some(&w) => {
                let borrowed = v.get(i + 1).map_or(0, |&next| next << 31);
                (w >> 1) | borrowed
            }
            None if carry == 0 => break,
            None => 0,
        };
        let t = u[i] as u64 + half as u64 + carry;
        u[i] = t as u32;
        carry = t >> 32;
    }
    debug_assert_eq!(carry, 0, "rounding carry escaped the headroom word");
}

/// Divides `u` by a single non-zero word.
fn short_divide(u: &[u32], d: u32) -> (Words, Words) {
    let d = d as u64;
    let mut q: Words = smallvec![0; u.len()];
    let mut rem = 0u64;
    for i in (0..u.len()).rev() {
        let cur = (rem << 32) | u[i] as u64;
        q[i] = (cur / d) as u32;
        rem = cur % d;
    }
    (q, smallvec![rem as u32])
}

/// Shifts `words` left by `s < 32` bits into a buffer of `out_len` words.
fn shl_words(words: &[u32], s: u32, out_len: usize) -> Words {
    let mut out: Words = smallvec![0; out_len];
    // A shift by 32 - 0 would be a full-width shift.
    if s == 0 {
        out[..words.len()].copy_from_slice(words);
        return out;
    }
    let mut carry = 0u32;
    for (i, &w) in words.iter().enumerate() {
        out[i] = (w << s) | carry;
        carry = w >> (32 - s);
    }
    if words.len() < out_len {
        out[words.len()] = carry;
    }
    out
}

/// Algorithm D. Requires `v.len() >= 2`, a non-zero top word in `v`, and
/// `u.len() > v.len()`.
fn knuth_divide(u: &[u32], v: &[u32]) -> (Words, Words) {
    let n = v.len();
    let m = u.len() - n;

    let s = v[n - 1].leading_zeros();
    let vn = shl_words(v, s, n);
    let mut un = shl_words(u, s, u.len() + 1);
    let mut q: Words = smallvec![0; u.len()];

    let top = vn[n - 1] as u64;
    let next = vn[n - 2] as u64;

    for j in (0..=m).rev() {
        let num = ((un[j + n] as u64) << 32) | un[j + n - 1] as u64;
        let mut qhat = num / top;
        let mut rhat = num % top;

        while qhat >= BASE || qhat * next > ((rhat << 32) | un[j + n - 2] as u64) {
            qhat -= 1;
            rhat += top;
            if rhat >= BASE {
                break;
            }
        }

        // Multiply and subtract.
        let mut borrow: i64 = 0;
        for i in 0..n {
            let p = qhat * vn[i] as u64;
            let t = un[i + j] as i64 - borrow - (p & 0xFFFF_FFFF) as i64;
            un[i + j] = t as u32;
            borrow = (p >> 32) as i64 - (t >> 32);
        }
        let t = un[j + n] as i64 - borrow;
        un[j + n] = t as u32;

        if t < 0 {
            // qhat was one too large; add the divisor back.
            qhat -= 1;
            let mut carry = 0u64;
            for i in 0..n {
                let t = un[i + j] as u64 + vn[i] as u64 + carry;
                un[i + j] = t as u32;
                carry = t >> 32;
            }
            un[j + n] = un[j + n].wrapping_add(carry as u32);
        }
        q[j] = qhat as u32;
    }

    let mut r: Words = smallvec![0; n];
    if s == 0 {
        r.copy_from_slice(&un[..n]);
    } else {
        for i in 0..n {
            r[i] = (un[i] >> s) | (un[i + 1] << (32 - s));
        }
    }
    (q, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn nearest_reference(n: u128, d: u128) -> u128 {
        let (q, r) = (n / d, n % d);
        if r >= d - r { q + 1 } else { q }
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            div_rem_words(&[1, 2], &[0, 0], Rounding::Truncate),
            Err(ArithError::DivideByZero)
        );
        assert_eq!(
            div_rem_words(&[1], &[], Rounding::Nearest),
            Err(ArithError::DivideByZero)
        );
        assert_eq!(div_rem_u128(1, 0, Rounding::Truncate), Err(ArithError::DivideByZero));
    }

    #[test]
    fn test_output_widths() {
        let r = div_rem_words(&[9, 0, 0], &[4, 0], Rounding::Truncate).unwrap();
        assert_eq!(r.quotient.as_slice(), &[2, 0, 0]);
        assert_eq!(r.remainder.as_slice(), &[1, 0]);

        let r = div_rem_words(&[], &[7], Rounding::Nearest).unwrap();
        assert!(r.quotient.is_empty());
    }

    #[test]
    fn test_dividend_smaller_than_divisor() {
        let r = div_rem_words(&[5], &[0, 1], Rounding::Truncate).unwrap();
        assert_eq!(r.quotient.as_slice(), &[0]);
        assert_eq!(r.remainder.as_slice(), &[5, 0]);

        // 3 / 4 rounds up to 1.
        let r = div_rem_words(&[3], &[4], Rounding::Nearest).unwrap();
        assert_eq!(r.quotient.as_slice(), &[1]);
    }

    #[test]
    fn test_beyond_native_width() {
        // 2^128 / 2^64
        let r = div_rem_words(&[0, 0, 0, 0, 1], &[0, 0, 1], Rounding::Truncate).unwrap();
        assert_eq!(r.quotient.as_slice(), &[0, 0, 1, 0, 0]);
        assert_eq!(r.remainder.as_slice(), &[0, 0, 0]);

        // (2^160 - 1) / (2^96 - 1) = 2^64 remainder 2^64 - 1
        let r = div_rem_words(
            &[u32::MAX; 5],
            &[u32::MAX, u32::MAX, u32::MAX],
            Rounding::Truncate,
        )
        .unwrap();
        assert_eq!(r.quotient.as_slice(), &[0, 0, 1, 0, 0]);
        assert_eq!(r.remainder.as_slice(), &[u32::MAX, u32::MAX, 0]);
    }

    #[test]
    fn test_add_back_step() {
        // Divisor top word 0x8000_0000 with a large second word forces a qhat correction.
        let n: u128 = 0x7FFF_FFFF_8000_0000_0000_0000_0000_0000;
        let d: u128 = 0x8000_0000_FFFF_FFFF_FFFF_FFFF;
        assert_eq!(
            div_rem_u128(n, d, Rounding::Truncate),
            Ok((n / d, n % d))
        );
    }

    #[test]
    fn test_rounding_carry_into_headroom() {
        let r = div_rem_u128(u128::MAX, u128::MAX - 1, Rounding::Nearest).unwrap();
        assert_eq!(r.0, 1);
        let r = div_rem_u128(u128::MAX, 2, Rounding::Nearest).unwrap();
        assert_eq!(r.0, 1u128 << 127);
    }

    proptest! {
        #[test]
        fn prop_matches_native_truncation(n in any::<u128>(), d in 1u128..) {
            prop_assert_eq!(div_rem_u128(n, d, Rounding::Truncate), Ok((n / d, n % d)));
        }

        #[test]
        fn prop_matches_native_with_narrow_divisor(n in any::<u128>(), d in 1u64..) {
            let d = d as u128;
            prop_assert_eq!(div_rem_u128(n, d, Rounding::Truncate), Ok((n / d, n % d)));
        }

        #[test]
        fn prop_nearest_rounds_half_up(n in any::<u128>(), d in 1u128..) {
            let (q, _) = div_rem_u128(n, d, Rounding::Nearest).unwrap();
            prop_assert_eq!(q, nearest_reference(n, d));
        }

        #[test]
        fn prop_nearest_rounds_half_up_small(n in any::<u64>(), d in 1u64..1000) {
            let (q, _) = div_rem_u128(n as u128, d as u128, Rounding::Nearest).unwrap();
            prop_assert_eq!(q, nearest_reference(n as u128, d as u128));
        }
    }
}
