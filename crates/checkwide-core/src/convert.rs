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

//! Width and representation conversions between kernel integer types and `f64`.

use crate::num::{int::KernelInt, outcome::Outcome};

/// Converts between any two kernel integer types.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::{convert::narrow, num::outcome::Outcome};
/// assert_eq!(narrow::<i64, i32>(-5), Outcome::Fits(-5));
/// assert_eq!(narrow::<i64, i32>(1 << 40).saturated(), i32::MAX);
/// assert_eq!(narrow::<i32, u64>(-1).saturated(), 0);
/// assert_eq!(narrow::<u64, i64>(u64::MAX).wrapped(), -1);
/// ```
#[inline]
pub fn narrow<S, D>(x: S) -> Outcome<D>
where
    S: KernelInt,
    D: KernelInt,
{
    let (negative, magnitude) = x.to_sign_magnitude();
    Outcome::from_sign_magnitude(negative, magnitude)
}

/// Rounds a float half away from zero and converts it.
///
/// Returns `None` for NaN. Infinities and finite values beyond the target
/// range overflow with the sign of the input.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::{convert::from_f64, num::outcome::Outcome};
/// assert_eq!(from_f64::<i32>(2.5), Some(Outcome::Fits(3)));
/// assert_eq!(from_f64::<i32>(-2.5), Some(Outcome::Fits(-3)));
/// assert_eq!(from_f64::<u32>(-0.4), Some(Outcome::Fits(0)));
/// assert_eq!(from_f64::<i64>(f64::NEG_INFINITY).map(|o| o.saturated()), Some(i64::MIN));
/// assert_eq!(from_f64::<i64>(f64::NAN), None);
/// ```
pub fn from_f64<T: KernelInt>(value: f64) -> Option<Outcome<T>> {
    if value.is_nan() {
        return None;
    }
    let rounded = value.round();
    let negative = rounded < 0.0;
    let magnitude = rounded.abs();
    if magnitude >= u128::MAX as f64 {
        return Some(Outcome::Overflow {
            wrapped: T::saturate_to(negative),
            negative,
        });
    }
    Some(Outcome::from_sign_magnitude(negative, magnitude as u128))
}

/// Converts to the nearest `f64`.
#[inline(always)]
pub fn to_f64<T: KernelInt>(x: T) -> f64 {
    x.as_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_boundaries() {
        assert_eq!(narrow::<i64, i32>(i32::MIN as i64), Outcome::Fits(i32::MIN));
        assert_eq!(narrow::<i64, i32>(i32::MIN as i64 - 1).saturated(), i32::MIN);
        assert_eq!(narrow::<u64, u32>(u32::MAX as u64 + 1).saturated(), u32::MAX);
        assert_eq!(narrow::<u32, i32>(u32::MAX).saturated(), i32::MAX);
        assert_eq!(narrow::<i32, i64>(i32::MIN), Outcome::Fits(i32::MIN as i64));
        assert_eq!(narrow::<i64, u64>(i64::MIN).saturated(), 0);
    }

    #[test]
    fn test_from_f64_range_edges() {
        assert_eq!(from_f64::<i32>(2147483647.4), Some(Outcome::Fits(i32::MAX)));
        assert!(from_f64::<i32>(2147483647.5).unwrap().is_overflow());
        assert_eq!(from_f64::<i32>(-2147483648.4), Some(Outcome::Fits(i32::MIN)));
        assert_eq!(from_f64::<u64>(1e30).map(|o| o.saturated()), Some(u64::MAX));
        assert_eq!(from_f64::<i64>(-0.0), Some(Outcome::Fits(0)));
        assert_eq!(from_f64::<u32>(-0.5).map(|o| o.saturated()), Some(0));
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(to_f64(-3i32), -3.0);
        assert_eq!(to_f64(u64::MAX), 18446744073709551615.0);
    }
}
