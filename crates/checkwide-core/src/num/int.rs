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

use crate::num::ops::{
    overflowing::{
        OverflowingAddVal, OverflowingMulVal, OverflowingNegVal, OverflowingSubVal, WideningMulVal,
    },
    saturating::SaturateVal,
};
use num_traits::PrimInt;
use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// The integer types the kernel computes with: `i32`, `i64`, `u32` and `u64`.
///
/// Every wide computation converts its operands to a sign and a `u128`
/// magnitude, works on the magnitude at (at least) double the input width, and
/// converts back through [`KernelInt::from_sign_magnitude`], which is the single
/// place where "does the exact result fit" is decided.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::num::int::KernelInt;
/// assert_eq!((-5i32).to_sign_magnitude(), (true, 5));
/// assert_eq!(i32::from_sign_magnitude(true, 1 << 31), Some(i32::MIN));
/// assert_eq!(i32::from_sign_magnitude(false, 1 << 31), None);
/// assert_eq!(u32::from_sign_magnitude(true, 1), None);
/// ```
pub trait KernelInt:
    PrimInt
    + Debug
    + Display
    + Default
    + Hash
    + Send
    + Sync
    + 'static
    + OverflowingAddVal
    + OverflowingSubVal
    + OverflowingNegVal
    + OverflowingMulVal
    + WideningMulVal
    + SaturateVal
{
    /// Width of the type in bits.
    const BITS: u32;
    /// Whether the type is signed.
    const SIGNED: bool;
    /// The Rust name of the type, used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Returns `true` if the value is below zero. Always `false` for unsigned types.
    fn is_negative_val(self) -> bool;

    /// Splits the value into a sign and an exact magnitude.
    fn to_sign_magnitude(self) -> (bool, u128);

    /// Rebuilds a value from a sign and a magnitude, returning `None` when the
    /// exact result does not fit. A negative zero is zero.
    fn from_sign_magnitude(negative: bool, magnitude: u128) -> Option<Self>;

    /// Rebuilds a value from a sign and a magnitude modulo `2^BITS`.
    fn truncate_sign_magnitude(negative: bool, magnitude: u128) -> Self;

    /// Converts the value to the nearest `f64`.
    fn as_f64(self) -> f64;
}

macro_rules! impl_kernel_int_signed {
    ($t:ty) => {
        impl KernelInt for $t {
            const BITS: u32 = <$t>::BITS;
            const SIGNED: bool = true;
            const TYPE_NAME: &'static str = stringify!($t);

            #[inline(always)]
            fn is_negative_val(self) -> bool {
                self < 0
            }

            #[inline(always)]
            fn to_sign_magnitude(self) -> (bool, u128) {
                (self < 0, (self as i128).unsigned_abs())
            }

            #[inline]
            fn from_sign_magnitude(negative: bool, magnitude: u128) -> Option<Self> {
                if negative {
                    if magnitude <= (<$t>::MIN as i128).unsigned_abs() {
                        Some((magnitude as i128).wrapping_neg() as $t)
                    } else {
                        None
                    }
                } else if magnitude <= <$t>::MAX as u128 {
                    Some(magnitude as $t)
                } else {
                    None
                }
            }

            #[inline(always)]
            fn truncate_sign_magnitude(negative: bool, magnitude: u128) -> Self {
                let bits = if negative {
                    magnitude.wrapping_neg()
                } else {
                    magnitude
                };
                bits as $t
            }

            #[inline(always)]
            fn as_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

macro_rules! impl_kernel_int_unsigned {
    ($t:ty) => {
        impl KernelInt for $t {
            const BITS: u32 = <$t>::BITS;
            const SIGNED: bool = false;
            const TYPE_NAME: &'static str = stringify!($t);

            #[inline(always)]
            fn is_negative_val(self) -> bool {
                false
            }

            #[inline(always)]
            fn to_sign_magnitude(self) -> (bool, u128) {
                (false, self as u128)
            }

            #[inline]
            fn from_sign_magnitude(negative: bool, magnitude: u128) -> Option<Self> {
                if negative && magnitude != 0 {
                    None
                } else if magnitude <= <$t>::MAX as u128 {
                    Some(magnitude as $t)
                } else {
                    None
                }
            }

            #[inline(always)]
            fn truncate_sign_magnitude(negative: bool, magnitude: u128) -> Self {
                let bits = if negative {
                    magnitude.wrapping_neg()
                } else {
                    magnitude
                };
                bits as $t
            }

            #[inline(always)]
            fn as_f64(self) -> f64 {
                self as f64
            }
        }
    };
}

impl_kernel_int_signed!(i32);
impl_kernel_int_signed!(i64);

impl_kernel_int_unsigned!(u32);
impl_kernel_int_unsigned!(u64);

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip<T: KernelInt>(v: T) -> Option<T> {
        let (negative, magnitude) = v.to_sign_magnitude();
        T::from_sign_magnitude(negative, magnitude)
    }

    #[test]
    fn test_constants() {
        assert_eq!(<i32 as KernelInt>::BITS, 32);
        assert_eq!(<u64 as KernelInt>::BITS, 64);
        assert!(<i64 as KernelInt>::SIGNED);
        assert!(!<u32 as KernelInt>::SIGNED);
        assert_eq!(<u64 as KernelInt>::TYPE_NAME, "u64");
    }

    #[test]
    fn test_sign_magnitude_extremes() {
        assert_eq!(i64::MIN.to_sign_magnitude(), (true, 1u128 << 63));
        assert_eq!(round_trip(i64::MIN), Some(i64::MIN));
        assert_eq!(round_trip(i32::MAX), Some(i32::MAX));
        assert_eq!(round_trip(u64::MAX), Some(u64::MAX));
        assert_eq!(u64::from_sign_magnitude(false, 1u128 << 64), None);
        assert_eq!(i32::from_sign_magnitude(true, (1u128 << 31) + 1), None);
    }

    #[test]
    fn test_truncate_matches_wrapping() {
        assert_eq!(i32::truncate_sign_magnitude(false, 1u128 << 31), i32::MIN);
        assert_eq!(i32::truncate_sign_magnitude(true, 1), -1);
        assert_eq!(u32::truncate_sign_magnitude(true, 1), u32::MAX);
        assert_eq!(
            i64::truncate_sign_magnitude(false, 0x1_0000_0000_0000_0005),
            5
        );
    }

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(i32::from_sign_magnitude(true, 0), Some(0));
        assert_eq!(u32::from_sign_magnitude(true, 0), Some(0));
    }
}
