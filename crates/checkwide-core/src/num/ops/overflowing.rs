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

use crate::num::outcome::Outcome;

/// Overflow-detecting addition by value.
///
/// Signed addition overflows iff both operands have the same sign and the
/// wrapped sum has the other sign; unsigned addition overflows iff the wrapped
/// sum is less than an operand.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::num::{ops::overflowing::OverflowingAddVal, outcome::Outcome};
/// assert_eq!(5i32.overflowing_add_val(7), Outcome::Fits(12));
/// assert_eq!(
///     i32::MAX.overflowing_add_val(1),
///     Outcome::Overflow { wrapped: i32::MIN, negative: false }
/// );
/// assert_eq!(
///     u32::MAX.overflowing_add_val(2),
///     Outcome::Overflow { wrapped: 1, negative: false }
/// );
/// ```
pub trait OverflowingAddVal: Sized {
    /// Adds `v`, reporting whether the exact sum fits.
    fn overflowing_add_val(self, v: Self) -> Outcome<Self>;
}

/// Overflow-detecting subtraction by value.
///
/// Signed subtraction overflows iff the operands have different signs and the
/// wrapped difference does not have the minuend's sign; unsigned subtraction
/// underflows iff the subtrahend exceeds the minuend.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::num::{ops::overflowing::OverflowingSubVal, outcome::Outcome};
/// assert_eq!(3u64.overflowing_sub_val(5).saturated(), 0);
/// assert_eq!(i64::MIN.overflowing_sub_val(1).saturated(), i64::MIN);
/// ```
pub trait OverflowingSubVal: Sized {
    /// Subtracts `v`, reporting whether the exact difference fits.
    fn overflowing_sub_val(self, v: Self) -> Outcome<Self>;
}

/// Overflow-detecting negation by value.
///
/// Only the most negative signed value and non-zero unsigned values fail to
/// negate.
pub trait OverflowingNegVal: Sized {
    /// Negates the value, reporting whether the exact result fits.
    fn overflowing_neg_val(self) -> Outcome<Self>;
}

/// Multiplication to double width by value.
///
/// The full product is returned as a `(low, high)` pair of `Self`, where `low`
/// holds the low `BITS` bits reinterpreted in `Self` and `high` the remaining
/// bits (sign-extended for signed types).
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::num::ops::overflowing::WideningMulVal;
/// assert_eq!(0x1_0000u32.widening_mul_val(0x1_0000), (0, 1));
/// assert_eq!((-1i32).widening_mul_val(1), (-1, -1));
/// assert_eq!(i64::MIN.wide_product(2), -(1i128 << 64));
/// ```
pub trait WideningMulVal: Sized {
    /// The native type holding a full product.
    type Wide;

    /// Multiplies at double width, returning the `(low, high)` halves.
    fn widening_mul_val(self, v: Self) -> (Self, Self);

    /// Multiplies at double width, returning the native wide product.
    fn wide_product(self, v: Self) -> Self::Wide;
}

/// Overflow-detecting multiplication by value.
///
/// The product is formed at double width and overflows iff the high half is
/// anything other than the sign extension of the low half.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::num::{ops::overflowing::OverflowingMulVal, outcome::Outcome};
/// assert_eq!(
///     (-0x10000i32).overflowing_mul_val(0x8000),
///     Outcome::Fits(i32::MIN)
/// );
/// assert_eq!((-0x10000i32).overflowing_mul_val(-0x8000).saturated(), i32::MAX);
/// ```
pub trait OverflowingMulVal: Sized {
    /// Multiplies by `v`, reporting whether the exact product fits.
    fn overflowing_mul_val(self, v: Self) -> Outcome<Self>;
}

macro_rules! overflowing_impl_signed {
    ($t:ty, $wide:ty) => {
        impl OverflowingAddVal for $t {
            #[inline(always)]
            fn overflowing_add_val(self, v: $t) -> Outcome<$t> {
                let r = self.wrapping_add(v);
                let overflow = (self < 0) == (v < 0) && (r < 0) != (self < 0);
                Outcome::from_parts(r, overflow, self < 0)
            }
        }

        impl OverflowingSubVal for $t {
            #[inline(always)]
            fn overflowing_sub_val(self, v: $t) -> Outcome<$t> {
                let r = self.wrapping_sub(v);
                let overflow = (self < 0) != (v < 0) && (r < 0) != (self < 0);
                Outcome::from_parts(r, overflow, self < 0)
            }
        }

        impl OverflowingNegVal for $t {
            #[inline(always)]
            fn overflowing_neg_val(self) -> Outcome<$t> {
                Outcome::from_parts(self.wrapping_neg(), self == <$t>::MIN, false)
            }
        }

        impl WideningMulVal for $t {
            type Wide = $wide;

            #[inline(always)]
            fn widening_mul_val(self, v: $t) -> ($t, $t) {
                let p = self.wide_product(v);
                (p as $t, (p >> <$t>::BITS) as $t)
            }

            #[inline(always)]
            fn wide_product(self, v: $t) -> $wide {
                (self as $wide) * (v as $wide)
            }
        }

        impl OverflowingMulVal for $t {
            #[inline(always)]
            fn overflowing_mul_val(self, v: $t) -> Outcome<$t> {
                let (lo, hi) = self.widening_mul_val(v);
                let extension = if lo < 0 { -1 } else { 0 };
                Outcome::from_parts(lo, hi != extension, (self < 0) != (v < 0))
            }
        }
    };
}

macro_rules! overflowing_impl_unsigned {
    ($t:ty, $wide:ty) => {
        impl OverflowingAddVal for $t {
            #[inline(always)]
            fn overflowing_add_val(self, v: $t) -> Outcome<$t> {
                let r = self.wrapping_add(v);
                Outcome::from_parts(r, r < self || r < v, false)
            }
        }

        impl OverflowingSubVal for $t {
            #[inline(always)]
            fn overflowing_sub_val(self, v: $t) -> Outcome<$t> {
                Outcome::from_parts(self.wrapping_sub(v), v > self, true)
            }
        }

        impl OverflowingNegVal for $t {
            #[inline(always)]
            fn overflowing_neg_val(self) -> Outcome<$t> {
                Outcome::from_parts(self.wrapping_neg(), self != 0, true)
            }
        }

        impl WideningMulVal for $t {
            type Wide = $wide;

            #[inline(always)]
            fn widening_mul_val(self, v: $t) -> ($t, $t) {
                let p = self.wide_product(v);
                (p as $t, (p >> <$t>::BITS) as $t)
            }

            #[inline(always)]
            fn wide_product(self, v: $t) -> $wide {
                (self as $wide) * (v as $wide)
            }
        }

        impl OverflowingMulVal for $t {
            #[inline(always)]
            fn overflowing_mul_val(self, v: $t) -> Outcome<$t> {
                let (lo, hi) = self.widening_mul_val(v);
                Outcome::from_parts(lo, hi != 0, false)
            }
        }
    };
}

overflowing_impl_signed!(i32, i64);
overflowing_impl_signed!(i64, i128);

overflowing_impl_unsigned!(u32, u64);
overflowing_impl_unsigned!(u64, u128);
