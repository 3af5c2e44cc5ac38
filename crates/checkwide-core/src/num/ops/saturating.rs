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

macro_rules! saturate_impl_val {
    ($t:ty) => {
        impl SaturateVal for $t {
            #[inline(always)]
            fn saturate_to(negative: bool) -> Self {
                if negative { <$t>::MIN } else { <$t>::MAX }
            }
        }
    };
}

/// The saturated stand-in for a result that does not fit.
///
/// A checked operation whose exact result overflows returns the representable
/// value of maximum magnitude with the sign the exact result would have had.
/// For unsigned types the negative extremum is zero, so an unsigned underflow
/// saturates to `0`.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::num::ops::saturating::SaturateVal;
///
/// assert_eq!(i32::saturate_to(false), i32::MAX);
/// assert_eq!(i32::saturate_to(true), i32::MIN);
///
/// assert_eq!(u64::saturate_to(false), u64::MAX);
/// assert_eq!(u64::saturate_to(true), 0); // Underflow clamps at zero
/// ```
pub trait SaturateVal: Sized {
    /// Returns the maximum-magnitude value of the requested sign.
    fn saturate_to(negative: bool) -> Self;
}

saturate_impl_val!(i32);
saturate_impl_val!(i64);

saturate_impl_val!(u32);
saturate_impl_val!(u64);

#[cfg(test)]
mod tests {
    use super::*;

    fn saturate_to<T: SaturateVal>(negative: bool) -> T {
        T::saturate_to(negative)
    }

    #[test]
    fn test_saturate_signed() {
        assert_eq!(saturate_to::<i32>(false), 0x7FFF_FFFF);
        assert_eq!(saturate_to::<i32>(true), -0x8000_0000);
        assert_eq!(saturate_to::<i64>(false), 0x7FFF_FFFF_FFFF_FFFF);
        assert_eq!(saturate_to::<i64>(true), i64::MIN);
    }

    #[test]
    fn test_saturate_unsigned() {
        assert_eq!(saturate_to::<u32>(false), 0xFFFF_FFFF);
        assert_eq!(saturate_to::<u32>(true), 0);
        assert_eq!(saturate_to::<u64>(true), 0);
    }
}
