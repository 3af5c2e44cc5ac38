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

use crate::num::int::KernelInt;

/// The result of a width-checked computation.
///
/// A computation either produces a value that fits the declared type, or it
/// overflows. In the latter case the outcome keeps both the `2^BITS` modulo
/// result (for the unchecked call shape) and the sign the exact result would
/// have had (for saturation).
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::num::outcome::Outcome;
/// let fits: Outcome<i32> = Outcome::Fits(7);
/// assert_eq!(fits.saturated(), 7);
///
/// let over: Outcome<i32> = Outcome::Overflow { wrapped: i32::MIN, negative: false };
/// assert_eq!(over.saturated(), i32::MAX);
/// assert_eq!(over.wrapped(), i32::MIN);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome<T> {
    /// The exact result fits the declared type.
    Fits(T),
    /// The exact result does not fit.
    Overflow {
        /// The exact result reduced modulo `2^BITS`.
        wrapped: T,
        /// Whether the exact result was negative.
        negative: bool,
    },
}

impl<T> Outcome<T> {
    /// Builds an outcome from a wrapped result and an overflow flag.
    ///
    /// `negative` is only kept when `overflow` is set.
    #[inline(always)]
    pub fn from_parts(wrapped: T, overflow: bool, negative: bool) -> Self {
        if overflow {
            Outcome::Overflow { wrapped, negative }
        } else {
            Outcome::Fits(wrapped)
        }
    }

    /// Returns `true` if the exact result did not fit.
    #[inline(always)]
    pub fn is_overflow(&self) -> bool {
        matches!(self, Outcome::Overflow { .. })
    }

    /// Maps the carried value, keeping the overflow state.
    #[inline]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Fits(value) => Outcome::Fits(f(value)),
            Outcome::Overflow { wrapped, negative } => Outcome::Overflow {
                wrapped: f(wrapped),
                negative,
            },
        }
    }
}

impl<T> Outcome<T>
where
    T: KernelInt,
{
    /// Builds an outcome from a sign and an exact magnitude.
    #[inline]
    pub fn from_sign_magnitude(negative: bool, magnitude: u128) -> Self {
        match T::from_sign_magnitude(negative, magnitude) {
            Some(value) => Outcome::Fits(value),
            None => Outcome::Overflow {
                wrapped: T::truncate_sign_magnitude(negative, magnitude),
                negative,
            },
        }
    }

    /// The value, or the maximum-magnitude value of the exact result's sign.
    #[inline]
    pub fn saturated(self) -> T {
        match self {
            Outcome::Fits(value) => value,
            Outcome::Overflow { negative, .. } => T::saturate_to(negative),
        }
    }

    /// The value, or the exact result reduced modulo `2^BITS`.
    #[inline]
    pub fn wrapped(self) -> T {
        match self {
            Outcome::Fits(value) | Outcome::Overflow { wrapped: value, .. } => value,
        }
    }

    /// The value if it fits.
    #[inline]
    pub fn fits(self) -> Option<T> {
        match self {
            Outcome::Fits(value) => Some(value),
            Outcome::Overflow { .. } => None,
        }
    }
}

impl<T> std::fmt::Display for Outcome<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Fits(value) => write!(f, "Fits({})", value),
            Outcome::Overflow { wrapped, negative } => write!(
                f,
                "Overflow(wrapped: {}, sign: {})",
                wrapped,
                if *negative { "-" } else { "+" }
            ),
        }
    }
}
