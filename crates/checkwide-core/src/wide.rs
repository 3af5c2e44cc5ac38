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

//! # Wide Values
//!
//! Elementary, side-effect-free operations on 64-bit values and on the 32-bit
//! words the long-division engine works with. None of them can overflow.
//!
//! Word slices are always ordered least-significant word first.

/// The high 32 bits of `x`.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::wide::{hi_word, lo_word, join_words};
/// let x = 0x0000_0002_FFFD_FFFFu64;
/// assert_eq!(hi_word(x), 2);
/// assert_eq!(lo_word(x), 0xFFFD_FFFF);
/// assert_eq!(join_words(hi_word(x), lo_word(x)), x);
/// ```
#[inline(always)]
pub const fn hi_word(x: u64) -> u32 {
    (x >> 32) as u32
}

/// The low 32 bits of `x`.
#[inline(always)]
pub const fn lo_word(x: u64) -> u32 {
    x as u32
}

/// The high 32 bits of a signed value, sign preserved.
#[inline(always)]
pub const fn hi_word_signed(x: i64) -> i32 {
    (x >> 32) as i32
}

/// Concatenates a high and a low word.
#[inline(always)]
pub const fn join_words(hi: u32, lo: u32) -> u64 {
    ((hi as u64) << 32) | lo as u64
}

/// Concatenates a signed high word and an unsigned low word.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::wide::{hi_word_signed, join_words_signed, lo_word};
/// let x = -0x1_2345_6789i64;
/// assert_eq!(join_words_signed(hi_word_signed(x), lo_word(x as u64)), x);
/// ```
#[inline(always)]
pub const fn join_words_signed(hi: i32, lo: u32) -> i64 {
    ((hi as i64) << 32) | lo as i64
}

/// Whether a signed 64-bit value is representable as `i32`.
#[inline(always)]
pub const fn fits_i32(x: i64) -> bool {
    x >= i32::MIN as i64 && x <= i32::MAX as i64
}

/// Whether an unsigned 64-bit value is representable as `u32`.
#[inline(always)]
pub const fn fits_u32(x: u64) -> bool {
    x <= u32::MAX as u64
}

/// Whether a signed 64-bit value is representable as `u32`.
#[inline(always)]
pub const fn fits_u32_signed(x: i64) -> bool {
    x >= 0 && x <= u32::MAX as i64
}

/// The number of bits needed to represent `x - 1`, i.e. to index `x` items.
///
/// Returns `0` for `x < 2`.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::wide::index_bits;
/// assert_eq!(index_bits(0), 0);
/// assert_eq!(index_bits(1), 0);
/// assert_eq!(index_bits(2), 1);
/// assert_eq!(index_bits(256), 8);
/// assert_eq!(index_bits(257), 9);
/// assert_eq!(index_bits(u64::MAX), 64);
/// ```
#[inline]
pub const fn index_bits(x: u64) -> u32 {
    if x < 2 {
        0
    } else {
        u64::BITS - (x - 1).leading_zeros()
    }
}

/// The magnitude of a signed value. Exact for `i64::MIN`.
#[inline(always)]
pub const fn abs_magnitude(x: i64) -> u64 {
    x.unsigned_abs()
}

/// Applies a sign to a magnitude modulo `2^64`.
#[inline(always)]
pub const fn apply_sign(negative: bool, magnitude: u64) -> i64 {
    if negative {
        (magnitude as i64).wrapping_neg()
    } else {
        magnitude as i64
    }
}

/// Splits a `u128` into four words, least significant first.
#[inline]
pub const fn u128_to_words(x: u128) -> [u32; 4] {
    [x as u32, (x >> 32) as u32, (x >> 64) as u32, (x >> 96) as u32]
}

/// Joins words (least significant first) into a `u128`.
///
/// Returns `None` if a word beyond the fourth is non-zero.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::wide::{u128_to_words, words_to_u128};
/// let x = 0x0123_4567_89AB_CDEF_FEDC_BA98_7654_3210u128;
/// assert_eq!(words_to_u128(&u128_to_words(x)), Some(x));
/// assert_eq!(words_to_u128(&[1, 0, 0, 0, 0, 0]), Some(1));
/// assert_eq!(words_to_u128(&[0, 0, 0, 0, 1]), None);
/// ```
pub fn words_to_u128(words: &[u32]) -> Option<u128> {
    let mut acc = 0u128;
    for (i, &w) in words.iter().enumerate() {
        if i >= 4 {
            if w != 0 {
                return None;
            }
        } else {
            acc |= (w as u128) << (32 * i);
        }
    }
    Some(acc)
}

/// The number of words up to and including the most significant non-zero one.
#[inline]
pub fn significant_words(words: &[u32]) -> usize {
    words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_extraction() {
        assert_eq!(hi_word(u64::MAX), u32::MAX);
        assert_eq!(lo_word(0x1_0000_0000), 0);
        assert_eq!(hi_word_signed(-1), -1);
        assert_eq!(hi_word_signed(i64::MIN), i32::MIN);
        assert_eq!(join_words_signed(-1, 0), -0x1_0000_0000);
    }

    #[test]
    fn test_fit_checks() {
        assert!(fits_i32(i32::MIN as i64));
        assert!(!fits_i32(i32::MAX as i64 + 1));
        assert!(fits_u32(u32::MAX as u64));
        assert!(!fits_u32(1 << 32));
        assert!(!fits_u32_signed(-1));
        assert!(fits_u32_signed(u32::MAX as i64));
    }

    #[test]
    fn test_sign_helpers() {
        assert_eq!(abs_magnitude(i64::MIN), 1 << 63);
        assert_eq!(apply_sign(true, 1 << 63), i64::MIN);
        assert_eq!(apply_sign(true, 5), -5);
        assert_eq!(apply_sign(false, 5), 5);
    }

    #[test]
    fn test_significant_words() {
        assert_eq!(significant_words(&[]), 0);
        assert_eq!(significant_words(&[0, 0]), 0);
        assert_eq!(significant_words(&[3, 0, 7, 0]), 3);
    }
}
