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

//! Default-checked operations.
//!
//! Each function is the [`Checker::AMBIENT`] form of the operation of the same
//! name: overflow is reported to the current thread's ambient policy and the
//! saturated value is returned.

use crate::checker::Checker;
use checkwide_core::num::int::KernelInt;

#[inline]
pub fn add<T: KernelInt>(x: T, y: T) -> T {
    Checker::AMBIENT.add(x, y)
}

#[inline]
pub fn sub<T: KernelInt>(x: T, y: T) -> T {
    Checker::AMBIENT.sub(x, y)
}

#[inline]
pub fn neg<T: KernelInt>(x: T) -> T {
    Checker::AMBIENT.neg(x)
}

#[inline]
pub fn mul<T: KernelInt>(x: T, y: T) -> T {
    Checker::AMBIENT.mul(x, y)
}

#[inline]
pub fn mul_wide<T: KernelInt>(x: T, y: T) -> (T, T) {
    Checker::AMBIENT.mul_wide(x, y)
}

#[inline]
pub fn div_rem<T: KernelInt>(x: T, y: T) -> (T, T) {
    Checker::AMBIENT.div_rem(x, y)
}

#[inline]
pub fn shl<T: KernelInt>(x: T, n: u32) -> T {
    Checker::AMBIENT.shl(x, n)
}

#[inline]
pub fn shr<T: KernelInt>(x: T, n: u32) -> T {
    Checker::AMBIENT.shr(x, n)
}

#[inline]
pub fn mul_scale<T: KernelInt>(x: T, y: T, shift: i32) -> T {
    Checker::AMBIENT.mul_scale(x, y, shift)
}

#[inline]
pub fn scale<T: KernelInt>(x: T, shift: i32) -> T {
    Checker::AMBIENT.scale(x, shift)
}

#[inline]
pub fn mul_div_rem<T: KernelInt>(x: T, y: T, d: T) -> (T, T) {
    Checker::AMBIENT.mul_div_rem(x, y, d)
}

#[inline]
pub fn mul_div_round<T: KernelInt>(x: T, y: T, d: T) -> T {
    Checker::AMBIENT.mul_div_round(x, y, d)
}

/// `(x / 2^shift) / y` rounded half away from zero.
///
/// # Examples
///
/// ```rust
/// # use checkwide::checked;
/// assert_eq!(checked::div_scale_round(-100i64, 2, 8), -3);
/// assert_eq!(checked::div_scale_round(100i64, 1, 0), 0);
/// ```
#[inline]
pub fn div_scale_round<T: KernelInt>(x: T, shift: i32, y: T) -> T {
    Checker::AMBIENT.div_scale_round(x, shift, y)
}

#[inline]
pub fn mul_shift_add<T: KernelInt>(acc: T, x: T, y: T, shift: i32) -> T {
    Checker::AMBIENT.mul_shift_add(acc, x, y, shift)
}

#[inline]
pub fn narrow<S: KernelInt, D: KernelInt>(x: S) -> D {
    Checker::AMBIENT.narrow(x)
}

#[inline]
pub fn from_f64<T: KernelInt>(value: f64) -> T {
    Checker::AMBIENT.from_f64(value)
}

#[inline]
pub fn to_f64<T: KernelInt>(x: T) -> f64 {
    Checker::AMBIENT.to_f64(x)
}
