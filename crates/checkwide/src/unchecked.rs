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

//! Unchecked operations.
//!
//! These return the exact result reduced modulo `2^BITS` and never consult a
//! policy. The caller must have established that the exact result fits; debug
//! builds assert it. Conditions that are fatal in every call shape (a zero
//! divisor in `div_rem`, an invalid shift amount) still terminate the process.

use crate::{
    checker::{check_shift, shr_full},
    fatal::{self, require},
};
use checkwide_core::{
    convert,
    error::ArithError,
    num::{int::KernelInt, outcome::Outcome},
    scale,
};

#[inline(always)]
fn assume_fits<T: KernelInt>(operation: &str, outcome: Outcome<T>) -> T {
    debug_assert!(
        !outcome.is_overflow(),
        "called `unchecked::{}` with operands whose result overflows: {}",
        operation,
        outcome
    );
    outcome.wrapped()
}

#[inline]
pub fn add<T: KernelInt>(x: T, y: T) -> T {
    assume_fits("add", x.overflowing_add_val(y))
}

#[inline]
pub fn sub<T: KernelInt>(x: T, y: T) -> T {
    assume_fits("sub", x.overflowing_sub_val(y))
}

#[inline]
pub fn neg<T: KernelInt>(x: T) -> T {
    assume_fits("neg", x.overflowing_neg_val())
}

#[inline]
pub fn mul<T: KernelInt>(x: T, y: T) -> T {
    assume_fits("mul", x.overflowing_mul_val(y))
}

#[inline]
pub fn mul_wide<T: KernelInt>(x: T, y: T) -> (T, T) {
    x.widening_mul_val(y)
}

/// Truncating quotient and remainder; `MIN / -1` wraps to `(MIN, 0)`.
#[inline]
pub fn div_rem<T: KernelInt>(x: T, y: T) -> (T, T) {
    if y.is_zero() {
        fatal::unconditional("div_rem", &ArithError::DivideByZero);
    }
    match x.checked_div(&y) {
        Some(q) => (q, x % y),
        None => {
            debug_assert!(false, "called `unchecked::div_rem` with MIN / -1");
            (T::min_value(), T::zero())
        }
    }
}

/// `x << n`; shifting by the full width yields `0`.
#[inline]
pub fn shl<T: KernelInt>(x: T, n: u32) -> T {
    check_shift::<T>("shl", n);
    if n == T::BITS {
        debug_assert!(x.is_zero(), "called `unchecked::shl` shifting out set bits");
        T::zero()
    } else {
        x << n as usize
    }
}

#[inline]
pub fn shr<T: KernelInt>(x: T, n: u32) -> T {
    check_shift::<T>("shr", n);
    shr_full(x, n)
}

#[inline]
pub fn mul_scale<T: KernelInt>(x: T, y: T, shift: i32) -> T {
    assume_fits("mul_scale", require("mul_scale", scale::mul_scale(x, y, shift)))
}

#[inline]
pub fn scale<T: KernelInt>(x: T, shift: i32) -> T {
    assume_fits("scale", require("scale", scale::scale(x, shift)))
}

#[inline]
pub fn mul_div_rem<T: KernelInt>(x: T, y: T, d: T) -> (T, T) {
    let (q, r) = require("mul_div_rem", scale::mul_div_rem(x, y, d));
    (assume_fits("mul_div_rem", q), r)
}

#[inline]
pub fn mul_div_round<T: KernelInt>(x: T, y: T, d: T) -> T {
    assume_fits(
        "mul_div_round",
        require("mul_div_round", scale::mul_div_round(x, y, d)),
    )
}

#[inline]
pub fn div_scale_round<T: KernelInt>(x: T, shift: i32, y: T) -> T {
    assume_fits(
        "div_scale_round",
        require("div_scale_round", scale::div_scale_round(x, shift, y)),
    )
}

#[inline]
pub fn mul_shift_add<T: KernelInt>(acc: T, x: T, y: T, shift: i32) -> T {
    add(acc, mul_scale(x, y, shift))
}

/// Converts between kernel integer types modulo `2^BITS`, like `as`.
#[inline]
pub fn narrow<S: KernelInt, D: KernelInt>(x: S) -> D {
    assume_fits("narrow", convert::narrow(x))
}

/// Rounds half away from zero and converts. NaN yields `0`.
#[inline]
pub fn from_f64<T: KernelInt>(value: f64) -> T {
    match convert::from_f64(value) {
        Some(outcome) => assume_fits("from_f64", outcome),
        None => {
            debug_assert!(false, "called `unchecked::from_f64` with NaN");
            T::zero()
        }
    }
}

#[inline]
pub fn to_f64<T: KernelInt>(x: T) -> f64 {
    convert::to_f64(x)
}
