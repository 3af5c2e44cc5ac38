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

//! # Checker
//!
//! The checked call shapes of every kernel operation.
//!
//! A [`Checker`] is either [`Checker::AMBIENT`], which reports overflow to the
//! current thread's ambient policy, or [`Checker::explicit`], which reports
//! it under an [`ErrorAction`] so that a policy bound to that action handles
//! it. In both cases the operation computes the exact result at double width,
//! and if it does not fit reports exactly once and returns the saturated value.
//!
//! Conditions that are never policy-routed (a zero divisor in `div_rem`, a
//! shift amount outside the valid range) terminate the process through
//! [`crate::fatal`].

use crate::{
    fatal::{self, require},
    policy::{action::ErrorAction, context, handler::OverflowEvent},
};
use checkwide_core::{
    convert,
    error::{ArithError, Diagnostic},
    num::{int::KernelInt, outcome::Outcome},
    scale,
};

/// Selects where a checked operation reports overflow.
///
/// # Examples
///
/// ```rust
/// # use checkwide::{checker::Checker, policy::{context, strategy::{ErrorPolicy, OverflowCounter}}};
/// let counter = OverflowCounter::new();
/// context::with_policy(ErrorPolicy::Count(counter.clone()), || {
///     let c = Checker::AMBIENT;
///     assert_eq!(c.add(i64::MAX, 1), i64::MAX);
///     assert_eq!(c.sub(0u32, 1), 0);
///     assert_eq!(c.mul(-3i32, 4), -12);
/// })
/// .unwrap();
/// assert_eq!(counter.get(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Checker {
    action: Option<ErrorAction>,
}

impl std::fmt::Display for Checker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.action {
            Some(action) => write!(f, "Checker({})", action),
            None => write!(f, "Checker(Ambient)"),
        }
    }
}

impl Checker {
    /// Reports to the ambient policy.
    pub const AMBIENT: Checker = Checker { action: None };

    /// Reports under an explicit action.
    #[inline]
    pub const fn explicit(action: ErrorAction) -> Self {
        Checker {
            action: Some(action),
        }
    }

    /// The explicit action, if any.
    #[inline]
    pub const fn action(&self) -> Option<ErrorAction> {
        self.action
    }

    #[cold]
    #[inline(never)]
    fn report<T: KernelInt>(&self, operation: &'static str, diagnostic: Diagnostic) {
        context::dispatch(&OverflowEvent {
            operation,
            operand_type: T::TYPE_NAME,
            diagnostic,
            action: self.action,
        });
    }

    #[inline]
    fn settle<T: KernelInt>(
        &self,
        operation: &'static str,
        diagnostic: Diagnostic,
        outcome: Outcome<T>,
    ) -> T {
        if outcome.is_overflow() {
            self.report::<T>(operation, diagnostic);
        }
        outcome.saturated()
    }

    /// `x + y`, saturating.
    #[inline]
    pub fn add<T: KernelInt>(&self, x: T, y: T) -> T {
        self.settle("add", Diagnostic::Overflow, x.overflowing_add_val(y))
    }

    /// `x - y`, saturating. An unsigned underflow yields `0`.
    #[inline]
    pub fn sub<T: KernelInt>(&self, x: T, y: T) -> T {
        self.settle("sub", Diagnostic::Overflow, x.overflowing_sub_val(y))
    }

    /// `-x`.
    ///
    /// Negating the most negative signed value reports and returns the input
    /// unchanged. Negating a non-zero unsigned value reports and returns `0`.
    #[inline]
    pub fn neg<T: KernelInt>(&self, x: T) -> T {
        match x.overflowing_neg_val() {
            Outcome::Fits(value) => value,
            Outcome::Overflow { .. } => {
                self.report::<T>("neg", Diagnostic::Overflow);
                if T::SIGNED { x } else { T::zero() }
            }
        }
    }

    /// `x * y`, saturating to the sign of the exact product.
    #[inline]
    pub fn mul<T: KernelInt>(&self, x: T, y: T) -> T {
        self.settle("mul", Diagnostic::Overflow, x.overflowing_mul_val(y))
    }

    /// The full double-width product as `(low, high)`. Never overflows.
    #[inline]
    pub fn mul_wide<T: KernelInt>(&self, x: T, y: T) -> (T, T) {
        x.widening_mul_val(y)
    }

    /// Truncating quotient and remainder.
    ///
    /// A zero divisor terminates the process. `MIN / -1` reports a divide
    /// check and returns `(MAX, 0)`.
    pub fn div_rem<T: KernelInt>(&self, x: T, y: T) -> (T, T) {
        if y.is_zero() {
            fatal::unconditional("div_rem", &ArithError::DivideByZero);
        }
        match x.checked_div(&y) {
            Some(q) => (q, x % y),
            None => {
                self.report::<T>("div_rem", Diagnostic::DivideCheck);
                (T::max_value(), T::zero())
            }
        }
    }

    /// `x << n`, saturating. `n` may equal the type width; larger amounts
    /// terminate the process.
    #[inline]
    pub fn shl<T: KernelInt>(&self, x: T, n: u32) -> T {
        check_shift::<T>("shl", n);
        let outcome = require("shl", scale::scale(x, n as i32));
        self.settle("shl", Diagnostic::ScaleOverflow, outcome)
    }

    /// `x >> n`: arithmetic for signed types, logical for unsigned ones.
    ///
    /// Shifting by the full width yields `0`, or `-1` for a negative signed
    /// value. Larger amounts terminate the process. Never overflows.
    #[inline]
    pub fn shr<T: KernelInt>(&self, x: T, n: u32) -> T {
        check_shift::<T>("shr", n);
        shr_full(x, n)
    }

    /// `x * y * 2^shift`, rounding half away from zero when `shift < 0`.
    #[inline]
    pub fn mul_scale<T: KernelInt>(&self, x: T, y: T, shift: i32) -> T {
        let outcome = require("mul_scale", scale::mul_scale(x, y, shift));
        self.settle("mul_scale", Diagnostic::ScaleOverflow, outcome)
    }

    /// `x * 2^shift`, rounding half away from zero when `shift < 0`.
    #[inline]
    pub fn scale<T: KernelInt>(&self, x: T, shift: i32) -> T {
        let outcome = require("scale", scale::scale(x, shift));
        self.settle("scale", Diagnostic::ScaleOverflow, outcome)
    }

    /// Truncating quotient and remainder of `x * y / d`. A zero divisor
    /// yields `(0, 0)` without reporting.
    #[inline]
    pub fn mul_div_rem<T: KernelInt>(&self, x: T, y: T, d: T) -> (T, T) {
        let (q, r) = require("mul_div_rem", scale::mul_div_rem(x, y, d));
        (self.settle("mul_div_rem", Diagnostic::ScaleOverflow, q), r)
    }

    /// `x * y / d` rounded half away from zero. A zero divisor yields `0`
    /// without reporting.
    #[inline]
    pub fn mul_div_round<T: KernelInt>(&self, x: T, y: T, d: T) -> T {
        let outcome = require("mul_div_round", scale::mul_div_round(x, y, d));
        self.settle("mul_div_round", Diagnostic::ScaleOverflow, outcome)
    }

    /// `(x / 2^shift) / y` rounded half away from zero. A zero divisor yields
    /// `0` without reporting.
    #[inline]
    pub fn div_scale_round<T: KernelInt>(&self, x: T, shift: i32, y: T) -> T {
        let outcome = require("div_scale_round", scale::div_scale_round(x, shift, y));
        self.settle("div_scale_round", Diagnostic::ScaleOverflow, outcome)
    }

    /// `acc + x * y * 2^shift`.
    ///
    /// The scaled product and the accumulation are checked separately, so a
    /// step whose product and sum both overflow reports twice.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use checkwide::checker::Checker;
    /// let c = Checker::AMBIENT;
    /// let acc = c.mul_shift_add(0x3_0000_0001i64, 0xFFFF, 0x30001, 0);
    /// assert_eq!(acc, 0x5_FFFE_0000);
    /// ```
    #[inline]
    pub fn mul_shift_add<T: KernelInt>(&self, acc: T, x: T, y: T, shift: i32) -> T {
        let outcome = require("mul_shift_add", scale::mul_scale(x, y, shift));
        let product = self.settle("mul_shift_add", Diagnostic::ScaleOverflow, outcome);
        self.settle(
            "mul_shift_add",
            Diagnostic::Overflow,
            acc.overflowing_add_val(product),
        )
    }

    /// Converts between kernel integer types, saturating.
    #[inline]
    pub fn narrow<S: KernelInt, D: KernelInt>(&self, x: S) -> D {
        self.settle("narrow", Diagnostic::Conversion, convert::narrow(x))
    }

    /// Rounds half away from zero and converts, saturating. NaN reports and
    /// yields `0`.
    pub fn from_f64<T: KernelInt>(&self, value: f64) -> T {
        match convert::from_f64(value) {
            Some(outcome) => self.settle("from_f64", Diagnostic::Conversion, outcome),
            None => {
                self.report::<T>("from_f64", Diagnostic::Conversion);
                T::zero()
            }
        }
    }

    /// Converts to the nearest `f64`.
    #[inline]
    pub fn to_f64<T: KernelInt>(&self, x: T) -> f64 {
        convert::to_f64(x)
    }
}

/// Terminates the process if `n` exceeds the width of `T`.
#[inline]
pub(crate) fn check_shift<T: KernelInt>(operation: &str, n: u32) {
    if n > T::BITS {
        fatal::unconditional(
            operation,
            &ArithError::ShiftRange {
                shift: n as i64,
                min: 0,
                max: T::BITS as i64,
            },
        );
    }
}

/// `x >> n` for `n <= BITS`, without shifting by the full width.
#[inline]
pub(crate) fn shr_full<T: KernelInt>(x: T, n: u32) -> T {
    if n == T::BITS {
        if x.is_negative_val() { !T::zero() } else { T::zero() }
    } else {
        x >> n as usize
    }
}
