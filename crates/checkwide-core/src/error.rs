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

//! Diagnostic codes and unconditional errors.
//!
//! Every condition the kernel can report carries a stable numeric
//! [`Diagnostic`] code and a short message. [`ArithError`] covers the
//! conditions that are never routed through an overflow policy: a zero divisor
//! reaching the long-division engine, a shift amount outside the documented
//! range, and a failed internal consistency check.

/// A stable diagnostic code with a short human-readable message.
///
/// # Examples
///
/// ```rust
/// # use checkwide_core::error::Diagnostic;
/// assert_eq!(Diagnostic::ScaleOverflow.code(), 72);
/// assert_eq!(Diagnostic::ScaleOverflow.to_string(), "[72] fixed-point scaling overflow");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Diagnostic {
    /// Division by zero.
    DivideByZero,
    /// A quotient does not fit the result type.
    DivideCheck,
    /// A scaled multiply, divide or shift produced an unrepresentable result.
    ScaleOverflow,
    /// A shift amount is outside the valid range.
    ShiftRange,
    /// An add, subtract, negate or multiply produced an unrepresentable result.
    Overflow,
    /// A narrowing or floating-point conversion lost the value.
    Conversion,
    /// An internal consistency check failed.
    Internal,
}

impl Diagnostic {
    /// All diagnostics, in code order.
    pub const ALL: [Diagnostic; 7] = [
        Diagnostic::DivideByZero,
        Diagnostic::DivideCheck,
        Diagnostic::ScaleOverflow,
        Diagnostic::ShiftRange,
        Diagnostic::Overflow,
        Diagnostic::Conversion,
        Diagnostic::Internal,
    ];

    /// The stable numeric code.
    #[inline]
    pub const fn code(self) -> u32 {
        match self {
            Diagnostic::DivideByZero => 70,
            Diagnostic::DivideCheck => 71,
            Diagnostic::ScaleOverflow => 72,
            Diagnostic::ShiftRange => 73,
            Diagnostic::Overflow => 74,
            Diagnostic::Conversion => 75,
            Diagnostic::Internal => 76,
        }
    }

    /// The short message.
    #[inline]
    pub const fn message(self) -> &'static str {
        match self {
            Diagnostic::DivideByZero => "divide by zero",
            Diagnostic::DivideCheck => "divide check",
            Diagnostic::ScaleOverflow => "fixed-point scaling overflow",
            Diagnostic::ShiftRange => "shift amount out of range",
            Diagnostic::Overflow => "arithmetic overflow",
            Diagnostic::Conversion => "conversion out of range",
            Diagnostic::Internal => "internal consistency check failed",
        }
    }

    /// Looks a diagnostic up by its numeric code.
    pub fn from_code(code: u32) -> Option<Diagnostic> {
        Self::ALL.into_iter().find(|d| d.code() == code)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

/// A condition that is fatal regardless of the configured overflow policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithError {
    /// The long-division engine was handed a zero divisor.
    #[error("division by zero")]
    DivideByZero,
    /// A shift amount lies outside `min..=max`.
    #[error("shift amount {shift} outside the valid range {min}..={max}")]
    ShiftRange {
        /// The offending shift amount.
        shift: i64,
        /// Smallest valid amount.
        min: i64,
        /// Largest valid amount.
        max: i64,
    },
    /// An internal invariant does not hold.
    #[error("internal consistency check failed: {0}")]
    Internal(&'static str),
}

impl ArithError {
    /// The diagnostic this error is reported under.
    #[inline]
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            ArithError::DivideByZero => Diagnostic::DivideByZero,
            ArithError::ShiftRange { .. } => Diagnostic::ShiftRange,
            ArithError::Internal(_) => Diagnostic::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique_and_stable() {
        let codes: Vec<u32> = Diagnostic::ALL.iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec![70, 71, 72, 73, 74, 75, 76]);
        for d in Diagnostic::ALL {
            assert_eq!(Diagnostic::from_code(d.code()), Some(d));
        }
        assert_eq!(Diagnostic::from_code(1), None);
    }

    #[test]
    fn test_error_diagnostics() {
        assert_eq!(ArithError::DivideByZero.diagnostic(), Diagnostic::DivideByZero);
        let e = ArithError::ShiftRange {
            shift: 40,
            min: 0,
            max: 32,
        };
        assert_eq!(e.diagnostic(), Diagnostic::ShiftRange);
        assert_eq!(e.to_string(), "shift amount 40 outside the valid range 0..=32");
    }
}
