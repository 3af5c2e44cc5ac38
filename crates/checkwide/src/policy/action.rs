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

/// A caller-chosen error code used to select a bound overflow policy.
///
/// The kernel attaches no meaning to the value; it is only a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ErrorCode(pub u32);

impl ErrorCode {
    /// Creates a new `ErrorCode`.
    #[inline(always)]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    /// Returns the raw code.
    #[inline(always)]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ErrorCode {
    #[inline(always)]
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ErrorCode({})", self.0)
    }
}

/// What kind of reaction an overflow policy has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PolicyKind {
    /// Report and terminate the process.
    Abort,
    /// Increment a counter.
    Count,
    /// OR a mask into a flag word.
    SetFlags,
    /// Invoke a handler.
    Callback,
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::Abort => write!(f, "Abort"),
            PolicyKind::Count => write!(f, "Count"),
            PolicyKind::SetFlags => write!(f, "SetFlags"),
            PolicyKind::Callback => write!(f, "Callback"),
        }
    }
}

/// An explicit overflow action: a policy kind paired with an error code.
///
/// `Abort(ErrorCode(72))` and `Count(ErrorCode(72))` are distinct actions and
/// may be bound to distinct policies.
///
/// # Examples
///
/// ```rust
/// # use checkwide::policy::action::{ErrorAction, ErrorCode, PolicyKind};
/// let action = ErrorAction::Count(ErrorCode(72));
/// assert_eq!(action.kind(), PolicyKind::Count);
/// assert_eq!(action.code(), ErrorCode(72));
/// assert_ne!(action, ErrorAction::Abort(ErrorCode(72)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorAction {
    Abort(ErrorCode),
    Count(ErrorCode),
    SetFlags(ErrorCode),
    Callback(ErrorCode),
}

impl ErrorAction {
    /// Builds an action from its parts.
    #[inline]
    pub const fn from_parts(kind: PolicyKind, code: ErrorCode) -> Self {
        match kind {
            PolicyKind::Abort => ErrorAction::Abort(code),
            PolicyKind::Count => ErrorAction::Count(code),
            PolicyKind::SetFlags => ErrorAction::SetFlags(code),
            PolicyKind::Callback => ErrorAction::Callback(code),
        }
    }

    /// The policy kind this action selects.
    #[inline]
    pub const fn kind(self) -> PolicyKind {
        match self {
            ErrorAction::Abort(_) => PolicyKind::Abort,
            ErrorAction::Count(_) => PolicyKind::Count,
            ErrorAction::SetFlags(_) => PolicyKind::SetFlags,
            ErrorAction::Callback(_) => PolicyKind::Callback,
        }
    }

    /// The error code this action carries.
    #[inline]
    pub const fn code(self) -> ErrorCode {
        match self {
            ErrorAction::Abort(code)
            | ErrorAction::Count(code)
            | ErrorAction::SetFlags(code)
            | ErrorAction::Callback(code) => code,
        }
    }
}

impl std::fmt::Display for ErrorAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind(), self.code().get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_round_trip() {
        for kind in [
            PolicyKind::Abort,
            PolicyKind::Count,
            PolicyKind::SetFlags,
            PolicyKind::Callback,
        ] {
            let action = ErrorAction::from_parts(kind, ErrorCode(9));
            assert_eq!(action.kind(), kind);
            assert_eq!(action.code(), ErrorCode(9));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorAction::SetFlags(ErrorCode(3)).to_string(), "SetFlags(3)");
        assert_eq!(ErrorCode::from(4).to_string(), "ErrorCode(4)");
    }
}
