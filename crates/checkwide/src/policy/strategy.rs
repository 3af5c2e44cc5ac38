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

use crate::policy::{
    action::PolicyKind,
    handler::{FnHandler, OverflowEvent, OverflowHandler},
};
use std::sync::{
    Arc,
    atomic::{AtomicU32, AtomicU64, Ordering},
};

/// A shared overflow counter.
///
/// Clones share the same count, so a caller keeps one handle and registers
/// the other with a `Count` policy.
#[derive(Debug, Clone, Default)]
pub struct OverflowCounter(Arc<AtomicU64>);

impl OverflowCounter {
    /// Creates a new counter at zero.
    #[inline]
    pub fn new() -> Self {
        Self(Arc::new(AtomicU64::new(0)))
    }

    /// The current count.
    #[inline]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Increments the count by one.
    #[inline]
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Resets the count to zero and returns the previous value.
    #[inline]
    pub fn reset(&self) -> u64 {
        self.0.swap(0, Ordering::Relaxed)
    }

    /// Returns `true` if both handles share the same count.
    #[inline]
    pub fn same_as(&self, other: &OverflowCounter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A shared flag word that `SetFlags` policies OR their mask into.
#[derive(Debug, Clone, Default)]
pub struct FlagWord(Arc<AtomicU32>);

impl FlagWord {
    /// Creates a new flag word with no bits set.
    #[inline]
    pub fn new() -> Self {
        Self(Arc::new(AtomicU32::new(0)))
    }

    /// The current bits.
    #[inline]
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    /// ORs `mask` into the word.
    #[inline]
    pub fn set(&self, mask: u32) {
        self.0.fetch_or(mask, Ordering::Relaxed);
    }

    /// Clears all bits and returns the previous value.
    #[inline]
    pub fn clear(&self) -> u32 {
        self.0.swap(0, Ordering::Relaxed)
    }

    /// Returns `true` if both handles share the same word.
    #[inline]
    pub fn same_as(&self, other: &FlagWord) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// What happens when a checked operation overflows.
///
/// The target of a policy (counter, flag word or handler) is shared with the
/// caller that registered it. Two policies compare equal when they have the
/// same kind and the same target.
///
/// # Examples
///
/// ```rust
/// # use checkwide::policy::strategy::{ErrorPolicy, OverflowCounter};
/// let counter = OverflowCounter::new();
/// let policy = ErrorPolicy::Count(counter.clone());
/// assert_eq!(policy, ErrorPolicy::Count(counter));
/// assert_ne!(policy, ErrorPolicy::Count(OverflowCounter::new()));
/// ```
#[derive(Clone, Default)]
pub enum ErrorPolicy {
    /// Report the overflow and terminate the process.
    #[default]
    Abort,
    /// Increment the counter.
    Count(OverflowCounter),
    /// OR `mask` into `flags`.
    SetFlags { flags: FlagWord, mask: u32 },
    /// Invoke the handler and return to the caller.
    Callback(Arc<dyn OverflowHandler>),
}

impl ErrorPolicy {
    /// Wraps a closure as a `Callback` policy.
    #[inline]
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&OverflowEvent) + Send + Sync + 'static,
    {
        ErrorPolicy::Callback(Arc::new(FnHandler::new(f)))
    }

    /// The kind of this policy.
    #[inline]
    pub fn kind(&self) -> PolicyKind {
        match self {
            ErrorPolicy::Abort => PolicyKind::Abort,
            ErrorPolicy::Count(_) => PolicyKind::Count,
            ErrorPolicy::SetFlags { .. } => PolicyKind::SetFlags,
            ErrorPolicy::Callback(_) => PolicyKind::Callback,
        }
    }
}

impl PartialEq for ErrorPolicy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ErrorPolicy::Abort, ErrorPolicy::Abort) => true,
            (ErrorPolicy::Count(a), ErrorPolicy::Count(b)) => a.same_as(b),
            (
                ErrorPolicy::SetFlags { flags: fa, mask: ma },
                ErrorPolicy::SetFlags { flags: fb, mask: mb },
            ) => fa.same_as(fb) && ma == mb,
            (ErrorPolicy::Callback(a), ErrorPolicy::Callback(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl Eq for ErrorPolicy {}

impl std::fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPolicy::Abort => write!(f, "Abort"),
            ErrorPolicy::Count(counter) => f.debug_tuple("Count").field(&counter.get()).finish(),
            ErrorPolicy::SetFlags { flags, mask } => f
                .debug_struct("SetFlags")
                .field("flags", &format_args!("{:#x}", flags.get()))
                .field("mask", &format_args!("{:#x}", mask))
                .finish(),
            ErrorPolicy::Callback(handler) => f.debug_tuple("Callback").field(&handler.name()).finish(),
        }
    }
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPolicy::Abort => write!(f, "Abort"),
            ErrorPolicy::Count(counter) => write!(f, "Count({})", counter.get()),
            ErrorPolicy::SetFlags { mask, .. } => write!(f, "SetFlags({:#x})", mask),
            ErrorPolicy::Callback(handler) => write!(f, "Callback({})", handler.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::handler::RecordingHandler;

    #[test]
    fn test_counter_handles_share_state() {
        let a = OverflowCounter::new();
        let b = a.clone();
        b.increment();
        b.increment();
        assert_eq!(a.get(), 2);
        assert_eq!(a.reset(), 2);
        assert_eq!(b.get(), 0);
    }

    #[test]
    fn test_flag_word_accumulates_masks() {
        let flags = FlagWord::new();
        flags.set(0b0001);
        flags.set(0b0100);
        flags.set(0b0001);
        assert_eq!(flags.get(), 0b0101);
        assert_eq!(flags.clear(), 0b0101);
        assert_eq!(flags.get(), 0);
    }

    #[test]
    fn test_policy_equality_is_by_target() {
        let flags = FlagWord::new();
        let a = ErrorPolicy::SetFlags {
            flags: flags.clone(),
            mask: 1,
        };
        assert_eq!(
            a,
            ErrorPolicy::SetFlags {
                flags: flags.clone(),
                mask: 1
            }
        );
        assert_ne!(a, ErrorPolicy::SetFlags { flags, mask: 2 });

        let handler: Arc<dyn OverflowHandler> = Arc::new(RecordingHandler::new());
        let cb = ErrorPolicy::Callback(handler.clone());
        assert_eq!(cb, ErrorPolicy::Callback(handler));
        assert_ne!(cb, ErrorPolicy::callback(|_| {}));
        assert_ne!(cb, ErrorPolicy::Abort);
    }

    #[test]
    fn test_kind_and_formatting() {
        assert_eq!(ErrorPolicy::default(), ErrorPolicy::Abort);
        assert_eq!(ErrorPolicy::Count(OverflowCounter::new()).kind(), PolicyKind::Count);
        assert_eq!(ErrorPolicy::callback(|_| {}).to_string(), "Callback(FnHandler)");
        let flags = ErrorPolicy::SetFlags {
            flags: FlagWord::new(),
            mask: 0x10,
        };
        assert_eq!(flags.to_string(), "SetFlags(0x10)");
        assert_eq!(format!("{:?}", flags), "SetFlags { flags: 0x0, mask: 0x10 }");
    }
}
