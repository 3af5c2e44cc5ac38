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

//! # Policy Context
//!
//! The per-thread configuration that decides what a checked operation does
//! when its exact result does not fit.
//!
//! A [`PolicyContext`] holds a bounded LIFO stack of ambient policies whose
//! bottom entry is a built-in [`ErrorPolicy::Abort`], a table of policies
//! bound to explicit [`ErrorAction`]s, and the test-mode flag. Each thread owns
//! one context, reached through the free functions of this module, so
//! concurrent callers (and parallel tests) never observe each other's
//! configuration.
//!
//! ## Resolution
//!
//! - No explicit action: the top of the stack.
//! - An explicit action bound via [`bind`]: the bound policy.
//! - An unbound `ErrorAction::Abort(code)`: abort, reporting `code`.
//! - Any other unbound explicit action: the top of the stack.
//!
//! ## Example
//!
//! ```rust
//! # use checkwide::{checker::Checker, policy::{action::{ErrorAction, ErrorCode}, context, strategy::{ErrorPolicy, OverflowCounter}}};
//! let counter = OverflowCounter::new();
//! context::bind(ErrorAction::Count(ErrorCode(7)), ErrorPolicy::Count(counter.clone())).unwrap();
//!
//! let checker = Checker::explicit(ErrorAction::Count(ErrorCode(7)));
//! assert_eq!(checker.mul(i32::MAX, 2), i32::MAX);
//! assert_eq!(counter.get(), 1);
//! # context::unbind(ErrorAction::Count(ErrorCode(7)));
//! ```

use crate::{
    fatal,
    policy::{
        action::{ErrorAction, ErrorCode, PolicyKind},
        handler::OverflowEvent,
        strategy::ErrorPolicy,
    },
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;

/// The maximum number of entries on a policy stack, built-in entry included.
pub const POLICY_STACK_CAPACITY: usize = 5;

/// An invalid change to a policy context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// A push would exceed the stack capacity.
    #[error("policy stack is full ({capacity} entries)")]
    StackFull { capacity: usize },
    /// A pop would remove the built-in bottom entry.
    #[error("the built-in abort policy cannot be unregistered")]
    BuiltinEntry,
    /// A policy was bound to an action of a different kind.
    #[error("cannot bind a {policy} policy to a {action} action")]
    KindMismatch {
        action: PolicyKind,
        policy: PolicyKind,
    },
}

/// The policy a dispatch resolved to, and the error code to report with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub policy: ErrorPolicy,
    pub code: Option<ErrorCode>,
    /// Whether an explicit action was unbound and fell back to the ambient policy.
    pub fallback: bool,
}

/// A bounded stack of ambient policies plus explicit bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyContext {
    stack: SmallVec<[ErrorPolicy; POLICY_STACK_CAPACITY]>,
    bindings: FxHashMap<(PolicyKind, ErrorCode), ErrorPolicy>,
    test_mode: bool,
}

impl Default for PolicyContext {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyContext {
    /// Creates a context holding only the built-in `Abort` entry.
    #[inline]
    pub fn new() -> Self {
        let mut stack = SmallVec::new();
        stack.push(ErrorPolicy::Abort);
        Self {
            stack,
            bindings: FxHashMap::default(),
            test_mode: false,
        }
    }

    /// The number of stack entries, built-in entry included.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The top of the stack.
    #[inline]
    pub fn ambient(&self) -> &ErrorPolicy {
        // The built-in entry is never popped.
        &self.stack[self.stack.len() - 1]
    }

    /// Pushes a new ambient policy and returns the new depth.
    pub fn push(&mut self, policy: ErrorPolicy) -> Result<usize, PolicyError> {
        if self.stack.len() >= POLICY_STACK_CAPACITY {
            return Err(PolicyError::StackFull {
                capacity: POLICY_STACK_CAPACITY,
            });
        }
        tracing::debug!(policy = %policy, depth = self.stack.len() + 1, "registered ambient policy");
        self.stack.push(policy);
        Ok(self.stack.len())
    }

    /// Pops the most recently pushed ambient policy.
    pub fn pop(&mut self) -> Result<ErrorPolicy, PolicyError> {
        if self.stack.len() <= 1 {
            return Err(PolicyError::BuiltinEntry);
        }
        let policy = self.stack.remove(self.stack.len() - 1);
        tracing::debug!(policy = %policy, depth = self.stack.len(), "unregistered ambient policy");
        Ok(policy)
    }

    /// Binds `policy` to an explicit action, returning the previous binding.
    pub fn bind(
        &mut self,
        action: ErrorAction,
        policy: ErrorPolicy,
    ) -> Result<Option<ErrorPolicy>, PolicyError> {
        if action.kind() != policy.kind() {
            return Err(PolicyError::KindMismatch {
                action: action.kind(),
                policy: policy.kind(),
            });
        }
        Ok(self.bindings.insert((action.kind(), action.code()), policy))
    }

    /// Removes the binding of an explicit action.
    #[inline]
    pub fn unbind(&mut self, action: ErrorAction) -> Option<ErrorPolicy> {
        self.bindings.remove(&(action.kind(), action.code()))
    }

    /// The policy bound to an explicit action.
    #[inline]
    pub fn binding(&self, action: ErrorAction) -> Option<&ErrorPolicy> {
        self.bindings.get(&(action.kind(), action.code()))
    }

    /// The number of explicit bindings.
    #[inline]
    pub fn bindings_len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    /// Makes `Abort` policies log and return instead of terminating.
    #[inline]
    pub fn set_test_mode(&mut self, enabled: bool) {
        self.test_mode = enabled;
    }

    /// Resolves the policy for a call site's explicit action, if any.
    pub fn resolve(&self, action: Option<ErrorAction>) -> Resolution {
        let Some(action) = action else {
            return Resolution {
                policy: self.ambient().clone(),
                code: None,
                fallback: false,
            };
        };
        match (self.binding(action), action) {
            (Some(policy), _) => Resolution {
                policy: policy.clone(),
                code: Some(action.code()),
                fallback: false,
            },
            (None, ErrorAction::Abort(code)) => Resolution {
                policy: ErrorPolicy::Abort,
                code: Some(code),
                fallback: false,
            },
            (None, _) => Resolution {
                policy: self.ambient().clone(),
                code: Some(action.code()),
                fallback: true,
            },
        }
    }
}

impl std::fmt::Display for PolicyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stack = self
            .stack
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(
            f,
            "PolicyContext(stack: [{}], bindings: {}, test_mode: {})",
            stack,
            self.bindings.len(),
            self.test_mode
        )
    }
}

/// Builder for `PolicyContext`.
#[derive(Debug, Clone, Default)]
pub struct PolicyContextBuilder {
    ambient: Vec<ErrorPolicy>,
    bindings: Vec<(ErrorAction, ErrorPolicy)>,
    test_mode: bool,
}

impl PolicyContextBuilder {
    /// Creates a new builder for a context with only the built-in entry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an ambient policy above the ones added so far.
    #[inline]
    pub fn ambient(mut self, policy: ErrorPolicy) -> Self {
        self.ambient.push(policy);
        self
    }

    /// Binds a policy to an explicit action.
    #[inline]
    pub fn bind(mut self, action: ErrorAction, policy: ErrorPolicy) -> Self {
        self.bindings.push((action, policy));
        self
    }

    /// Sets the test-mode flag.
    #[inline]
    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    /// Builds the `PolicyContext`.
    pub fn build(self) -> Result<PolicyContext, PolicyError> {
        let mut context = PolicyContext::new();
        for policy in self.ambient {
            context.push(policy)?;
        }
        for (action, policy) in self.bindings {
            context.bind(action, policy)?;
        }
        context.set_test_mode(self.test_mode);
        Ok(context)
    }

    /// Builds the context and installs it for the current thread, returning
    /// the context it replaces.
    pub fn install(self) -> Result<PolicyContext, PolicyError> {
        Ok(replace(self.build()?))
    }
}

thread_local! {
    static CONTEXT: RefCell<PolicyContext> = RefCell::new(PolicyContext::new());
}

/// Runs `f` with the current thread's context.
///
/// # Panics
///
/// Panics if called re-entrantly from inside another `with_context` closure.
/// This includes a checked operation that overflows inside `f`, because
/// [`dispatch`] reads the same context.
#[inline]
pub fn with_context<F, R>(f: F) -> R
where
    F: FnOnce(&mut PolicyContext) -> R,
{
    CONTEXT.with(|context| f(&mut context.borrow_mut()))
}

/// Replaces the current thread's context, returning the previous one.
#[inline]
pub fn replace(context: PolicyContext) -> PolicyContext {
    with_context(|current| std::mem::replace(current, context))
}

/// Pushes a new ambient policy for the current thread.
#[inline]
pub fn register(policy: ErrorPolicy) -> Result<usize, PolicyError> {
    with_context(|context| context.push(policy))
}

/// Pops the most recently registered ambient policy of the current thread.
#[inline]
pub fn unregister() -> Result<ErrorPolicy, PolicyError> {
    with_context(|context| context.pop())
}

/// Binds a policy to an explicit action for the current thread.
#[inline]
pub fn bind(action: ErrorAction, policy: ErrorPolicy) -> Result<Option<ErrorPolicy>, PolicyError> {
    with_context(|context| context.bind(action, policy))
}

/// Removes an explicit binding of the current thread.
#[inline]
pub fn unbind(action: ErrorAction) -> Option<ErrorPolicy> {
    with_context(|context| context.unbind(action))
}

/// The current thread's ambient policy.
#[inline]
pub fn ambient_policy() -> ErrorPolicy {
    with_context(|context| context.ambient().clone())
}

/// The current thread's stack depth, built-in entry included.
#[inline]
pub fn depth() -> usize {
    with_context(|context| context.depth())
}

#[inline]
pub fn set_test_mode(enabled: bool) {
    with_context(|context| context.set_test_mode(enabled))
}

#[inline]
pub fn is_test_mode() -> bool {
    with_context(|context| context.is_test_mode())
}

/// Runs `f` with `policy` registered as the ambient policy.
///
/// The policy is unregistered when `f` returns or unwinds. If `f` leaves the
/// stack at a different depth than it found it, the stack is left untouched
/// so that policies registered by the caller survive.
pub fn with_policy<F, R>(policy: ErrorPolicy, f: F) -> Result<R, PolicyError>
where
    F: FnOnce() -> R,
{
    struct Unregister {
        depth: usize,
    }

    impl Drop for Unregister {
        fn drop(&mut self) {
            let popped = CONTEXT.try_with(|context| {
                let mut context = context.borrow_mut();
                if context.depth() == self.depth {
                    context.pop().map(drop)
                } else {
                    tracing::warn!(
                        expected = self.depth,
                        depth = context.depth(),
                        "scoped policy no longer on top of the stack, leaving it unchanged"
                    );
                    Ok(())
                }
            });
            match popped {
                Ok(Ok(())) => {}
                Ok(Err(error)) => tracing::warn!(%error, "failed to unregister scoped policy"),
                Err(error) => {
                    tracing::warn!(%error, "policy context destroyed before scoped policy was unregistered")
                }
            }
        }
    }

    let depth = register(policy)?;
    let _guard = Unregister { depth };
    Ok(f())
}

/// Applies the current thread's policy to a reported overflow.
///
/// The context is released before the policy runs, so a `Callback` handler
/// may change the configuration. Returns only if the policy does not abort.
pub fn dispatch(event: &OverflowEvent) {
    let (resolution, test_mode) =
        with_context(|context| (context.resolve(event.action), context.is_test_mode()));

    if resolution.fallback {
        tracing::warn!(
            operation = event.operation,
            code = ?resolution.code,
            policy = %resolution.policy,
            "no policy bound for explicit action, using ambient policy"
        );
    }
    tracing::debug!(
        operation = event.operation,
        operand_type = event.operand_type,
        diagnostic = event.diagnostic.code(),
        policy = %resolution.policy,
        "overflow dispatched"
    );

    match resolution.policy {
        ErrorPolicy::Abort => {
            if test_mode {
                tracing::warn!(
                    operation = event.operation,
                    diagnostic = event.diagnostic.code(),
                    "abort suppressed in test mode"
                );
            } else {
                fatal::terminate(event.operation, event.diagnostic, resolution.code)
            }
        }
        ErrorPolicy::Count(counter) => counter.increment(),
        ErrorPolicy::SetFlags { flags, mask } => flags.set(mask),
        ErrorPolicy::Callback(handler) => handler.on_overflow(event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{
        handler::RecordingHandler,
        strategy::{FlagWord, OverflowCounter},
    };
    use checkwide_core::error::Diagnostic;
    use std::sync::Arc;

    fn event(action: Option<ErrorAction>) -> OverflowEvent {
        OverflowEvent {
            operation: "add",
            operand_type: "i64",
            diagnostic: Diagnostic::Overflow,
            action,
        }
    }

    #[test]
    fn test_new_context_has_builtin_abort() {
        let context = PolicyContext::new();
        assert_eq!(context.depth(), 1);
        assert_eq!(context.ambient(), &ErrorPolicy::Abort);
        assert!(!context.is_test_mode());
    }

    #[test]
    fn test_capacity_includes_builtin_entry() {
        let mut context = PolicyContext::new();
        for expected in 2..=POLICY_STACK_CAPACITY {
            assert_eq!(context.push(ErrorPolicy::Count(OverflowCounter::new())), Ok(expected));
        }
        assert_eq!(
            context.push(ErrorPolicy::Abort),
            Err(PolicyError::StackFull {
                capacity: POLICY_STACK_CAPACITY
            })
        );
        assert_eq!(context.depth(), POLICY_STACK_CAPACITY);
    }

    #[test]
    fn test_builtin_entry_cannot_be_popped() {
        let mut context = PolicyContext::new();
        assert_eq!(context.pop(), Err(PolicyError::BuiltinEntry));
        context.push(ErrorPolicy::Abort).unwrap();
        assert_eq!(context.pop(), Ok(ErrorPolicy::Abort));
        assert_eq!(context.pop(), Err(PolicyError::BuiltinEntry));
    }

    #[test]
    fn test_push_pop_is_lifo_at_every_depth() {
        let mut context = PolicyContext::new();
        while context.depth() < POLICY_STACK_CAPACITY {
            let before = context.ambient().clone();
            let counter = OverflowCounter::new();
            context.push(ErrorPolicy::Count(counter.clone())).unwrap();
            assert_eq!(context.ambient(), &ErrorPolicy::Count(counter.clone()));
            assert_eq!(context.pop(), Ok(ErrorPolicy::Count(counter)));
            assert_eq!(context.ambient(), &before);
            context.push(ErrorPolicy::Count(OverflowCounter::new())).unwrap();
        }
    }

    #[test]
    fn test_bind_rejects_kind_mismatch() {
        let mut context = PolicyContext::new();
        let r = context.bind(
            ErrorAction::Count(ErrorCode(1)),
            ErrorPolicy::SetFlags {
                flags: FlagWord::new(),
                mask: 1,
            },
        );
        assert_eq!(
            r,
            Err(PolicyError::KindMismatch {
                action: PolicyKind::Count,
                policy: PolicyKind::SetFlags
            })
        );
        assert_eq!(context.bindings_len(), 0);
    }

    #[test]
    fn test_resolution_rules() {
        let counter = OverflowCounter::new();
        let ambient = OverflowCounter::new();
        let context = PolicyContextBuilder::new()
            .ambient(ErrorPolicy::Count(ambient.clone()))
            .bind(ErrorAction::Count(ErrorCode(72)), ErrorPolicy::Count(counter.clone()))
            .build()
            .unwrap();

        let r = context.resolve(None);
        assert_eq!(r.policy, ErrorPolicy::Count(ambient.clone()));
        assert_eq!(r.code, None);

        let r = context.resolve(Some(ErrorAction::Count(ErrorCode(72))));
        assert_eq!(r.policy, ErrorPolicy::Count(counter));
        assert!(!r.fallback);

        // Same code, different kind: distinct action.
        let r = context.resolve(Some(ErrorAction::Abort(ErrorCode(72))));
        assert_eq!(r.policy, ErrorPolicy::Abort);
        assert_eq!(r.code, Some(ErrorCode(72)));

        let r = context.resolve(Some(ErrorAction::Count(ErrorCode(73))));
        assert_eq!(r.policy, ErrorPolicy::Count(ambient));
        assert!(r.fallback);
    }

    #[test]
    fn test_builder_reports_overfull_stack() {
        let mut builder = PolicyContextBuilder::new();
        for _ in 0..POLICY_STACK_CAPACITY {
            builder = builder.ambient(ErrorPolicy::Abort);
        }
        assert!(matches!(builder.build(), Err(PolicyError::StackFull { .. })));
    }

    #[test]
    fn test_thread_local_register_unregister() {
        let base = depth();
        let counter = OverflowCounter::new();
        assert_eq!(register(ErrorPolicy::Count(counter.clone())), Ok(base + 1));
        dispatch(&event(None));
        assert_eq!(counter.get(), 1);
        assert_eq!(unregister(), Ok(ErrorPolicy::Count(counter)));
        assert_eq!(depth(), base);
    }

    #[test]
    fn test_with_policy_unregisters_on_unwind() {
        let base = depth();
        let r = std::panic::catch_unwind(|| {
            with_policy(ErrorPolicy::Count(OverflowCounter::new()), || {
                assert_eq!(depth(), base + 1);
                panic!("boom");
            })
        });
        assert!(r.is_err());
        assert_eq!(depth(), base);
    }

    #[test]
    #[should_panic]
    fn test_overflow_inside_with_context_panics() {
        with_context(|_| crate::checked::add(i32::MAX, 1));
    }

    #[test]
    fn test_with_policy_keeps_caller_policy_when_scope_unregisters_itself() {
        let outer = ErrorPolicy::Count(OverflowCounter::new());
        let base = depth();
        register(outer.clone()).unwrap();
        let popped = with_policy(ErrorPolicy::Count(OverflowCounter::new()), unregister)
            .unwrap()
            .unwrap();
        assert_ne!(popped, outer);
        assert_eq!(depth(), base + 1);
        assert_eq!(ambient_policy(), outer);
        assert_eq!(unregister().unwrap(), outer);
        assert_eq!(depth(), base);
    }

    #[test]
    fn test_dispatch_set_flags_and_callback() {
        let flags = FlagWord::new();
        let recorder = Arc::new(RecordingHandler::new());
        with_policy(
            ErrorPolicy::SetFlags {
                flags: flags.clone(),
                mask: 0b10,
            },
            || dispatch(&event(None)),
        )
        .unwrap();
        assert_eq!(flags.get(), 0b10);

        bind(ErrorAction::Callback(ErrorCode(3)), ErrorPolicy::Callback(recorder.clone())).unwrap();
        dispatch(&event(Some(ErrorAction::Callback(ErrorCode(3)))));
        assert!(unbind(ErrorAction::Callback(ErrorCode(3))).is_some());
        assert_eq!(recorder.events(), vec![event(Some(ErrorAction::Callback(ErrorCode(3))))]);
    }

    #[test]
    fn test_callback_may_reconfigure_context() {
        let counter = OverflowCounter::new();
        let inner = counter.clone();
        let policy = ErrorPolicy::callback(move |_| {
            register(ErrorPolicy::Count(inner.clone())).unwrap();
        });
        with_policy(policy, || {
            dispatch(&event(None));
            // The callback pushed a counter above itself.
            dispatch(&event(None));
            assert_eq!(unregister(), Ok(ErrorPolicy::Count(counter.clone())));
        })
        .unwrap();
        assert_eq!(counter.get(), 1);
    }

    #[test]
    fn test_test_mode_suppresses_abort() {
        let previous = PolicyContextBuilder::new().test_mode(true).install().unwrap();
        assert!(is_test_mode());
        dispatch(&event(None));
        dispatch(&event(Some(ErrorAction::Abort(ErrorCode(99)))));
        set_test_mode(false);
        assert!(!is_test_mode());
        replace(previous);
    }

    #[test]
    fn test_contexts_are_per_thread() {
        register(ErrorPolicy::Count(OverflowCounter::new())).unwrap();
        let here = depth();
        let there = std::thread::spawn(depth).join().unwrap();
        assert_eq!(there, 1);
        assert!(here >= 2);
        unregister().unwrap();
    }

    #[test]
    fn test_display() {
        let context = PolicyContextBuilder::new()
            .ambient(ErrorPolicy::SetFlags {
                flags: FlagWord::new(),
                mask: 4,
            })
            .build()
            .unwrap();
        assert_eq!(
            context.to_string(),
            "PolicyContext(stack: [Abort, SetFlags(0x4)], bindings: 0, test_mode: false)"
        );
    }
}
