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

use crate::policy::action::ErrorAction;
use checkwide_core::error::Diagnostic;
use std::sync::Mutex;

/// A single reported overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverflowEvent {
    /// The name of the checked operation, e.g. `"mul_scale"`.
    pub operation: &'static str,
    /// The name of the operand type, e.g. `"i64"`.
    pub operand_type: &'static str,
    /// The diagnostic the condition is reported under.
    pub diagnostic: Diagnostic,
    /// The explicit action of the call site, if any.
    pub action: Option<ErrorAction>,
}

impl std::fmt::Display for OverflowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}<{}>: {}",
            self.operation, self.operand_type, self.diagnostic
        )?;
        if let Some(action) = self.action {
            write!(f, " ({})", action)?;
        }
        Ok(())
    }
}

/// Strategy invoked by a `Callback` policy.
///
/// The handler runs after the context borrow has been released, so it may
/// itself register or unregister policies.
pub trait OverflowHandler: Send + Sync {
    fn name(&self) -> &str;
    fn on_overflow(&self, event: &OverflowEvent);
}

impl std::fmt::Debug for dyn OverflowHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OverflowHandler({})", self.name())
    }
}

impl std::fmt::Display for dyn OverflowHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OverflowHandler({})", self.name())
    }
}

/// Adapts a closure to [`OverflowHandler`].
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&OverflowEvent) + Send + Sync,
{
    #[inline]
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> OverflowHandler for FnHandler<F>
where
    F: Fn(&OverflowEvent) + Send + Sync,
{
    fn name(&self) -> &str {
        "FnHandler"
    }

    #[inline]
    fn on_overflow(&self, event: &OverflowEvent) {
        (self.f)(event)
    }
}

/// A handler that records every event it receives.
///
/// # Examples
///
/// ```rust
/// # use checkwide::{checker::Checker, policy::{context, handler::RecordingHandler, strategy::ErrorPolicy}};
/// # use std::sync::Arc;
/// let recorder = Arc::new(RecordingHandler::new());
/// context::with_policy(ErrorPolicy::Callback(recorder.clone()), || {
///     assert_eq!(Checker::AMBIENT.add(i32::MAX, 1), i32::MAX);
/// })
/// .unwrap();
/// assert_eq!(recorder.len(), 1);
/// assert_eq!(recorder.events()[0].operation, "add");
/// ```
#[derive(Debug, Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<OverflowEvent>>,
}

impl RecordingHandler {
    /// Creates a new, empty `RecordingHandler`.
    #[inline]
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// A copy of the events recorded so far.
    pub fn events(&self) -> Vec<OverflowEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The number of events recorded so far.
    pub fn len(&self) -> usize {
        match self.events.lock() {
            Ok(events) => events.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Returns `true` if no event has been recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets all recorded events.
    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl OverflowHandler for RecordingHandler {
    fn name(&self) -> &str {
        "RecordingHandler"
    }

    fn on_overflow(&self, event: &OverflowEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(*event),
            Err(poisoned) => poisoned.into_inner().push(*event),
        }
    }
}
