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

//! # Checkwide
//!
//! Checked 32- and 64-bit integer arithmetic whose overflows are routed
//! through a configurable stack of policies instead of a hard-coded panic.
//!
//! Every operation exists in three call shapes:
//!
//! - `unchecked::*`: the result modulo `2^BITS`, for call sites that have
//!   already proven the exact result fits.
//! - `checked::*`: exact detection with a wider intermediate; on overflow the
//!   current thread's ambient policy runs and the saturated value is returned.
//! - `Checker::explicit(action)`: as `checked::*`, but the overflow is reported
//!   under an explicit `ErrorAction` and handled by the policy bound to it.
//!
//! ## Modules
//!
//! - `policy`: Error codes and actions, overflow policies (`Abort`, `Count`,
//!   `SetFlags`, `Callback`), handler strategies and the per-thread policy
//!   context with its bounded LIFO stack.
//! - `checker`: The `Checker` type carrying every checked operation.
//! - `checked`: Free functions for the ambient call shape.
//! - `unchecked`: Free functions for the unchecked call shape.
//! - `fatal`: Process termination for conditions no policy recovers from.
//!
//! ## Example
//!
//! ```rust
//! use checkwide::{
//!     checked,
//!     policy::{context, strategy::{ErrorPolicy, OverflowCounter}},
//! };
//!
//! let overflows = OverflowCounter::new();
//! let acc = context::with_policy(ErrorPolicy::Count(overflows.clone()), || {
//!     let acc = checked::mul_shift_add(0x3_0000_0001i64, 0xFFFF, 0x30001, 0);
//!     checked::mul_shift_add(acc, 0x7FFF_FFFE, 0x7FFF_FFFD, 4)
//! })
//! .unwrap();
//!
//! assert_eq!(acc, i64::MAX);
//! assert_eq!(overflows.get(), 2);
//! ```

pub mod checked;
pub mod checker;
pub mod fatal;
pub mod policy;
pub mod unchecked;

pub use checkwide_core::{error::Diagnostic, num::int::KernelInt};
