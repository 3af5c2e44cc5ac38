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

//! # Checkwide Core
//!
//! Pure arithmetic foundations for the checkwide kernel. Nothing in this crate
//! decides what happens when a result does not fit; every computation reports
//! the situation to its caller as a value, and the `checkwide` crate routes it
//! through the configured overflow policy.
//!
//! ## Modules
//!
//! - `num`: The `KernelInt` vocabulary implemented for `i32`, `i64`, `u32` and
//!   `u64`, the `Outcome<T>` result of a width-checked computation, and by-value
//!   traits for overflow-detecting and saturating arithmetic.
//! - `wide`: Word extraction and concatenation, fit tests, sign/magnitude
//!   helpers and the `u128` <-> `[u32]` conversions used by the division engine.
//! - `division`: Base-2^32 schoolbook long division with optional
//!   round-to-nearest, used whenever an intermediate exceeds native width.
//! - `scale`: Fixed-point multiply, divide, round and shift operations that
//!   materialize the product at double width before any rounding.
//! - `convert`: Saturating conversions between kernel integer types and from
//!   `f64` with round-half-away-from-zero.
//! - `error`: Stable diagnostic codes and the error type of the conditions that
//!   are never policy-routed.
//!
//! ## Example
//!
//! ```rust
//! # use checkwide_core::{num::outcome::Outcome, scale::mul_scale};
//! // 0xFFFF0 * 0x30001, shifted right by 4 with rounding.
//! let r = mul_scale(0xFFFF0u64, 0x30001u64, -4).unwrap();
//! assert_eq!(r, Outcome::Fits(0x2_FFFD_FFFF));
//! ```

pub mod convert;
pub mod division;
pub mod error;
pub mod num;
pub mod scale;
pub mod wide;
