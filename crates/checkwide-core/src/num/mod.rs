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

//! # Integer Vocabulary
//!
//! Traits and types describing the four integer kinds the kernel computes
//! with (`i32`, `i64`, `u32`, `u64`).
//!
//! ## Submodules
//!
//! - `int`: The `KernelInt` trait with width/sign constants and the
//!   sign/magnitude bridge every wide computation goes through.
//! - `ops`: By-value overflow-detecting (`OverflowingAddVal`, ...) and
//!   saturating (`SaturateVal`) traits.
//! - `outcome`: `Outcome<T>`, the fits-or-overflowed result of a checked
//!   computation, carrying the sign the exact result would have had.

pub mod int;
pub mod ops;
pub mod outcome;
