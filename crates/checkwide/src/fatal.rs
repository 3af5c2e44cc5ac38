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

//! Process termination for conditions no policy can recover from.
//!
//! The exit status is the numeric diagnostic code, so a supervising process
//! can tell a scaling overflow (72) from a division by zero (70).

use crate::policy::action::ErrorCode;
use checkwide_core::error::{ArithError, Diagnostic};

/// Logs the failing operation and terminates the process.
#[cold]
pub fn terminate(operation: &str, diagnostic: Diagnostic, code: Option<ErrorCode>) -> ! {
    match code {
        Some(code) => {
            tracing::error!(
                operation,
                diagnostic = diagnostic.code(),
                code = code.get(),
                "{}",
                diagnostic.message()
            );
            eprintln!("checkwide: {}: {} (error code {})", operation, diagnostic, code.get());
        }
        None => {
            tracing::error!(operation, diagnostic = diagnostic.code(), "{}", diagnostic.message());
            eprintln!("checkwide: {}: {}", operation, diagnostic);
        }
    }
    std::process::exit(diagnostic.code() as i32)
}

/// Terminates the process for an error that is never policy-routed.
#[cold]
pub fn unconditional(operation: &str, error: &ArithError) -> ! {
    tracing::error!(operation, %error, "unconditional arithmetic failure");
    terminate(operation, error.diagnostic(), None)
}

/// Unwraps a core result, terminating the process on error.
#[inline]
pub(crate) fn require<V>(operation: &str, result: Result<V, ArithError>) -> V {
    match result {
        Ok(value) => value,
        Err(error) => unconditional(operation, &error),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        checked,
        checker::Checker,
        policy::action::{ErrorAction, ErrorCode},
        unchecked,
    };
    use std::process::{Command, Output};

    const FATAL_CASE: &str = "CHECKWIDE_FATAL_CASE";

    /// Runs `test_terminating_case` in a child process with `case` selected.
    fn run_case(case: &str) -> Output {
        let exe = std::env::current_exe().expect("test executable path");
        Command::new(exe)
            .args([
                "--exact",
                "fatal::tests::test_terminating_case",
                "--nocapture",
                "--test-threads=1",
            ])
            .env(FATAL_CASE, case)
            .output()
            .expect("failed to spawn test executable")
    }

    fn assert_terminated(output: &Output, code: i32, message: &str) {
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert_eq!(output.status.code(), Some(code), "stderr: {}", stderr);
        assert!(stderr.contains(message), "stderr: {}", stderr);
    }

    #[test]
    fn test_terminating_case() {
        // Does nothing unless spawned by one of the tests below.
        let Ok(case) = std::env::var(FATAL_CASE) else {
            return;
        };
        match case.as_str() {
            "ambient_abort" => {
                checked::add(i32::MAX, 1);
            }
            "explicit_abort" => {
                Checker::explicit(ErrorAction::Abort(ErrorCode(9))).mul(i64::MAX, 2);
            }
            "div_rem_zero" => {
                checked::div_rem(1i64, 0);
            }
            "unchecked_div_rem_zero" => {
                unchecked::div_rem(1u32, 0);
            }
            "shl_range" => {
                checked::shl(1u32, 33);
            }
            "shr_range" => {
                unchecked::shr(-1i64, 65);
            }
            "scale_range" => {
                checked::scale(1i32, 64);
            }
            other => panic!("unknown case {}", other),
        }
    }

    #[test]
    fn test_ambient_abort_exits_with_overflow_code() {
        let output = run_case("ambient_abort");
        assert_terminated(&output, 74, "checkwide: add: [74] arithmetic overflow");
    }

    #[test]
    fn test_explicit_abort_reports_error_code() {
        let output = run_case("explicit_abort");
        assert_terminated(&output, 74, "checkwide: mul: [74] arithmetic overflow (error code 9)");
    }

    #[test]
    fn test_div_rem_by_zero_is_fatal() {
        assert_terminated(&run_case("div_rem_zero"), 70, "checkwide: div_rem: [70] divide by zero");
        assert_terminated(
            &run_case("unchecked_div_rem_zero"),
            70,
            "checkwide: div_rem: [70] divide by zero",
        );
    }

    #[test]
    fn test_shift_past_width_is_fatal() {
        assert_terminated(
            &run_case("shl_range"),
            73,
            "checkwide: shl: [73] shift amount out of range",
        );
        assert_terminated(
            &run_case("shr_range"),
            73,
            "checkwide: shr: [73] shift amount out of range",
        );
        assert_terminated(
            &run_case("scale_range"),
            73,
            "checkwide: scale: [73] shift amount out of range",
        );
    }
}
