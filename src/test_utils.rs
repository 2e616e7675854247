// SPDX-License-Identifier: MPL-2.0
//! Float assertions shared by unit tests.

pub use approx::assert_abs_diff_eq;

/// Tolerance for f64 values that should be equal up to rounding.
pub const F64_EPSILON: f64 = 1e-9;
