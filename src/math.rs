// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Basic arithmetic.
//!
//! The sibling module every tour of a test framework starts with. Nothing special here.

/// Add two numbers.
///
/// Given two integers, return their arithmetic sum exactly.
pub fn sum(a: i64, b: i64) -> i64 {
    a + b
}
