// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Internal library for the peanut tour.
//!
//! Peanut is a worked tour of assertion vocabulary and asynchronous test patterns in Rust:
//! equality, truthiness, numeric comparison, string pattern matching, containment, failure
//! assertions, callback-based completion, and three equivalent styles of asynchronous
//! observation. The interesting content lives in the test suites; the library provides the
//! small amount of machinery the stock test framework does not.
//!
//! ## The Concept of a Fixture Suite
//!
//! A __fixture suite__ is a group of independent demonstration cases registered against a
//! [`harness::Suite`] together with lifecycle hooks. Suite-level hooks run once before and
//! after all cases, per-case hooks run before every case in registration order, and each
//! case body takes one of three shapes: a plain synchronous closure, a closure handed a
//! [`harness::Completion`] handle to signal when deferred work finishes, or a future. The
//! runner waits on whichever shape it was given before marking the case passed or failed,
//! and every failure is collected so one bad case never hides another.
//!
//! Cases themselves carry no ordering guarantee relative to each other beyond registration
//! order, and no state crosses case boundaries. Each case constructs its literals, asserts
//! on them, and discards them.

#![allow(dead_code)]
#![warn(
    clippy::complexity,
    clippy::correctness,
    missing_debug_implementations,
    rust_2021_compatibility
)]
#![doc(issue_tracker_base_url = "https://github.com/awkless/peanut/issues")]

pub mod fixture;
pub mod harness;
pub mod math;

/// Result type alias of this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error types for various failure modes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Demonstration failure raised by [`fixture::compile_android_code`].
    #[error("you are using the wrong JDK")]
    WrongJdk,

    /// Asynchronous task rejected with a payload.
    #[error("{reason}")]
    TaskRejected {
        /// Payload the task rejected with.
        reason: String,
    },

    /// Task resolved even though the caller expected a rejection.
    #[error("task resolved with {value:?}, but a rejection was expected")]
    UnexpectedResolution {
        /// Rendered value the task resolved with.
        value: String,
    },

    /// Rejection payload did not match the expected pattern.
    #[error("rejection {text:?} does not match pattern {pattern:?}")]
    RejectionMismatch {
        /// Rendered rejection payload.
        text: String,

        /// Pattern the payload was matched against.
        pattern: String,
    },

    /// Fewer or more assertions ran in a case than the guard was armed with.
    #[error("expected exactly {expected} assertion(s) to run, but {seen} ran")]
    AssertionCount {
        /// Number of assertions the guard was armed with.
        expected: usize,

        /// Number of assertions that actually ran.
        seen: usize,
    },

    /// Callback case dropped its completion handle without ever signaling.
    #[error("case never signaled completion")]
    MissingCompletion,

    /// Given pattern was not valid regex syntax.
    #[error(transparent)]
    BadPattern(#[from] regex::Error),
}
