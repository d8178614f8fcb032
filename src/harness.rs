// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Minimal fixture harness.
//!
//! This module provides the machinery the stock test framework lacks for hosting a fixture
//! suite: lifecycle hooks, case bodies in three completion shapes, a collected-failure
//! runner, an assertion-count guard, resolution/rejection sugar for asynchronous tasks,
//! tolerance-based floating point comparison, and truthiness coercion.
//!
//! A [`Suite`] runs its cases in registration order on whatever runtime awaits it. Hooks
//! and case bodies suspend only at awaited tasks and completion handles, so scheduling is
//! single-threaded cooperative. Timeout and cancellation policy belong to the caller.

use crate::{Error, Result};

use anyhow::{anyhow, Context as _};
use beau_collector::BeauCollector as _;
use futures::future::{BoxFuture, FutureExt};
use regex::Regex;
use std::{
    fmt,
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use tokio::sync::oneshot;
use tracing::{info, instrument, warn};

/// Decimal digits of tolerance used when no precision is given.
///
/// Two floats are "close" at precision `p` when their absolute difference is strictly less
/// than `0.5 * 10^-p`.
pub const DEFAULT_PRECISION: u32 = 2;

/// Compare floats for closeness at [`DEFAULT_PRECISION`].
///
/// Use this instead of exact equality whenever the values went through floating point
/// arithmetic, e.g. `0.1 + 0.2` is close to `0.3` but not equal to it.
pub fn close_to(actual: f64, expected: f64) -> bool {
    close_to_digits(actual, expected, DEFAULT_PRECISION)
}

/// Compare floats for closeness at a caller-chosen number of decimal digits.
pub fn close_to_digits(actual: f64, expected: f64, precision: u32) -> bool {
    (actual - expected).abs() < 0.5 * 10f64.powi(-(precision as i32))
}

/// Truthiness coercion.
///
/// Gives values the loose boolean semantics the tour demonstrates: zero, the empty string,
/// and [`None`] are falsy, and an optional value is exactly as truthy as its contents.
/// Definedness needs no coercion here, since the type system already settles it.
pub trait Truthy {
    /// Whether this value coerces to true.
    fn is_truthy(&self) -> bool;

    /// Whether this value coerces to false.
    fn is_falsy(&self) -> bool {
        !self.is_truthy()
    }
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl Truthy for i64 {
    fn is_truthy(&self) -> bool {
        *self != 0
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

/// Await a task that is expected to resolve.
///
/// Unwraps the success value so the caller can assert on it directly.
///
/// # Errors
///
/// - Will fail if the task rejected instead of resolving.
pub async fn resolved<T, E>(task: impl Future<Output = Result<T, E>>) -> anyhow::Result<T>
where
    E: Into<anyhow::Error>,
{
    task.await.map_err(Into::into).context("task rejected, but resolution was expected")
}

/// Await a task that is expected to reject.
///
/// Unwraps the rejection payload so the caller can assert on it directly.
///
/// # Errors
///
/// - Return [`Error::UnexpectedResolution`] if the task resolved instead of rejecting.
pub async fn rejected<T, E>(task: impl Future<Output = Result<T, E>>) -> Result<E>
where
    T: fmt::Debug,
{
    match task.await {
        Ok(value) => Err(Error::UnexpectedResolution { value: format!("{value:?}") }),
        Err(error) => Ok(error),
    }
}

/// Await a task that is expected to reject with a payload matching `pattern`.
///
/// # Errors
///
/// - Return [`Error::UnexpectedResolution`] if the task resolved instead of rejecting.
/// - Return [`Error::RejectionMismatch`] if the payload does not match the pattern.
/// - Return [`Error::BadPattern`] if the pattern is not valid regex syntax.
pub async fn rejected_matching<T, E>(
    task: impl Future<Output = Result<T, E>>,
    pattern: &str,
) -> Result<E>
where
    T: fmt::Debug,
    E: fmt::Display,
{
    let regex = Regex::new(pattern)?;
    let error = rejected(task).await?;
    let text = error.to_string();
    if !regex.is_match(&text) {
        return Err(Error::RejectionMismatch { text, pattern: pattern.into() });
    }

    Ok(error)
}

/// Guard that a case ran exactly the number of assertions it promised.
///
/// Asynchronous cases can silently skip their assertions when a task is mishandled, e.g. a
/// continuation that never runs because the task it was chained onto was dropped. Arm a
/// guard with the promised count, call [`record`] after each assertion, and [`verify`]
/// once the case body finishes.
///
/// Clones share one counter, so the guard can move into continuations and tasks while the
/// case body keeps a handle for the final verification.
///
/// [`record`]: AssertionGuard::record
/// [`verify`]: AssertionGuard::verify
#[derive(Clone, Debug)]
pub struct AssertionGuard {
    expected: usize,
    seen: Arc<AtomicUsize>,
}

impl AssertionGuard {
    /// Arm a guard expecting exactly `expected` assertions to run.
    pub fn new(expected: usize) -> Self {
        Self { expected, seen: Arc::new(AtomicUsize::new(0)) }
    }

    /// Record that one assertion ran.
    pub fn record(&self) {
        self.seen.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of assertions recorded so far.
    pub fn seen(&self) -> usize {
        self.seen.load(Ordering::SeqCst)
    }

    /// Check the recorded count against the promised count.
    ///
    /// # Errors
    ///
    /// - Return [`Error::AssertionCount`] on any mismatch, in either direction.
    pub fn verify(&self) -> Result<()> {
        let seen = self.seen();
        if seen != self.expected {
            return Err(Error::AssertionCount { expected: self.expected, seen });
        }

        Ok(())
    }
}

/// Handle a callback-shaped case uses to signal that its deferred work finished.
///
/// Exactly one of [`done`] or [`fail`] must be called. Dropping the handle without
/// signaling marks the case as failed, since a case that never completes is not a passing
/// case.
///
/// [`done`]: Completion::done
/// [`fail`]: Completion::fail
#[derive(Debug)]
pub struct Completion {
    sender: oneshot::Sender<anyhow::Result<()>>,
}

impl Completion {
    /// Signal that the case finished successfully.
    pub fn done(self) {
        let _ = self.sender.send(Ok(()));
    }

    /// Signal that the case failed.
    pub fn fail(self, error: anyhow::Error) {
        let _ = self.sender.send(Err(error));
    }
}

type Hook = Box<dyn FnMut() + Send>;

enum CaseBody {
    Sync(Box<dyn FnOnce() -> anyhow::Result<()> + Send>),
    Callback(Box<dyn FnOnce(Completion) + Send>),
    Task(BoxFuture<'static, anyhow::Result<()>>),
}

struct Case {
    description: String,
    body: CaseBody,
}

/// Registration surface and runner for one fixture suite.
///
/// Cases and hooks are registered up front, then [`run`] drives everything to completion.
/// The registration methods mirror the three completion shapes a case body can take:
/// [`case`] for synchronous bodies, [`callback_case`] for bodies that signal through a
/// [`Completion`] handle, and [`task_case`] for bodies that are futures.
///
/// # Invariants
///
/// - Suite-level hooks run exactly once, before the first case and after the last.
/// - Per-case hooks run before every case, in registration order.
/// - A failed case never prevents later cases from running.
///
/// [`run`]: Suite::run
/// [`case`]: Suite::case
/// [`callback_case`]: Suite::callback_case
/// [`task_case`]: Suite::task_case
pub struct Suite {
    name: String,
    before_all: Vec<Hook>,
    before_each: Vec<Hook>,
    after_all: Vec<Hook>,
    cases: Vec<Case>,
}

impl Suite {
    /// Construct new empty suite.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before_all: Vec::new(),
            before_each: Vec::new(),
            after_all: Vec::new(),
            cases: Vec::new(),
        }
    }

    /// Register hook to run once before all cases.
    pub fn before_all(&mut self, hook: impl FnMut() + Send + 'static) -> &mut Self {
        self.before_all.push(Box::new(hook));
        self
    }

    /// Register hook to run before every case.
    ///
    /// Multiple registrations run in registration order before each case.
    pub fn before_each(&mut self, hook: impl FnMut() + Send + 'static) -> &mut Self {
        self.before_each.push(Box::new(hook));
        self
    }

    /// Register hook to run once after all cases.
    pub fn after_all(&mut self, hook: impl FnMut() + Send + 'static) -> &mut Self {
        self.after_all.push(Box::new(hook));
        self
    }

    /// Register a synchronous case.
    pub fn case(
        &mut self,
        description: impl Into<String>,
        body: impl FnOnce() -> anyhow::Result<()> + Send + 'static,
    ) -> &mut Self {
        self.cases
            .push(Case { description: description.into(), body: CaseBody::Sync(Box::new(body)) });
        self
    }

    /// Register a case that signals completion through a [`Completion`] handle.
    ///
    /// The runner waits for the handle before marking the case finished. A body that drops
    /// its handle without signaling fails the case.
    pub fn callback_case(
        &mut self,
        description: impl Into<String>,
        body: impl FnOnce(Completion) + Send + 'static,
    ) -> &mut Self {
        self.cases.push(Case {
            description: description.into(),
            body: CaseBody::Callback(Box::new(body)),
        });
        self
    }

    /// Register a case whose body is a future.
    ///
    /// The runner awaits the task before marking the case finished.
    pub fn task_case(
        &mut self,
        description: impl Into<String>,
        task: impl Future<Output = anyhow::Result<()>> + Send + 'static,
    ) -> &mut Self {
        self.cases
            .push(Case { description: description.into(), body: CaseBody::Task(task.boxed()) });
        self
    }

    /// Run all registered cases in registration order.
    ///
    /// Each case is driven to completion according to its shape before the next one
    /// starts. Failures are recorded in the returned report rather than cutting the run
    /// short, so one bad case never hides another.
    #[instrument(skip(self), fields(suite = %self.name), level = "debug")]
    pub async fn run(mut self) -> SuiteReport {
        for hook in &mut self.before_all {
            hook();
        }

        let mut outcomes = Vec::with_capacity(self.cases.len());
        for case in self.cases {
            for hook in &mut self.before_each {
                hook();
            }

            let result = match case.body {
                CaseBody::Sync(body) => body(),
                CaseBody::Callback(body) => {
                    let (sender, receiver) = oneshot::channel();
                    body(Completion { sender });
                    match receiver.await {
                        Ok(result) => result,
                        // INVARIANT: Dropped completion handle fails the case.
                        Err(_) => Err(Error::MissingCompletion.into()),
                    }
                }
                CaseBody::Task(task) => task.await,
            };

            match &result {
                Ok(()) => info!("PASS {}", case.description),
                Err(error) => warn!("FAIL {}: {error:?}", case.description),
            }
            outcomes.push(CaseOutcome { description: case.description, result });
        }

        for hook in &mut self.after_all {
            hook();
        }

        SuiteReport { outcomes }
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("before_all", &self.before_all.len())
            .field("before_each", &self.before_each.len())
            .field("after_all", &self.after_all.len())
            .field("cases", &self.cases.len())
            .finish()
    }
}

/// Outcome of a single case.
#[derive(Debug)]
pub struct CaseOutcome {
    /// Human-readable description the case was registered with.
    pub description: String,

    /// How the case finished.
    pub result: anyhow::Result<()>,
}

/// Per-case outcomes of a finished suite run.
#[derive(Debug)]
pub struct SuiteReport {
    outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    /// All case outcomes, in registration order.
    pub fn outcomes(&self) -> &[CaseOutcome] {
        &self.outcomes
    }

    /// Number of cases that ran.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of cases that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err()).count()
    }

    /// Number of cases that passed.
    pub fn passed(&self) -> usize {
        self.total() - self.failed()
    }

    /// Whether every case passed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Collapse the report into a single result.
    ///
    /// # Errors
    ///
    /// - Will fail if any case failed. All failures are collected and reported in
    ///   one-shot.
    pub fn into_result(self) -> anyhow::Result<()> {
        let _ = self
            .outcomes
            .into_iter()
            .map(|outcome| {
                let description = outcome.description;
                outcome.result.map_err(|error| anyhow!("case {description:?} failed: {error:?}"))
            })
            .bcollect::<Vec<_>>()?;

        Ok(())
    }
}
