// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Three equivalent ways to observe an asynchronous task: a registered continuation, the
//! resolution/rejection sugar, and plain awaiting with structured error propagation. Every
//! case arms an [`AssertionGuard`] so a mishandled task cannot silently skip its assertion.

use peanut::{
    fixture::{fetch_data, fetch_failure, fetch_snack},
    harness::{rejected, rejected_matching, resolved, AssertionGuard, Suite},
    Error,
};

use anyhow::bail;
use futures::TryFutureExt;
use pretty_assertions::assert_eq as pretty_assert_eq;
use regex::Regex;

#[tokio::test]
async fn the_data_is_peanut_butter_by_callback() -> anyhow::Result<()> {
    crate::init_tracing();

    let mut suite = Suite::new("callbacks");
    suite.callback_case("the data is peanut butter", |completion| {
        fetch_data(move |data| {
            pretty_assert_eq!(data, "peanut butter");
            completion.done();
        });
    });

    let report = suite.run().await;
    assert!(report.is_success());
    report.into_result()
}

#[tokio::test(start_paused = true)]
async fn the_data_is_peanut_butter_by_continuation() -> anyhow::Result<()> {
    let guard = AssertionGuard::new(1);
    let continuation = guard.clone();
    fetch_snack()
        .map_ok(move |data| {
            pretty_assert_eq!(data, "peanut butter");
            continuation.record();
        })
        .await?;

    guard.verify()?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn the_data_is_peanut_butter_by_sugar() -> anyhow::Result<()> {
    let guard = AssertionGuard::new(1);
    let data = resolved(fetch_snack()).await?;
    pretty_assert_eq!(data, "peanut butter");
    guard.record();

    guard.verify()?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn the_data_is_peanut_butter_by_await() -> anyhow::Result<()> {
    let guard = AssertionGuard::new(1);
    let data = fetch_snack().await?;
    pretty_assert_eq!(data, "peanut butter");
    guard.record();

    guard.verify()?;
    Ok(())
}

#[tokio::test]
async fn the_fetch_fails_with_an_error_by_sugar() -> anyhow::Result<()> {
    let guard = AssertionGuard::new(1);
    let error = rejected_matching(fetch_failure(), "error").await?;
    pretty_assert_eq!(error.to_string(), "error");
    guard.record();

    guard.verify()?;
    Ok(())
}

#[tokio::test]
async fn the_fetch_fails_with_an_error_by_catch() -> anyhow::Result<()> {
    let guard = AssertionGuard::new(1);
    match fetch_failure().await {
        Ok(data) => bail!("resolved with {data:?}, but a rejection was expected"),
        Err(error) => {
            assert!(Regex::new("error")?.is_match(&error.to_string()));
            guard.record();
        }
    }

    guard.verify()?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn rejection_sugar_flags_tasks_that_resolve() {
    let result = rejected(fetch_snack()).await;
    assert!(matches!(result, Err(Error::UnexpectedResolution { .. })));
}

#[tokio::test]
async fn guard_catches_silently_skipped_assertions() {
    let guard = AssertionGuard::new(1);
    let continuation = guard.clone();

    // Continuation is chained but the task is never polled, so its assertion never runs.
    let task = fetch_snack().map_ok(move |data| {
        pretty_assert_eq!(data, "peanut butter");
        continuation.record();
    });
    drop(task);

    assert!(matches!(guard.verify(), Err(Error::AssertionCount { expected: 1, seen: 0 })));
}
