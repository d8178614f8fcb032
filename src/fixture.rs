// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Demonstration content.
//!
//! Fixed literals and one-shot tasks that the tour's test cases assert on. Every function
//! here is deliberately tiny; the point is the shape of its completion, not the work it
//! does. Tasks are one-shot with no retries and no caching, and none of them share state
//! with each other.

use crate::{Error, Result};

use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Delay before [`fetch_snack`] resolves.
pub const SNACK_DELAY: Duration = Duration::from_millis(200);

/// Produce the shopping list, in shopping order.
pub fn shopping_list() -> Vec<&'static str> {
    vec!["diapers", "kleenex", "trash bags", "paper towels", "beer"]
}

/// Attempt to compile Android code.
///
/// # Errors
///
/// - Always returns [`Error::WrongJdk`]. Nobody has the right JDK.
pub fn compile_android_code() -> Result<()> {
    Err(Error::WrongJdk)
}

/// Deliver data to a completion callback.
///
/// The callback is invoked exactly once, before this function returns. Callers that need
/// to signal a test harness should do so from inside the callback.
pub fn fetch_data(callback: impl FnOnce(&str)) {
    callback("peanut butter");
}

/// Asynchronously fetch a snack.
///
/// Resolves with `"peanut butter"` after [`SNACK_DELAY`] has elapsed. The delay is real
/// suspension on the runtime clock, so callers observe a genuine pending task rather than
/// an already-completed one.
pub async fn fetch_snack() -> Result<String> {
    sleep(SNACK_DELAY).await;
    debug!("snack fetched");
    Ok(String::from("peanut butter"))
}

/// Asynchronously fetch something that is not there.
///
/// # Errors
///
/// - Always rejects with [`Error::TaskRejected`] whose payload is `"error"`.
pub async fn fetch_failure() -> Result<String> {
    Err(Error::TaskRejected { reason: String::from("error") })
}
