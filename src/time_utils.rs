// SPDX-License-Identifier: MIT

//! Shared time helpers.

use chrono::Utc;

/// Current time as epoch seconds.
pub fn now_epoch() -> i64 {
    Utc::now().timestamp()
}
