// SPDX-License-Identifier: MIT
// Copyright 2026 Vingo contributors

//! Shared helpers for date/time handling.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A deadline counts as passed once `now` reaches it.
pub fn has_passed(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    deadline <= now
}

/// Current Unix time in whole seconds.
pub fn unix_now() -> usize {
    Utc::now().timestamp().max(0) as usize
}
