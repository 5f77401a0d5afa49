//! Time Windows
//!
//! Checked arithmetic for the configured scoring and retention windows.
//! Window lengths come from the environment, so out-of-range values are
//! reported as errors instead of overflowing.

use chrono::{DateTime, Duration, Utc};

use crate::error::{CompanionError, Result};

/// Start of a window of `days` days ending at `now`.
///
/// # Errors
/// `InvalidRequest` if `days` is negative or the start is not representable.
pub fn days_before(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    window_start(now, days, Duration::try_days(days), "days")
}

/// Start of a window of `hours` hours ending at `now`.
///
/// # Errors
/// `InvalidRequest` if `hours` is negative or the start is not representable.
pub fn hours_before(now: DateTime<Utc>, hours: i64) -> Result<DateTime<Utc>> {
    window_start(now, hours, Duration::try_hours(hours), "hours")
}

fn window_start(
    now: DateTime<Utc>,
    length: i64,
    span: Option<Duration>,
    unit: &str,
) -> Result<DateTime<Utc>> {
    if length < 0 {
        return Err(CompanionError::InvalidRequest(format!(
            "Window length must not be negative, got {} {}",
            length, unit
        )));
    }

    span.and_then(|span| now.checked_sub_signed(span))
        .ok_or_else(|| {
            CompanionError::InvalidRequest(format!(
                "Window of {} {} is out of range",
                length, unit
            ))
        })
}
