//! Expiry classification. Status is always computed from the stored
//! timestamp against the clock at read time; it is never persisted, so there
//! is exactly one source of truth and nothing to go stale.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Valid,
    Expiring,
    Expired,
}

impl ExpiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Expiring => "expiring",
            Self::Expired => "expired",
        }
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Day-granular classification for standard labels.
///
/// A label expiring today is not yet expired (good through end of day) but
/// counts as expiring. The window is inclusive: `window_days` out is still
/// expiring, one day further is valid.
pub fn classify_date(expiry: NaiveDate, today: NaiveDate, window_days: i64) -> ExpiryStatus {
    let days_until = (expiry - today).num_days();
    if days_until < 0 {
        ExpiryStatus::Expired
    } else if days_until <= window_days {
        ExpiryStatus::Expiring
    } else {
        ExpiryStatus::Valid
    }
}

/// Hour-granular classification for sanitary labels.
///
/// At or past the expiry instant the label is expired. Within `window_hours`
/// of it (inclusive) it is expiring.
pub fn classify_datetime(
    expiry: DateTime<Utc>,
    now: DateTime<Utc>,
    window_hours: i64,
) -> ExpiryStatus {
    let remaining = expiry - now;
    if remaining <= Duration::zero() {
        ExpiryStatus::Expired
    } else if remaining <= Duration::hours(window_hours) {
        ExpiryStatus::Expiring
    } else {
        ExpiryStatus::Valid
    }
}
