use chrono::{DateTime, Utc};

/// Whole days elapsed between publication and `now`, never less than one.
///
/// Videos published less than a day ago, or apparently in the future, count as one day old.
#[must_use]
pub fn days_old(published_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let days = now.signed_duration_since(published_at).num_days();
    u64::try_from(days).unwrap_or(0).max(1)
}

/// Average views per day since publication.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "counts are far below the point where f64 loses integer precision")]
pub fn views_per_day(views: u64, days_old: u64) -> f64 {
    views as f64 / days_old.max(1) as f64
}
