use super::{PipelineError, VideoRecord};

/// Summary statistics over a non-empty set of records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSummary {
    mean_views: f64,
    mean_views_per_day: f64,
    max_days_old: u64,
    count: usize,
}

impl MetricsSummary {
    #[must_use]
    pub const fn mean_views(&self) -> f64 {
        self.mean_views
    }

    #[must_use]
    pub const fn mean_views_per_day(&self) -> f64 {
        self.mean_views_per_day
    }

    #[must_use]
    pub const fn max_days_old(&self) -> u64 {
        self.max_days_old
    }

    /// Number of records summarized.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }
}

/// Summarize a set of records.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] when `records` is empty.
#[expect(clippy::cast_precision_loss, reason = "means are reported, not used for further exact arithmetic")]
pub fn summarize(records: &[VideoRecord]) -> Result<MetricsSummary, PipelineError> {
    if records.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let count = records.len();
    let total_views: u128 = records.iter().map(|r| u128::from(r.views())).sum();
    let total_views_per_day: f64 = records.iter().map(VideoRecord::views_per_day).sum();
    let max_days_old = records.iter().map(VideoRecord::days_old).max().unwrap_or(1);

    Ok(MetricsSummary {
        mean_views: total_views as f64 / count as f64,
        mean_views_per_day: total_views_per_day / count as f64,
        max_days_old,
        count,
    })
}
