//! The video metrics pipeline
//!
//! Turns raw search hits and statistics into canonical [`VideoRecord`]s with derived
//! engagement metrics, plus a summary over the whole set.
//!
//! # Implementation Model
//!
//! The pipeline runs in three stages:
//!
//! 1. [`normalize`] joins each hit with its statistics by identifier, keeping search order.
//!    Hits that cannot be joined are reported as [`Exclusion`]s rather than dropped silently.
//! 2. [`VideoRecord::from_joined`] derives `days_old` and `views_per_day` against an explicit
//!    evaluation instant.
//! 3. [`summarize`] computes the means and maximum age, but only for non-empty sets.
//!
//! [`run_pipeline`] strings the stages together. It takes only raw data and the evaluation
//! instant; it performs no I/O and never reads the system clock.

mod aggregate;
mod derive;
mod error;
mod normalize;
mod video_record;

pub use aggregate::{MetricsSummary, summarize};
pub use derive::{days_old, views_per_day};
pub use error::PipelineError;
pub use normalize::{Exclusion, ExclusionReason, JoinedVideo, Normalized, normalize, parse_published};
pub use video_record::VideoRecord;

use crate::facts::{RawVideoSearchHit, StatisticsById};
use chrono::{DateTime, Utc};

const LOG_TARGET: &str = "  pipeline";

/// The summary over a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Summary {
    Metrics(MetricsSummary),

    /// No records survived normalization.
    NoData,
}

impl Summary {
    #[must_use]
    pub const fn metrics(&self) -> Option<&MetricsSummary> {
        match self {
            Self::Metrics(m) => Some(m),
            Self::NoData => None,
        }
    }
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Canonical records, in search order.
    pub records: Vec<VideoRecord>,
    pub summary: Summary,

    /// Hits left out of `records`, in search order.
    pub exclusions: Vec<Exclusion>,
}

/// Normalize, derive, and summarize a batch of raw video data as of `now`.
#[must_use]
pub fn run_pipeline(hits: &[RawVideoSearchHit], stats: &StatisticsById, now: DateTime<Utc>) -> PipelineOutput {
    let Normalized { joined, exclusions } = normalize(hits, stats);

    let records: Vec<_> = joined.into_iter().map(|j| VideoRecord::from_joined(j, now)).collect();

    let summary = if records.is_empty() {
        Summary::NoData
    } else {
        summarize(&records).map_or(Summary::NoData, Summary::Metrics)
    };

    log::debug!(
        target: LOG_TARGET,
        "Processed {} hit(s): {} record(s), {} exclusion(s)",
        hits.len(),
        records.len(),
        exclusions.len()
    );

    PipelineOutput {
        records,
        summary,
        exclusions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{RawVideoStatistics, index_statistics};
    use chrono::TimeZone;

    fn hit(id: &str, published_at: &str) -> RawVideoSearchHit {
        RawVideoSearchHit {
            id: id.to_string(),
            title: format!("Video {id}"),
            channel: "Channel".to_string(),
            published_at: published_at.to_string(),
            thumbnail_url: None,
        }
    }

    fn views(id: &str, views: u64) -> RawVideoStatistics {
        RawVideoStatistics {
            id: id.to_string(),
            view_count: Some(views),
            ..RawVideoStatistics::default()
        }
    }

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_ten_day_old_video() {
        let output = run_pipeline(
            &[hit("V1", "2024-01-01T00:00:00Z")],
            &index_statistics(vec![views("V1", 1000)]),
            instant("2024-01-11T00:00:00Z"),
        );

        assert_eq!(output.records.len(), 1);
        let record = &output.records[0];
        assert_eq!(record.days_old(), 10);
        assert!((record.views_per_day() - 100.0).abs() < f64::EPSILON);

        let summary = output.summary.metrics().unwrap();
        assert!((summary.mean_views() - 1000.0).abs() < f64::EPSILON);
        assert_eq!(summary.max_days_old(), 10);
    }

    #[test]
    fn test_same_day_video_clamps_to_one_day() {
        let output = run_pipeline(
            &[hit("V2", "2024-06-01T00:00:00Z")],
            &index_statistics(vec![views("V2", 50)]),
            instant("2024-06-01T00:00:00Z"),
        );

        let record = &output.records[0];
        assert_eq!(record.days_old(), 1);
        assert!((record.views_per_day() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_future_publication_clamps_to_one_day() {
        let output = run_pipeline(
            &[hit("V3", "2024-06-05T00:00:00Z")],
            &index_statistics(vec![views("V3", 80)]),
            instant("2024-06-01T00:00:00Z"),
        );

        assert_eq!(output.records[0].days_old(), 1);
        assert!((output.records[0].views_per_day() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unmatched_hit_is_reported_not_fatal() {
        let output = run_pipeline(
            &[
                hit("a", "2024-01-01T00:00:00Z"),
                hit("b", "2024-01-01T00:00:00Z"),
                hit("c", "2024-01-01T00:00:00Z"),
            ],
            &index_statistics(vec![views("a", 10), views("c", 30)]),
            instant("2024-01-11T00:00:00Z"),
        );

        assert_eq!(output.records.len(), 2);
        assert_eq!(output.exclusions.len(), 1);
        assert_eq!(output.exclusions[0].id, "b");
        assert_eq!(output.exclusions[0].reason, ExclusionReason::Unmatched);

        let summary = output.summary.metrics().unwrap();
        assert!((summary.mean_views() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_records_follow_search_order() {
        let hits = [
            hit("d", "2024-01-01T00:00:00Z"),
            hit("b", "2024-01-01T00:00:00Z"),
            hit("x", "2024-01-01T00:00:00Z"),
            hit("a", "2024-01-01T00:00:00Z"),
        ];
        let stats = index_statistics(vec![views("a", 1), views("b", 2), views("d", 4)]);

        let output = run_pipeline(&hits, &stats, instant("2024-01-11T00:00:00Z"));
        let ids: Vec<_> = output.records.iter().map(VideoRecord::id).collect();
        assert_eq!(ids, ["d", "b", "a"]);
    }

    #[test]
    fn test_empty_input_yields_no_data() {
        let output = run_pipeline(&[], &StatisticsById::new(), instant("2024-01-11T00:00:00Z"));
        assert!(output.records.is_empty());
        assert!(output.exclusions.is_empty());
        assert_eq!(output.summary, Summary::NoData);
    }

    #[test]
    fn test_all_excluded_yields_no_data() {
        let output = run_pipeline(
            &[hit("a", "garbage"), hit("b", "2024-01-01T00:00:00Z")],
            &index_statistics(vec![views("a", 1)]),
            instant("2024-01-11T00:00:00Z"),
        );

        assert!(output.records.is_empty());
        assert_eq!(output.exclusions.len(), 2);
        assert!(output.summary.metrics().is_none());
    }

    #[test]
    fn test_same_inputs_same_outputs() {
        let hits = [hit("a", "2024-01-01T00:00:00Z"), hit("b", "2024-01-05T12:00:00+02:00")];
        let stats = index_statistics(vec![views("a", 100), views("b", 7)]);
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let first = run_pipeline(&hits, &stats, now);
        let second = run_pipeline(&hits, &stats, now);
        assert_eq!(first.records, second.records);
        assert_eq!(first.summary, second.summary);
    }
}
