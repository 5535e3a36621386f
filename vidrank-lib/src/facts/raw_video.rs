use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single search result as returned by the search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVideoSearchHit {
    pub id: String,
    pub title: String,
    pub channel: String,

    /// ISO-8601 timestamp, still unparsed.
    pub published_at: String,

    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Counters reported by the statistics collaborator for one video.
///
/// A `None` count means the platform did not report it, which is not the same as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVideoStatistics {
    pub id: String,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub comment_count: Option<u64>,
}

/// Statistics keyed by video identifier.
pub type StatisticsById = HashMap<String, RawVideoStatistics>;

/// Build a [`StatisticsById`] index, keeping the last entry for a repeated identifier.
pub fn index_statistics(stats: impl IntoIterator<Item = RawVideoStatistics>) -> StatisticsById {
    stats.into_iter().map(|s| (s.id.clone(), s)).collect()
}
