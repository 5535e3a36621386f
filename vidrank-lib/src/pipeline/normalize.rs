use super::PipelineError;
use crate::facts::{RawVideoSearchHit, StatisticsById};
use chrono::{DateTime, Utc};
use core::fmt::{Display, Formatter};
use std::collections::HashSet;

const LOG_TARGET: &str = " normalize";

/// A search hit joined with its statistics, with unreported counters resolved to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedVideo {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub published_at: DateTime<Utc>,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub thumbnail_url: Option<String>,
}

/// Why a search hit did not make it into the canonical set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// No statistics entry was returned for the identifier.
    Unmatched,

    /// The published timestamp could not be parsed.
    MalformedTimestamp(String),

    /// The identifier already appeared earlier in the search results.
    DuplicateIdentifier,
}

impl Display for ExclusionReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unmatched => write!(f, "no statistics reported"),
            Self::MalformedTimestamp(timestamp) => write!(f, "malformed published timestamp '{timestamp}'"),
            Self::DuplicateIdentifier => write!(f, "duplicate search result"),
        }
    }
}

/// A search hit left out of the canonical set, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    pub id: String,
    pub reason: ExclusionReason,
}

impl Exclusion {
    /// The pipeline error behind this exclusion, for reasons that are errors.
    #[must_use]
    pub fn error(&self) -> Option<PipelineError> {
        match &self.reason {
            ExclusionReason::MalformedTimestamp(timestamp) => Some(PipelineError::MalformedTimestamp {
                id: self.id.clone(),
                timestamp: timestamp.clone(),
            }),
            ExclusionReason::Unmatched | ExclusionReason::DuplicateIdentifier => None,
        }
    }
}

impl Display for Exclusion {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.id, self.reason)
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    /// Joined records, in search order.
    pub joined: Vec<JoinedVideo>,
    pub exclusions: Vec<Exclusion>,
}

/// Join search hits with their statistics, preserving search order.
///
/// Hits without statistics, with an unparsable timestamp, or with an identifier seen
/// earlier are excluded and reported, never fatal.
pub fn normalize(hits: &[RawVideoSearchHit], stats: &StatisticsById) -> Normalized {
    let mut seen = HashSet::with_capacity(hits.len());
    let mut result = Normalized {
        joined: Vec::with_capacity(hits.len()),
        exclusions: Vec::new(),
    };

    for hit in hits {
        let reason = if !seen.insert(hit.id.as_str()) {
            ExclusionReason::DuplicateIdentifier
        } else if let Some(stat) = stats.get(&hit.id) {
            match parse_published(&hit.id, &hit.published_at) {
                Ok(published_at) => {
                    result.joined.push(JoinedVideo {
                        id: hit.id.clone(),
                        title: hit.title.clone(),
                        channel: hit.channel.clone(),
                        published_at,
                        views: stat.view_count.unwrap_or(0),
                        likes: stat.like_count.unwrap_or(0),
                        comments: stat.comment_count.unwrap_or(0),
                        thumbnail_url: hit.thumbnail_url.clone(),
                    });
                    continue;
                }
                Err(e) => {
                    log::debug!(target: LOG_TARGET, "{e}");
                    ExclusionReason::MalformedTimestamp(hit.published_at.clone())
                }
            }
        } else {
            ExclusionReason::Unmatched
        };

        log::debug!(target: LOG_TARGET, "Excluding video '{}': {reason}", hit.id);
        result.exclusions.push(Exclusion {
            id: hit.id.clone(),
            reason,
        });
    }

    result
}

/// Parse an ISO-8601 timestamp, normalizing any offset to UTC.
pub fn parse_published(id: &str, timestamp: &str) -> Result<DateTime<Utc>, PipelineError> {
    DateTime::parse_from_rfc3339(timestamp.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| PipelineError::MalformedTimestamp {
            id: id.to_string(),
            timestamp: timestamp.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::{RawVideoStatistics, index_statistics};
    use chrono::TimeZone;

    fn hit(id: &str, published_at: &str) -> RawVideoSearchHit {
        RawVideoSearchHit {
            id: id.to_string(),
            title: format!("title {id}"),
            channel: "channel".to_string(),
            published_at: published_at.to_string(),
            thumbnail_url: None,
        }
    }

    fn stats(id: &str, views: Option<u64>, likes: Option<u64>, comments: Option<u64>) -> RawVideoStatistics {
        RawVideoStatistics {
            id: id.to_string(),
            view_count: views,
            like_count: likes,
            comment_count: comments,
        }
    }

    #[test]
    fn test_join_defaults_unreported_counts_to_zero() {
        let hits = vec![hit("a", "2024-01-01T00:00:00Z")];
        let index = index_statistics(vec![stats("a", Some(5), None, None)]);

        let result = normalize(&hits, &index);
        assert!(result.exclusions.is_empty());
        assert_eq!(result.joined.len(), 1);

        let joined = &result.joined[0];
        assert_eq!(joined.views, 5);
        assert_eq!(joined.likes, 0);
        assert_eq!(joined.comments, 0);
        assert_eq!(joined.published_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_unmatched_hit_is_excluded() {
        let hits = vec![
            hit("a", "2024-01-01T00:00:00Z"),
            hit("b", "2024-01-01T00:00:00Z"),
            hit("c", "2024-01-01T00:00:00Z"),
        ];
        let index = index_statistics(vec![stats("a", Some(1), None, None), stats("c", Some(3), None, None)]);

        let result = normalize(&hits, &index);
        assert_eq!(result.joined.len(), hits.len() - 1);
        assert_eq!(
            result.exclusions,
            vec![Exclusion {
                id: "b".into(),
                reason: ExclusionReason::Unmatched
            }]
        );
    }

    #[test]
    fn test_malformed_timestamp_excludes_only_that_record() {
        let hits = vec![hit("a", "2024-01-01T00:00:00Z"), hit("b", "01/02/2024"), hit("c", "2024-01-03T00:00:00Z")];
        let index = index_statistics(vec![
            stats("a", Some(1), None, None),
            stats("b", Some(2), None, None),
            stats("c", Some(3), None, None),
        ]);

        let result = normalize(&hits, &index);
        let ids: Vec<_> = result.joined.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);

        assert_eq!(result.exclusions.len(), 1);
        assert_eq!(
            result.exclusions[0].error(),
            Some(PipelineError::MalformedTimestamp {
                id: "b".into(),
                timestamp: "01/02/2024".into()
            })
        );
    }

    #[test]
    fn test_duplicate_identifier_keeps_first() {
        let mut second = hit("a", "2024-02-01T00:00:00Z");
        second.title = "second".into();
        let hits = vec![hit("a", "2024-01-01T00:00:00Z"), second];
        let index = index_statistics(vec![stats("a", Some(1), None, None)]);

        let result = normalize(&hits, &index);
        assert_eq!(result.joined.len(), 1);
        assert_eq!(result.joined[0].title, "title a");
        assert_eq!(result.exclusions[0].reason, ExclusionReason::DuplicateIdentifier);
        assert!(result.exclusions[0].error().is_none());
    }

    #[test]
    fn test_preserves_search_order() {
        let hits = vec![
            hit("z", "2024-01-01T00:00:00Z"),
            hit("a", "2024-01-01T00:00:00Z"),
            hit("m", "2024-01-01T00:00:00Z"),
        ];
        let index = index_statistics(vec![
            stats("a", Some(100), None, None),
            stats("m", Some(1), None, None),
            stats("z", Some(50), None, None),
        ]);

        let result = normalize(&hits, &index);
        let ids: Vec<_> = result.joined.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn test_parse_published_normalizes_offset() {
        let dt = parse_published("x", "2024-01-01T07:00:00+07:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_published_fractional_seconds() {
        let dt = parse_published("x", "2024-01-01T00:00:00.123Z").unwrap();
        assert_eq!(dt.timestamp(), Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp());
    }

    #[test]
    fn test_parse_published_rejects_garbage() {
        assert!(parse_published("x", "").is_err());
        assert!(parse_published("x", "2024-13-01T00:00:00Z").is_err());
        assert!(parse_published("x", "not a date").is_err());
    }

    #[test]
    fn test_exclusion_display() {
        let exclusion = Exclusion {
            id: "V9".into(),
            reason: ExclusionReason::Unmatched,
        };
        assert_eq!(exclusion.to_string(), "V9: no statistics reported");
    }
}
