use serde::Serialize;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Number of equal-width buckets the polarity range [-1, 1] is split into.
pub const SENTIMENT_BUCKETS: u8 = 20;

/// Polarity at or beyond which a title counts as positive or negative.
pub const NEUTRAL_THRESHOLD: f64 = 0.05;

/// The overall tone of a single title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Negative,
    Neutral,
    Positive,
}

impl Tone {
    #[must_use]
    pub fn of(polarity: f64) -> Self {
        if polarity >= NEUTRAL_THRESHOLD {
            Self::Positive
        } else if polarity <= -NEUTRAL_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

/// Titles whose polarity falls in `[lower, upper)`, or `[lower, 1]` for the last bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Polarity statistics across a set of titles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSummary {
    pub mean: f64,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,

    /// Occupied buckets only, lowest polarity first.
    pub buckets: Vec<SentimentBucket>,
}

/// Polarity of `title` in [-1, 1], from VADER's compound score.
#[must_use]
pub fn title_polarity(title: &str) -> f64 {
    let analyzer = SentimentIntensityAnalyzer::new();
    analyzer.polarity_scores(title).get("compound").copied().unwrap_or(0.0).clamp(-1.0, 1.0)
}

/// Polarity of every title, in input order.
pub fn title_polarities<'a>(titles: impl IntoIterator<Item = &'a str>) -> Vec<f64> {
    titles.into_iter().map(title_polarity).collect()
}

fn bucket_lower(index: u8) -> f64 {
    (f64::from(index) - f64::from(SENTIMENT_BUCKETS / 2)) / 10.0
}

/// The bucket a polarity lands in; 1.0 belongs to the last bucket.
#[must_use]
pub fn bucket_index(polarity: f64) -> u8 {
    (0..SENTIMENT_BUCKETS).rev().find(|&i| polarity >= bucket_lower(i)).unwrap_or(0)
}

/// Summarize the polarities of a result set, or `None` when there are none.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "title counts are tiny")]
pub fn summarize_sentiment(polarities: &[f64]) -> Option<SentimentSummary> {
    if polarities.is_empty() {
        return None;
    }

    let mut counts = vec![0_usize; usize::from(SENTIMENT_BUCKETS)];
    let mut summary = SentimentSummary {
        mean: polarities.iter().sum::<f64>() / polarities.len() as f64,
        positive: 0,
        neutral: 0,
        negative: 0,
        buckets: Vec::new(),
    };

    for &polarity in polarities {
        match Tone::of(polarity) {
            Tone::Positive => summary.positive += 1,
            Tone::Neutral => summary.neutral += 1,
            Tone::Negative => summary.negative += 1,
        }

        counts[usize::from(bucket_index(polarity))] += 1;
    }

    summary.buckets = (0..SENTIMENT_BUCKETS)
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(i, count)| SentimentBucket {
            lower: bucket_lower(i),
            upper: bucket_lower(i + 1),
            count,
        })
        .collect();

    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_title() {
        let polarity = title_polarity("I love this amazing, wonderful tutorial!");
        assert!(polarity > NEUTRAL_THRESHOLD, "polarity was {polarity}");
        assert!(polarity <= 1.0);
        assert_eq!(Tone::of(polarity), Tone::Positive);
    }

    #[test]
    fn test_negative_title() {
        let polarity = title_polarity("The worst, most horrible and terrible bug ever");
        assert!(polarity < -NEUTRAL_THRESHOLD, "polarity was {polarity}");
        assert!(polarity >= -1.0);
        assert_eq!(Tone::of(polarity), Tone::Negative);
    }

    #[test]
    fn test_neutral_title() {
        let polarity = title_polarity("Rust ownership explained");
        assert_eq!(Tone::of(polarity), Tone::Neutral, "polarity was {polarity}");
    }

    #[test]
    fn test_title_polarities_keep_order() {
        let polarities = title_polarities(["I love Rust", "I hate bugs", "Rust ownership explained"]);
        assert_eq!(polarities.len(), 3);
        assert!(polarities[0] > 0.0);
        assert!(polarities[1] < 0.0);
    }

    #[test]
    fn test_tone_threshold() {
        assert_eq!(Tone::of(0.05), Tone::Positive);
        assert_eq!(Tone::of(0.049), Tone::Neutral);
        assert_eq!(Tone::of(0.0), Tone::Neutral);
        assert_eq!(Tone::of(-0.049), Tone::Neutral);
        assert_eq!(Tone::of(-0.05), Tone::Negative);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(bucket_index(-1.0), 0);
        assert_eq!(bucket_index(-0.95), 0);
        assert_eq!(bucket_index(-0.5), 5);
        assert_eq!(bucket_index(-0.25), 7);
        assert_eq!(bucket_index(-0.000_1), 9);
        assert_eq!(bucket_index(0.0), 10);
        assert_eq!(bucket_index(0.5), 15);
        assert_eq!(bucket_index(0.95), 19);
        assert_eq!(bucket_index(1.0), 19);
    }

    #[test]
    fn test_summarize_sentiment() {
        let summary = summarize_sentiment(&[0.5, 0.0, -0.25, 0.55]).unwrap();
        assert_eq!(summary.mean, 0.2);
        assert_eq!((summary.positive, summary.neutral, summary.negative), (2, 1, 1));
        assert_eq!(
            summary.buckets,
            vec![
                SentimentBucket {
                    lower: -0.3,
                    upper: -0.2,
                    count: 1
                },
                SentimentBucket {
                    lower: 0.0,
                    upper: 0.1,
                    count: 1
                },
                SentimentBucket {
                    lower: 0.5,
                    upper: 0.6,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_summarize_extremes_share_edge_buckets() {
        let summary = summarize_sentiment(&[-1.0, 1.0, 0.9]).unwrap();
        assert_eq!(summary.buckets.len(), 2);
        assert_eq!(summary.buckets[0].lower, -1.0);
        assert_eq!(summary.buckets[1].upper, 1.0);
        assert_eq!(summary.buckets[1].count, 2);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize_sentiment(&[]).is_none());
    }
}
