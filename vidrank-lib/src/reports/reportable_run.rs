use crate::analysis::{SentimentSummary, WordCount, summarize_sentiment};
use crate::facts::SearchTarget;
use crate::pipeline::{Exclusion, PipelineOutput, Summary, VideoRecord};
use chrono::{DateTime, Utc};

/// The outcome of one search, ready for reporting.
#[derive(Debug, Clone)]
pub struct ReportableRun {
    pub target: SearchTarget,
    pub evaluated_at: DateTime<Utc>,
    pub records: Vec<VideoRecord>,
    pub summary: Summary,
    pub exclusions: Vec<Exclusion>,
    pub top_words: Vec<WordCount>,

    /// Title polarity per record, in record order. Empty when titles were not scored.
    pub polarities: Vec<f64>,
    pub sentiment: Option<SentimentSummary>,
}

impl ReportableRun {
    #[must_use]
    pub fn new(target: SearchTarget, evaluated_at: DateTime<Utc>, output: PipelineOutput, top_words: Vec<WordCount>) -> Self {
        Self {
            target,
            evaluated_at,
            records: output.records,
            summary: output.summary,
            exclusions: output.exclusions,
            top_words,
            polarities: Vec::new(),
            sentiment: None,
        }
    }

    /// Attach the title polarity of every record, in record order.
    #[must_use]
    pub fn with_polarities(mut self, polarities: Vec<f64>) -> Self {
        debug_assert_eq!(polarities.len(), self.records.len());
        self.sentiment = summarize_sentiment(&polarities);
        self.polarities = polarities;
        self
    }

    /// Title polarity of the record at `index`, if titles were scored.
    #[must_use]
    pub fn polarity(&self, index: usize) -> Option<f64> {
        self.polarities.get(index).copied()
    }
}
