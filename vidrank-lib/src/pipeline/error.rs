use thiserror::Error;

/// Failures raised by the metrics pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// A published timestamp is not valid ISO-8601. Only the offending record is affected.
    #[error("malformed timestamp '{timestamp}' on video '{id}'")]
    MalformedTimestamp { id: String, timestamp: String },

    /// Aggregation was asked to summarize zero records.
    #[error("cannot summarize an empty set of videos")]
    EmptyInput,
}
