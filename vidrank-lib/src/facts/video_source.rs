use super::{RawVideoSearchHit, RemoteApiError, SearchOrder, SearchTarget, StatisticsById};

/// The search and statistics collaborator the pipeline is fed from.
pub trait VideoSource: Send + Sync {
    /// Search for videos, returned in the order the platform ranked them.
    fn search_videos(
        &self,
        target: &SearchTarget,
        max_results: u32,
        order: SearchOrder,
    ) -> impl Future<Output = Result<Vec<RawVideoSearchHit>, RemoteApiError>> + Send;

    /// Look up counters for the given video identifiers.
    ///
    /// Identifiers the platform does not know are simply absent from the result.
    fn get_statistics(&self, ids: &[String]) -> impl Future<Output = Result<StatisticsById, RemoteApiError>> + Send;
}
