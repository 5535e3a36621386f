//! Raw video data and the collaborators that produce it
//!
//! This module holds everything the metrics pipeline consumes but does not own:
//! the raw search hits and statistics records, the [`VideoSource`] trait describing
//! the search/statistics collaborator, and its implementations.
//!
//! # Implementation Model
//!
//! - [`RawVideoSearchHit`] and [`RawVideoStatistics`] mirror what the platform reports,
//!   with unreported counters kept as `None`.
//! - [`VideoSource`] exposes the two read operations, `search_videos` and
//!   `get_statistics`. Both fail with [`RemoteApiError`] and are never retried.
//! - [`youtube::Client`] talks to the YouTube Data API v3.
//! - [`CachingSource`] wraps any source with fixed-duration memoization keyed by the
//!   query parameters, using [`ResponseCaches`] shared by every run against the same endpoint.
//!   The pipeline does not know or care whether data came from it.

mod raw_video;
mod remote_api_error;
mod response_cache;
mod search_order;
mod search_target;
mod video_source;
pub mod youtube;

pub use raw_video::{RawVideoSearchHit, RawVideoStatistics, StatisticsById, index_statistics};
pub use remote_api_error::RemoteApiError;
pub use response_cache::{CachingSource, ResponseCache, ResponseCaches};
pub use search_order::SearchOrder;
pub use search_target::SearchTarget;
pub use video_source::VideoSource;
