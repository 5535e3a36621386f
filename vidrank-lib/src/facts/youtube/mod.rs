//! YouTube Data API v3 collaborator.

mod client;

pub use client::{Client, MAX_RESULTS_LIMIT};

/// Public endpoint of the YouTube Data API v3.
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3";
