//! YouTube Data API client
//!
//! Minimal client for the two read operations the pipeline needs: `search.list` and
//! `videos.list`. Failures are classified into [`RemoteApiError`] and never retried.

use crate::facts::{RawVideoSearchHit, RawVideoStatistics, RemoteApiError, SearchOrder, SearchTarget, StatisticsById, VideoSource};
use core::sync::atomic::{AtomicU32, Ordering};
use core::time::Duration;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

const LOG_TARGET: &str = "   youtube";

/// `videos.list` accepts at most this many identifiers per request.
const MAX_IDS_PER_REQUEST: usize = 50;

/// `search.list` returns at most this many results per request.
pub const MAX_RESULTS_LIMIT: u32 = 50;

const VIDEO_KIND: &str = "youtube#video";

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    kind: String,
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    #[serde(default)]
    channel_title: String,
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    #[serde(default)]
    statistics: Statistics,
}

/// Counts arrive as decimal strings, e.g. `"viewCount": "1234"`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[expect(clippy::struct_field_names, reason = "field names match the YouTube API exactly")]
struct Statistics {
    #[serde(default, deserialize_with = "deserialize_count")]
    view_count: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    like_count: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    comment_count: Option<u64>,
}

impl SearchItem {
    fn into_hit(self) -> Option<RawVideoSearchHit> {
        if self.id.kind != VIDEO_KIND {
            log::debug!(target: LOG_TARGET, "Skipping non-video search result of kind '{}'", self.id.kind);
            return None;
        }

        let id = self.id.video_id?;
        let thumbnail_url = self.snippet.thumbnails.medium.or(self.snippet.thumbnails.default).map(|t| t.url);

        Some(RawVideoSearchHit {
            id,
            title: unescape_html(&self.snippet.title),
            channel: unescape_html(&self.snippet.channel_title),
            published_at: self.snippet.published_at,
            thumbnail_url,
        })
    }
}

impl From<VideoItem> for RawVideoStatistics {
    fn from(item: VideoItem) -> Self {
        Self {
            id: item.id,
            view_count: item.statistics.view_count,
            like_count: item.statistics.like_count,
            comment_count: item.statistics.comment_count,
        }
    }
}

/// YouTube Data API v3 client.
#[derive(Debug)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct Client {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_calls: AtomicU32,
}

impl Client {
    /// Create a client that authenticates every request with `api_key`.
    pub fn new(api_key: &str, base_url: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder().user_agent("vidrank").timeout(timeout).build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_calls: AtomicU32::new(0),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of HTTP requests issued so far.
    #[must_use]
    pub fn api_calls(&self) -> u32 {
        self.api_calls.load(Ordering::Relaxed)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T, RemoteApiError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let _ = self.api_calls.fetch_add(1, Ordering::Relaxed);
        log::debug!(target: LOG_TARGET, "GET {url}");

        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteApiError::from_response(status, &body));
        }

        Ok(resp.json::<T>().await?)
    }
}

impl VideoSource for Client {
    async fn search_videos(
        &self,
        target: &SearchTarget,
        max_results: u32,
        order: SearchOrder,
    ) -> Result<Vec<RawVideoSearchHit>, RemoteApiError> {
        let max_results = max_results.clamp(1, MAX_RESULTS_LIMIT).to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("order", order.api_token()),
        ];

        match target {
            SearchTarget::Keyword(keyword) => query.push(("q", keyword.as_str())),
            SearchTarget::Channel(channel_id) => query.push(("channelId", channel_id.as_str())),
        }

        let response: SearchListResponse = self.get_json("search", &query).await?;
        let hits: Vec<_> = response.items.into_iter().filter_map(SearchItem::into_hit).collect();

        log::info!(target: LOG_TARGET, "Search for {target} returned {} video(s)", hits.len());
        Ok(hits)
    }

    async fn get_statistics(&self, ids: &[String]) -> Result<StatisticsById, RemoteApiError> {
        let mut result = StatisticsById::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
            let joined = chunk.join(",");
            let response: VideoListResponse = self.get_json("videos", &[("part", "statistics"), ("id", joined.as_str())]).await?;

            for item in response.items {
                let stats = RawVideoStatistics::from(item);
                let _ = result.insert(stats.id.clone(), stats);
            }
        }

        log::info!(target: LOG_TARGET, "Fetched statistics for {} of {} video(s)", result.len(), ids.len());
        Ok(result)
    }
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    Ok(match Option::<Count>::deserialize(deserializer)? {
        Some(Count::Number(n)) => Some(n),
        Some(Count::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Search snippets come HTML-escaped; undo the handful of entities the API emits.
fn unescape_html(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
