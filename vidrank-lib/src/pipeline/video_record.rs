use super::derive::{days_old, views_per_day};
use super::normalize::JoinedVideo;
use chrono::{DateTime, NaiveDate, Utc};

/// A canonical video with its derived metrics.
///
/// Records are only produced by the pipeline, so every record satisfies
/// `days_old >= 1` and `views_per_day == views / days_old`.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    id: String,
    title: String,
    channel: String,
    published: NaiveDate,
    views: u64,
    likes: u64,
    comments: u64,
    days_old: u64,
    views_per_day: f64,
    thumbnail_url: Option<String>,
}

impl VideoRecord {
    /// Derive a record from a joined video as of `now`.
    #[must_use]
    pub fn from_joined(joined: JoinedVideo, now: DateTime<Utc>) -> Self {
        let days_old = days_old(joined.published_at, now);

        Self {
            views_per_day: views_per_day(joined.views, days_old),
            published: joined.published_at.date_naive(),
            id: joined.id,
            title: joined.title,
            channel: joined.channel,
            views: joined.views,
            likes: joined.likes,
            comments: joined.comments,
            days_old,
            thumbnail_url: joined.thumbnail_url,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Calendar date of publication, in UTC.
    #[must_use]
    pub const fn published(&self) -> NaiveDate {
        self.published
    }

    #[must_use]
    pub const fn views(&self) -> u64 {
        self.views
    }

    #[must_use]
    pub const fn likes(&self) -> u64 {
        self.likes
    }

    #[must_use]
    pub const fn comments(&self) -> u64 {
        self.comments
    }

    #[must_use]
    pub const fn days_old(&self) -> u64 {
        self.days_old
    }

    #[must_use]
    pub const fn views_per_day(&self) -> f64 {
        self.views_per_day
    }

    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail_url.as_deref()
    }
}
