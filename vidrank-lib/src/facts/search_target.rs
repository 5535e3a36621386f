use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

/// What a search is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchTarget {
    /// Free-text query
    Keyword(String),

    /// All recent uploads of one channel, by channel identifier
    Channel(String),
}

impl SearchTarget {
    /// The raw query text or channel identifier.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Keyword(s) | Self::Channel(s) => s,
        }
    }

    /// `keyword` or `channel`.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Keyword(_) => "keyword",
            Self::Channel(_) => "channel",
        }
    }
}

impl Display for SearchTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Keyword(keyword) => write!(f, "'{keyword}'"),
            Self::Channel(channel_id) => write!(f, "channel {channel_id}"),
        }
    }
}
