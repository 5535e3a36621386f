use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// How the search collaborator orders its results.
///
/// The pipeline never re-sorts, so this choice decides the row order of every report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchOrder {
    /// Most relevant first
    #[default]
    Relevance,

    /// Most recently published first
    Newest,

    /// Most viewed first
    Popular,
}

impl SearchOrder {
    /// The sort token understood by the YouTube Data API.
    #[must_use]
    pub const fn api_token(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Newest => "date",
            Self::Popular => "viewCount",
        }
    }
}
