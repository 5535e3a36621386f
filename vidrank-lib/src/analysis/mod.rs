//! Text analysis over the titles a search found
//!
//! - [`top_words`] counts meaningful title words, standing in for a word cloud.
//! - [`title_polarities`] scores the tone of each title with VADER, and
//!   [`summarize_sentiment`] buckets those scores into a histogram.
//! - [`SuggestionClient`] asks an OpenAI-compatible model for new titles and a content
//!   strategy. It is optional and runs only after the metrics report is complete, so a
//!   failure here never discards the report.

mod sentiment;
mod suggestions;
mod title_words;

pub use sentiment::{SentimentSummary, summarize_sentiment, title_polarities};
pub use suggestions::{DEFAULT_API_URL, DEFAULT_MODEL, SuggestionClient, Suggestions, strategy_prompt, titles_prompt};
pub use title_words::{WordCount, top_words};
