//! Title and strategy suggestions from an OpenAI-compatible chat completion API.

use crate::facts::{RemoteApiError, SearchTarget};
use core::time::Duration;
use serde::{Deserialize, Serialize};

const LOG_TARGET: &str = "suggestions";

/// Public endpoint of the OpenAI API.
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// What the model proposed for a set of titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    /// Five new title ideas.
    pub titles: String,

    /// Tags and content strategy.
    pub strategy: String,
}

/// Prompt asking for five new titles in the spirit of `titles`.
#[must_use]
pub fn titles_prompt(target: &SearchTarget, titles: &[&str]) -> String {
    let list = titles.join("\n");
    match target {
        SearchTarget::Keyword(keyword) => format!(
            "Here are video titles found for the keyword '{keyword}':\n{list}\nWrite 5 new titles that are catchy and suitable for YouTube:"
        ),
        SearchTarget::Channel(_) => {
            format!("Based on the following video titles:\n{list}\nWrite 5 new title suggestions that are engaging and SEO friendly:")
        }
    }
}

/// Prompt asking for tags and a content strategy.
#[must_use]
pub fn strategy_prompt(target: &SearchTarget, titles: &[&str]) -> String {
    let list = titles.join("\n");
    match target {
        SearchTarget::Keyword(keyword) => {
            format!("What content ideas, tags, and strategy fit the keyword '{keyword}' based on this data:\n{list}")
        }
        SearchTarget::Channel(_) => format!(
            "Based on a channel with the following video titles:\n{list}\nRecommend relevant tags and a trending content strategy:"
        ),
    }
}

/// Client for `POST {base}/chat/completions`.
#[derive(Debug)]
#[expect(clippy::struct_field_names, reason = "client field stores the underlying HTTP client")]
pub struct SuggestionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl SuggestionClient {
    pub fn new(api_key: &str, base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> crate::Result<Self> {
        let client = reqwest::Client::builder().user_agent("vidrank").timeout(timeout).build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.into(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single user prompt and return the first choice's trimmed answer.
    pub async fn complete(&self, prompt: &str) -> Result<String, RemoteApiError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        log::debug!(target: LOG_TARGET, "POST {url} (model {})", self.model);

        let resp = self.client.post(&url).bearer_auth(&self.api_key).json(&request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteApiError::from_response(status, &body));
        }

        let response: ChatResponse = resp.json().await?;
        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| RemoteApiError::new("no completion returned"))
    }

    /// Ask for new titles and a content strategy based on what a search found.
    pub async fn suggest(&self, target: &SearchTarget, titles: &[&str]) -> Result<Suggestions, RemoteApiError> {
        log::info!(target: LOG_TARGET, "Requesting suggestions for {target} from {} title(s)", titles.len());

        let new_titles = self.complete(&titles_prompt(target, titles)).await?;
        let strategy = self.complete(&strategy_prompt(target, titles)).await?;

        Ok(Suggestions {
            titles: new_titles,
            strategy,
        })
    }
}
