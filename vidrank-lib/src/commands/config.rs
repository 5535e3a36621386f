use crate::Result;
use crate::facts::youtube::MAX_RESULTS_LIMIT;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use url::Url;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// File looked up in the working directory when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "vidrank.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Number of search results requested per run (1..=50)
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Base URL of the YouTube Data API
    #[serde(default = "default_youtube_api_url")]
    pub youtube_api_url: String,

    /// Base URL of the OpenAI-compatible completion API
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Model asked for suggestions
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Duration to reuse search and statistics responses
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Timeout applied to every HTTP request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Number of most frequent title words to report
    #[serde(default = "default_top_words")]
    pub top_words: usize,
}

const fn default_max_results() -> u32 {
    30
}

fn default_youtube_api_url() -> String {
    crate::facts::youtube::DEFAULT_API_URL.to_string()
}

fn default_openai_api_url() -> String {
    crate::analysis::DEFAULT_API_URL.to_string()
}

fn default_openai_model() -> String {
    crate::analysis::DEFAULT_MODEL.to_string()
}

const fn default_cache_ttl() -> Duration {
    Duration::from_secs(30 * 60)
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

const fn default_top_words() -> usize {
    20
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// An explicit `config_path` must exist. Otherwise `vidrank.toml` in `base_dir` is used
    /// when present, and the embedded defaults when not.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading vidrank configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading vidrank configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a count is out of range or a URL does not parse
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_RESULTS_LIMIT).contains(&self.max_results) {
            return Err(app_err!(
                "max_results must be between 1 and {MAX_RESULTS_LIMIT}, got {}",
                self.max_results
            ));
        }

        if self.top_words == 0 {
            return Err(app_err!("top_words must be at least 1"));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        if self.openai_model.trim().is_empty() {
            return Err(app_err!("openai_model must not be empty"));
        }

        for (name, value) in [("youtube_api_url", &self.youtube_api_url), ("openai_api_url", &self.openai_api_url)] {
            let url = Url::parse(value).into_app_err_with(|| format!("{name} is not a valid URL: '{value}'"))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(app_err!("{name} must use http or https, got '{value}'"));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
