//! Common processing logic shared between the search and channel commands.

use super::config::Config;
use super::session::Session;
use super::{Host, ProgressReporter};
use crate::Result;
use crate::analysis::{SuggestionClient, title_polarities, top_words};
use crate::facts::youtube::{Client, MAX_RESULTS_LIMIT};
use crate::facts::{CachingSource, ResponseCaches, SearchOrder, SearchTarget, StatisticsById, VideoSource};
use crate::pipeline::{VideoRecord, run_pipeline};
use crate::reports::{
    ReportableRun, default_csv_file_name, generate_console, generate_console_suggestions, generate_csv, generate_json,
    generate_xlsx,
};
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::{Args, ValueEnum};
use core::time::Duration;
use ohno::IntoAppError;
use std::fs;
use std::io::{IsTerminal, Write, stderr, stdout};

const LOG_TARGET: &str = "   command";

/// How long remote calls may run before the spinner appears.
const PROGRESS_DELAY: Duration = Duration::from_millis(300);

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

impl ColorMode {
    fn resolve(self, is_terminal: impl FnOnce() -> bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => is_terminal(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Common arguments shared between the search and channel commands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// YouTube Data API key(s), comma separated (up to five)
    #[arg(long = "api-key", value_name = "KEY", env = "YOUTUBE_API_KEY", value_delimiter = ',', hide_env_values = true)]
    pub api_keys: Vec<String>,

    /// Which of the given API keys to use, starting at 1
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub key_index: usize,

    /// Number of results to request (1-50, default from configuration)
    #[arg(long, short = 'n', value_name = "COUNT", value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_RESULTS_LIMIT)))]
    pub max_results: Option<u32>,

    /// Path to configuration file (default is `vidrank.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none", global = true)]
    pub log_level: LogLevel,

    /// Number of most frequent title words to report (default from configuration)
    #[arg(long, value_name = "COUNT")]
    pub words: Option<usize>,

    /// Ask an OpenAI model for new titles and a content strategy
    #[arg(long, help_heading = "Suggestions")]
    pub suggest: bool,

    /// OpenAI API key used by --suggest
    #[arg(long, value_name = "KEY", env = "OPENAI_API_KEY", hide_env_values = true, help_heading = "Suggestions")]
    pub openai_api_key: Option<String>,

    /// Output videos to a CSV file (default name is `youtube_<query>.csv`)
    #[arg(long, value_name = "PATH", num_args = 0..=1, help_heading = "Report Output")]
    pub csv: Option<Option<Utf8PathBuf>>,

    /// Output the full run to a JSON file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Output videos and summary to an Excel spreadsheet file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub excel: Option<Utf8PathBuf>,

    /// Output the report to the console.
    /// If omitted, console output is shown only when no other reports are generated.
    #[arg(long, help_heading = "Report Output")]
    pub console: bool,
}

pub struct Common<'a, H: Host> {
    pub config: Config,
    pub session: Session,
    host: &'a mut H,
    source: CachingSource<Client>,
    progress: ProgressReporter,
    color: ColorMode,
    max_results: u32,
    top_words: usize,
    suggest: bool,
    openai_api_key: Option<String>,
    console: bool,
    csv: Option<Option<Utf8PathBuf>>,
    json: Option<Utf8PathBuf>,
    excel: Option<Utf8PathBuf>,
}

impl<'a, H: Host> Common<'a, H> {
    /// Create a new Common processor with logger, session, client, and config
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded, the API keys are unusable, or the client cannot be built
    pub fn new(host: &'a mut H, args: &CommonArgs) -> Result<Self> {
        Self::init_logging(args.log_level);

        let base_dir = std::env::current_dir().into_app_err("determining the working directory")?;
        let base_dir = Utf8PathBuf::try_from(base_dir).into_app_err("the working directory is not valid UTF-8")?;
        let config = Config::load(&base_dir, args.config.as_ref())?;

        let mut session = Session::new(args.api_keys.iter().map(String::as_str))?;
        session.select(args.key_index)?;
        log::info!(target: LOG_TARGET, "Using YouTube API key #{} ({})", session.selected(), session.masked_api_key());

        let client = Client::new(session.api_key(), config.youtube_api_url.as_str(), config.request_timeout)?;
        let caches = ResponseCaches::shared(&config.youtube_api_url, config.cache_ttl);
        let source = CachingSource::with_caches(client, caches);

        let use_colors_for_progress = args.color.resolve(|| stderr().is_terminal());
        let progress_enabled = args.log_level == LogLevel::None && stderr().is_terminal();
        let progress = ProgressReporter::new(PROGRESS_DELAY, progress_enabled, use_colors_for_progress);

        Ok(Self {
            max_results: args.max_results.unwrap_or(config.max_results),
            top_words: args.words.unwrap_or(config.top_words),
            config,
            session,
            host,
            source,
            progress,
            color: args.color,
            suggest: args.suggest,
            openai_api_key: args.openai_api_key.clone().filter(|k| !k.trim().is_empty()),
            console: args.console,
            csv: args.csv.clone(),
            json: args.json.clone(),
            excel: args.excel.clone(),
        })
    }

    /// Initialize logger based on log level
    fn init_logging(log_level: LogLevel) {
        let level = match log_level {
            LogLevel::None => return,
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        // A second run in the same process keeps the first logger
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
            .try_init();
    }

    /// Search, run the pipeline, write every requested report, then optionally ask for suggestions.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote call fails or a report cannot be written
    pub async fn analyze(&mut self, target: SearchTarget, order: SearchOrder) -> Result<()> {
        self.session.record_query(target.clone());

        let calls_before = self.source.inner().api_calls();
        let run = self.collect(target, order).await;
        self.progress.done();
        self.session.add_api_calls(self.source.inner().api_calls().saturating_sub(calls_before));

        if let Some(query) = self.session.last_query() {
            log::info!(target: LOG_TARGET, "{} YouTube API call(s) made this session, last query {query}", self.session.api_calls());
        }

        let run = run?;
        self.report(&run)?;
        self.suggestions(&run).await
    }

    async fn collect(&mut self, target: SearchTarget, order: SearchOrder) -> Result<ReportableRun> {
        self.progress.set_phase("Searching");
        self.progress.set_message(target.to_string());
        log::info!(target: LOG_TARGET, "Searching {} for {target} (max {}, order {})", self.source.inner().base_url(), self.max_results, order.api_token());

        let hits = self.source.search_videos(&target, self.max_results, order).await?;
        let ids: Vec<String> = hits.iter().map(|hit| hit.id.clone()).collect();

        let statistics = if ids.is_empty() {
            log::info!(target: LOG_TARGET, "Search for {target} returned no videos");
            StatisticsById::new()
        } else {
            self.progress.set_phase("Fetching");
            self.progress.set_message(format!("statistics for {} video(s)", ids.len()));
            self.source.get_statistics(&ids).await?
        };

        let evaluated_at = Utc::now();
        let output = run_pipeline(&hits, &statistics, evaluated_at);

        if !output.exclusions.is_empty() {
            let _ = writeln!(self.host.error(), "Excluded {} video(s) from the report", output.exclusions.len());
            for exclusion in &output.exclusions {
                match exclusion.error() {
                    Some(e) => log::warn!(target: LOG_TARGET, "Excluded {}: {e}", exclusion.id),
                    None => log::info!(target: LOG_TARGET, "Excluded {exclusion}"),
                }
                let _ = writeln!(self.host.error(), "  {exclusion}");
            }
        }

        let words = top_words(output.records.iter().map(VideoRecord::title), self.top_words);
        let polarities = title_polarities(output.records.iter().map(VideoRecord::title));
        Ok(ReportableRun::new(target, evaluated_at, output, words).with_polarities(polarities))
    }

    /// Write the requested reports.
    ///
    /// # Errors
    ///
    /// Returns an error if a report cannot be rendered or written
    pub fn report(&mut self, run: &ReportableRun) -> Result<()> {
        let generating_reports = self.csv.is_some() || self.json.is_some() || self.excel.is_some();

        if self.console || !generating_reports {
            let mut console_output = String::new();
            let use_colors = self.color.resolve(|| stdout().is_terminal());
            generate_console(run, use_colors, &mut console_output)?;
            let _ = write!(self.host.output(), "{console_output}");
        }

        if let Some(path) = &self.csv {
            let filename = path.clone().unwrap_or_else(|| Utf8PathBuf::from(default_csv_file_name(&run.target)));
            let mut csv_output = String::new();
            generate_csv(&run.records, &mut csv_output)?;
            fs::write(&filename, csv_output).into_app_err_with(|| format!("writing CSV report to '{filename}'"))?;
            log::info!(target: LOG_TARGET, "Wrote CSV report to '{filename}'");
        }

        if let Some(filename) = &self.json {
            let mut json_output = String::new();
            generate_json(run, &mut json_output)?;
            fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report to '{filename}'"))?;
            log::info!(target: LOG_TARGET, "Wrote JSON report to '{filename}'");
        }

        if let Some(filename) = &self.excel {
            let mut file = fs::File::create(filename).into_app_err_with(|| format!("creating Excel report '{filename}'"))?;
            generate_xlsx(run, &mut file)?;
            log::info!(target: LOG_TARGET, "Wrote Excel report to '{filename}'");
        }

        Ok(())
    }

    /// Ask for suggestions after the report is out; failures are reported and swallowed.
    async fn suggestions(&mut self, run: &ReportableRun) -> Result<()> {
        if !self.suggest {
            return Ok(());
        }

        let Some(api_key) = &self.openai_api_key else {
            let _ = writeln!(
                self.host.error(),
                "Skipping suggestions: no OpenAI API key, use --openai-api-key or set OPENAI_API_KEY"
            );
            return Ok(());
        };

        if run.records.is_empty() {
            let _ = writeln!(self.host.error(), "Skipping suggestions: no videos to base them on");
            return Ok(());
        }

        let client = SuggestionClient::new(
            api_key,
            self.config.openai_api_url.as_str(),
            self.config.openai_model.as_str(),
            self.config.request_timeout,
        )?;

        let titles: Vec<&str> = run.records.iter().map(VideoRecord::title).collect();
        match client.suggest(&run.target, &titles).await {
            Ok(suggestions) => {
                let mut output = String::new();
                let use_colors = self.color.resolve(|| stdout().is_terminal());
                generate_console_suggestions(&suggestions, use_colors, &mut output)?;
                let _ = writeln!(self.host.output());
                let _ = write!(self.host.output(), "{output}");
            }
            Err(e) => {
                log::error!(target: LOG_TARGET, "Suggestion request failed: {e}");
                let _ = writeln!(self.host.error(), "Unable to get suggestions from {}: {e}", client.model());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_resolve() {
        assert!(ColorMode::Always.resolve(|| false));
        assert!(!ColorMode::Never.resolve(|| true));
        assert!(ColorMode::Auto.resolve(|| true));
        assert!(!ColorMode::Auto.resolve(|| false));
    }
}
