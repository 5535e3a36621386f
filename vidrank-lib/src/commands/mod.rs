//! Command-line interface and orchestration for vidrank
//!
//! This module implements the CLI commands and wires the other modules together to
//! go from a keyword or channel to finished reports. It handles argument parsing,
//! configuration, session state, and the high-level workflow.
//!
//! # Implementation Model
//!
//! ## Commands
//!
//! - **search**: Report the videos matching a keyword, in relevance, newest, or popular order
//! - **channel**: Report the most recent uploads of one channel
//! - **init**: Generate a default configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate handler. Both reporting commands follow the same steps in `common`:
//!
//! 1. Initialize logging, load configuration, and build the [`Session`] from the API keys
//! 2. Search and fetch statistics through a memoizing YouTube client
//! 3. Run the metrics pipeline, listing every excluded video on stderr
//! 4. Count title words and generate the requested reports
//! 5. Optionally ask an OpenAI model for suggestions; a failure there keeps the reports
//!
//! Configuration is a TOML file (`vidrank.toml`) whose values all have defaults.

mod channel;
mod common;
mod config;
mod host;
mod init;
mod progress_reporter;
mod run;
mod search;
mod session;

#[cfg(debug_assertions)]
pub use config::Config;

pub use channel::{ChannelArgs, process_channel};
pub use common::{ColorMode, CommonArgs, LogLevel};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
pub use search::{SearchArgs, process_search};
pub use session::{MAX_API_KEYS, Session, mask_key};
