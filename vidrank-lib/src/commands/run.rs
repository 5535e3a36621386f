//! Command dispatch logic for vidrank

use super::{ChannelArgs, InitArgs, SearchArgs, init_config, process_channel, process_search};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use ohno::app_err;
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "vidrank", author, version, long_about = None)]
#[command(about = "Rank and summarize YouTube videos for a keyword or a channel")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: VidrankSubcommand,
}

#[derive(Subcommand, Debug)]
enum VidrankSubcommand {
    /// Search videos by keyword and report their metrics
    Search(Box<SearchArgs>),
    /// Report the most recent uploads of a channel
    Channel(Box<ChannelArgs>),
    /// Generate a default configuration file
    Init(InitArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version arrive as errors too, but are not failures
            let code = e.exit_code();
            let rendered = e.render();
            if e.use_stderr() {
                let _ = write!(host.error(), "{rendered}");
            } else {
                let _ = write!(host.output(), "{rendered}");
            }
            host.exit(code);
            return if code == 0 { Ok(()) } else { Err(app_err!("invalid command line: {}", e.kind())) };
        }
    };

    match &cli.command {
        VidrankSubcommand::Search(search_args) => process_search(host, search_args).await,
        VidrankSubcommand::Channel(channel_args) => process_channel(host, channel_args).await,
        VidrankSubcommand::Init(init_args) => init_config(host, init_args),
    }
}
