use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::facts::{SearchOrder, SearchTarget};
use clap::Parser;
use ohno::bail;

#[derive(Parser, Debug)]
pub struct ChannelArgs {
    /// Channel identifier, e.g. `UC_x5XG1OV2P6uZZ5FSM9Ttw`
    #[arg(value_name = "CHANNEL_ID")]
    pub channel_id: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Report a channel's most recent uploads.
pub async fn process_channel<H: Host>(host: &mut H, args: &ChannelArgs) -> Result<()> {
    let channel_id = args.channel_id.trim();
    if channel_id.is_empty() {
        bail!("the channel identifier must not be empty");
    }

    let mut common = Common::new(host, &args.common)?;

    // Channel mode always lists newest uploads first
    common.analyze(SearchTarget::Channel(channel_id.to_string()), SearchOrder::Newest).await
}
