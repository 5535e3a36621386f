use super::Host;
use super::common::{Common, CommonArgs};
use crate::Result;
use crate::facts::{SearchOrder, SearchTarget};
use clap::Parser;
use ohno::bail;

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// What to search for
    #[arg(value_name = "KEYWORD")]
    pub keyword: String,

    /// How results are ordered
    #[arg(long, short = 'o', value_name = "ORDER", default_value = "relevance")]
    pub order: SearchOrder,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub async fn process_search<H: Host>(host: &mut H, args: &SearchArgs) -> Result<()> {
    let keyword = args.keyword.trim();
    if keyword.is_empty() {
        bail!("the search keyword must not be empty");
    }

    let mut common = Common::new(host, &args.common)?;
    common.analyze(SearchTarget::Keyword(keyword.to_string()), args.order).await
}
