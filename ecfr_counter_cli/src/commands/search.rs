use anyhow::Result;
use clap::Args;
use ecfr_counter_lib::search::{search_word_occurrences, DEFAULT_PER_PAGE};
use ecfr_counter_lib::{Client, PipelineConfig};

use crate::output::{print_json, print_search_summary, OutputFormat};

#[derive(Args)]
pub struct SearchArgs {
    /// Word to count
    pub query: String,

    /// Search results to request
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,

    /// eCFR base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

pub async fn run(args: &SearchArgs, format: &OutputFormat) -> Result<()> {
    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| PipelineConfig::from_env().base_url);
    let client = Client::with_base_url(&base_url)?;
    let summary = search_word_occurrences(&client, &args.query, args.per_page).await?;

    match format {
        OutputFormat::Json => print_json(&summary),
        _ => print_search_summary(&summary),
    }
    Ok(())
}
