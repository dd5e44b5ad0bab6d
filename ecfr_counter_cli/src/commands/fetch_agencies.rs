//! Writes the agency snapshot consumed by `refresh`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ecfr_counter_lib::{fetch_agency_snapshot, save_agencies, Client, PipelineConfig};

#[derive(Args)]
pub struct FetchAgenciesArgs {
    /// Where to write the snapshot (default: ECFR_AGENCIES_PATH or agencies_data.json)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Leave references without amendment dates instead of stamping them from the title listing
    #[arg(long)]
    pub no_amendment_dates: bool,

    /// eCFR base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

pub async fn run(args: &FetchAgenciesArgs) -> Result<()> {
    let config = PipelineConfig::from_env();
    let base_url = args.base_url.as_deref().unwrap_or(&config.base_url);
    let out = args.out.clone().unwrap_or(config.agencies_path);

    let client = Client::with_base_url(base_url)?;
    let agencies = fetch_agency_snapshot(&client, !args.no_amendment_dates).await?;
    save_agencies(&out, &agencies)?;

    let references: usize = agencies.iter().map(|a| a.references.len()).sum();
    eprintln!(
        "Saved {} agencies ({} references) to {}",
        agencies.len(),
        references,
        out.display()
    );
    Ok(())
}
