use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ecfr_counter_lib::{read_ledger, totals_by_agency, PipelineConfig};

use crate::output::{
    print_json, print_totals_csv, print_totals_markdown, print_totals_table, OutputFormat,
};

#[derive(Args)]
pub struct ReportArgs {
    /// Ledger to summarize (default: ECFR_LEDGER_PATH or word_counts.csv)
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Show only the N largest agencies
    #[arg(long)]
    pub top: Option<usize>,
}

pub fn run(args: &ReportArgs, format: &OutputFormat) -> Result<()> {
    let path = args
        .ledger
        .clone()
        .unwrap_or_else(|| PipelineConfig::from_env().ledger_path);
    let rows = read_ledger(&path)?;
    let mut totals = totals_by_agency(&rows);
    if let Some(n) = args.top {
        totals.truncate(n);
    }

    eprintln!(
        "{} ledger rows across {} agencies",
        rows.len(),
        totals.len()
    );

    match format {
        OutputFormat::Table => print_totals_table(&totals),
        OutputFormat::Json => print_json(&totals),
        OutputFormat::Csv => print_totals_csv(&totals)?,
        OutputFormat::Markdown => print_totals_markdown(&totals),
    }

    Ok(())
}
