mod commands;
mod output;
mod web;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "ecfr-counter")]
#[command(about = "Count words in eCFR regulatory text per agency")]
struct Cli {
    /// Output format: table, json, csv, md
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recount changed chapters and append them to the ledger
    Refresh(commands::refresh::RefreshArgs),
    /// Download the agency directory and write the agency snapshot
    FetchAgencies(commands::fetch_agencies::FetchAgenciesArgs),
    /// Summarize the ledger per agency
    Report(commands::report::ReportArgs),
    /// Count occurrences of a word in full-text search excerpts
    Search(commands::search::SearchArgs),
    /// Serve the ledger and refresh trigger over HTTP
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ecfr_counter=info".parse()?)
                .add_directive("ecfr_api=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    match &cli.command {
        Commands::Refresh(args) => commands::refresh::run(args, &format).await?,
        Commands::FetchAgencies(args) => commands::fetch_agencies::run(args).await?,
        Commands::Report(args) => commands::report::run(args, &format)?,
        Commands::Search(args) => commands::search::run(args, &format).await?,
        Commands::Serve(args) => commands::serve::run(args).await?,
    }

    Ok(())
}
