use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use ecfr_counter_lib::Client;

use super::refresh::RefreshArgs;
use crate::web::{self, AppState};

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    #[command(flatten)]
    pub pipeline: RefreshArgs,
}

pub async fn run(args: &ServeArgs) -> Result<()> {
    let config = args.pipeline.to_config()?;
    let client = Arc::new(Client::with_base_url(&config.base_url)?);
    let app = web::router(Arc::new(AppState::new(config, client)));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
