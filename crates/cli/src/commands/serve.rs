use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use clap::Args;
use curve_sdk::{AlloyHttpTransport, TradeBuilder};
use log::info;

use super::common::EngineArgs;
use crate::server;

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Socket address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,
    #[command(flatten)]
    pub engine: EngineArgs,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let config = args.engine.resolve()?;
    let transport = AlloyHttpTransport::new(&config.rpc_url)
        .with_context(|| format!("rpc url {}", config.rpc_url))?;
    let builder = Arc::new(TradeBuilder::new(&config, transport));
    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("bind {}", args.listen))?;
    info!(
        "serving curve {} via {} on {}",
        config.curve, config.rpc_url, args.listen
    );
    axum::serve(listener, server::router(builder))
        .await
        .context("http server")?;
    Ok(())
}
