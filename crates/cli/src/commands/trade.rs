use anyhow::{Context, Result};
use clap::Args;
use curve_sdk::{
    AlloyHttpTransport, BuyArgs, EngineConfig, EvmTransport, SellArgs, TradeBuilder,
    TradeRequest,
};
use log::info;

use super::common::{
    format_tx_hash, parse_address, parse_positive_wei, parse_wei, render_request, EngineArgs,
};

#[derive(Clone, Debug, Args)]
pub struct PriceArgs {
    /// Token address (0x-prefixed).
    pub token: String,
    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Clone, Debug, Args)]
pub struct BroadcastArgs {
    /// Sign and send the built transaction instead of only printing it.
    #[arg(long, default_value_t = false)]
    pub broadcast: bool,
    /// Private key (0x-prefixed) used with --broadcast.
    #[arg(long, value_name = "HEX64")]
    pub private_key: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct BuildBuyArgs {
    /// Token address (0x-prefixed).
    pub token: String,
    /// ETH to spend (wei).
    #[arg(long, value_name = "WEI")]
    pub eth_in: String,
    /// Reject the trade if fewer tokens would be received (wei).
    #[arg(long, value_name = "WEI")]
    pub min_tokens_out: Option<String>,
    #[command(flatten)]
    pub engine: EngineArgs,
    #[command(flatten)]
    pub send: BroadcastArgs,
}

#[derive(Clone, Debug, Args)]
pub struct BuildSellArgs {
    /// Token address (0x-prefixed).
    pub token: String,
    /// Tokens to sell (wei).
    #[arg(long, value_name = "WEI")]
    pub token_in: String,
    /// Minimum ETH to accept (wei); defaults to the quote less --slippage-bps.
    #[arg(long, value_name = "WEI")]
    pub min_eth_out: Option<String>,
    #[command(flatten)]
    pub engine: EngineArgs,
    #[command(flatten)]
    pub send: BroadcastArgs,
}

fn connect(config: &EngineConfig) -> Result<TradeBuilder<AlloyHttpTransport>> {
    let transport = AlloyHttpTransport::new(&config.rpc_url)
        .with_context(|| format!("rpc url {}", config.rpc_url))?;
    Ok(TradeBuilder::new(config, transport))
}

pub async fn run_price(args: PriceArgs) -> Result<()> {
    let token = parse_address(&args.token)?;
    let config = args.engine.resolve()?;
    let builder = connect(&config)?;
    let (state, metrics) = builder.price(token).await?;
    println!("price_eth={:.12e}", metrics.price);
    println!("market_cap_eth={:.6}", metrics.market_cap);
    println!("bonding_progress_pct={:.2}", metrics.bonding_progress);
    println!("volume_proxy_eth={:.6}", metrics.volume_proxy);
    println!("graduated={}", state.complete);
    println!(
        "default_sell_slippage_bps={}",
        builder.default_sell_slippage_bps()
    );
    Ok(())
}

pub async fn run_build_buy(args: BuildBuyArgs) -> Result<()> {
    let token = parse_address(&args.token)?;
    let eth_in = parse_positive_wei(&args.eth_in, "eth_in")?;
    let min_tokens_out = args
        .min_tokens_out
        .as_deref()
        .map(|v| parse_wei(v, "min_tokens_out"))
        .transpose()?;
    let config = args.engine.resolve()?;
    let builder = connect(&config)?;
    let request = builder
        .build_buy(BuyArgs {
            token,
            eth_in,
            min_tokens_out,
        })
        .await?;
    println!("{}", render_request(&request)?);
    maybe_broadcast(&config, &args.send, request).await
}

pub async fn run_build_sell(args: BuildSellArgs) -> Result<()> {
    let token = parse_address(&args.token)?;
    let token_in = parse_positive_wei(&args.token_in, "token_in")?;
    let min_eth_out = args
        .min_eth_out
        .as_deref()
        .map(|v| parse_wei(v, "min_eth_out"))
        .transpose()?;
    let config = args.engine.resolve()?;
    let builder = connect(&config)?;
    let request = builder
        .build_sell(SellArgs {
            token,
            token_in,
            min_eth_out,
        })
        .await?;
    println!("{}", render_request(&request)?);
    maybe_broadcast(&config, &args.send, request).await
}

async fn maybe_broadcast(
    config: &EngineConfig,
    send: &BroadcastArgs,
    request: TradeRequest,
) -> Result<()> {
    if !send.broadcast {
        return Ok(());
    }
    let pk = send
        .private_key
        .as_ref()
        .context("--private-key is required with --broadcast")?;
    let transport = AlloyHttpTransport::new(&config.rpc_url)?
        .with_signer(pk)
        .await
        .context("attach signer")?;
    if let Some(sender) = transport.signer_address() {
        info!("broadcasting from {sender}");
    }
    let tx_hash = transport.send(request.into_call()).await?;
    println!("tx hash: {}", format_tx_hash(tx_hash.into()));
    Ok(())
}
