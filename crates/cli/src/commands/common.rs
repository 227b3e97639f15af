use std::path::PathBuf;

use alloy_primitives::{Address, U256};
use anyhow::{anyhow, ensure, Context, Result};
use clap::{Args, ValueEnum};
use curve_sdk::{parse_token_address, EngineConfig, QuoteSource, TradeRequest, TxHash};

use crate::server::TransactionRequestBody;

/// Engine settings shared by every networked subcommand.
#[derive(Clone, Debug, Default, Args)]
pub struct EngineArgs {
    /// JSON engine config; flags below override its fields.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Curve contract address.
    #[arg(long, value_name = "HEX40")]
    pub curve: Option<String>,
    /// EVM JSON-RPC endpoint.
    #[arg(long)]
    pub rpc_url: Option<String>,
    /// Where sell quotes come from.
    #[arg(long, value_enum)]
    pub sell_quote: Option<QuoteSourceArg>,
    /// Default sell slippage in basis points when no explicit floor is given.
    #[arg(long, value_name = "BPS")]
    pub slippage_bps: Option<u16>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum QuoteSourceArg {
    OnChain,
    Local,
}

impl From<QuoteSourceArg> for QuoteSource {
    fn from(value: QuoteSourceArg) -> Self {
        match value {
            QuoteSourceArg::OnChain => QuoteSource::OnChain,
            QuoteSourceArg::Local => QuoteSource::Local,
        }
    }
}

impl EngineArgs {
    pub fn resolve(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("load config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(curve) = &self.curve {
            config.curve = parse_address(curve)?;
        }
        if let Some(rpc) = &self.rpc_url {
            config.rpc_url = rpc.clone();
        }
        if let Some(source) = self.sell_quote {
            config.sell_quote_source = source.into();
        }
        if let Some(bps) = self.slippage_bps {
            config.default_sell_slippage_bps = bps;
        }
        config
            .validate()
            .context("engine config requires --curve (or a config file) and bps <= 10000")?;
        Ok(config)
    }
}

pub fn parse_address(value: &str) -> Result<Address> {
    parse_token_address(value).map_err(|err| anyhow!("{err}: {value}"))
}

/// Decimal wei amount.
pub fn parse_wei(value: &str, label: &str) -> Result<U256> {
    let amount = U256::from_str_radix(value.trim(), 10)
        .map_err(|e| anyhow!("decode {label} as decimal wei: {e}"))?;
    Ok(amount)
}

pub fn parse_positive_wei(value: &str, label: &str) -> Result<U256> {
    let amount = parse_wei(value, label)?;
    ensure!(!amount.is_zero(), "{label} must be greater than zero");
    Ok(amount)
}

pub fn format_tx_hash(hash: TxHash) -> String {
    hash.to_string()
}

/// Transaction request as pretty JSON, amounts in decimal wei.
pub fn render_request(request: &TradeRequest) -> Result<String> {
    serde_json::to_string_pretty(&TransactionRequestBody::from(request))
        .context("encode transaction request")
}
