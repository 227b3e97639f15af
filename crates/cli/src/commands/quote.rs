//! Offline quotes from reserves supplied on the command line.

use alloy_primitives::{Address, U256};
use anyhow::Result;
use clap::Args;
use curve_sdk::{
    config::DEFAULT_SELL_SLIPPAGE_BPS, price_impact_bps, quote_buy, quote_sell_local,
    slippage_floor, BondingCurveState,
};

use super::common::{parse_positive_wei, parse_wei};

#[derive(Clone, Debug, Args)]
pub struct ReserveArgs {
    /// Virtual token reserves (wei).
    #[arg(long, value_name = "WEI")]
    pub virtual_token_reserves: String,
    /// Virtual ETH reserves (wei).
    #[arg(long, value_name = "WEI")]
    pub virtual_eth_reserves: String,
}

impl ReserveArgs {
    fn state(&self) -> Result<BondingCurveState> {
        Ok(BondingCurveState {
            token_mint: Address::repeat_byte(0x01),
            virtual_token_reserves: parse_wei(
                &self.virtual_token_reserves,
                "virtual_token_reserves",
            )?,
            virtual_eth_reserves: parse_wei(&self.virtual_eth_reserves, "virtual_eth_reserves")?,
            real_token_reserves: U256::ZERO,
            real_eth_reserves: U256::ZERO,
            token_total_supply: U256::ZERO,
            mcap_limit: U256::ZERO,
            complete: false,
        })
    }
}

#[derive(Clone, Debug, Args)]
pub struct QuoteBuyArgs {
    #[command(flatten)]
    pub reserves: ReserveArgs,
    /// ETH paid (wei).
    #[arg(long, value_name = "WEI")]
    pub eth_in: String,
}

#[derive(Clone, Debug, Args)]
pub struct QuoteSellArgs {
    #[command(flatten)]
    pub reserves: ReserveArgs,
    /// Tokens sold (wei).
    #[arg(long, value_name = "WEI")]
    pub token_in: String,
    /// Slippage used for the printed default floor.
    #[arg(long, default_value_t = DEFAULT_SELL_SLIPPAGE_BPS, value_name = "BPS")]
    pub slippage_bps: u16,
}

pub fn run_buy(args: QuoteBuyArgs) -> Result<()> {
    let state = args.reserves.state()?;
    let eth_in = parse_wei(&args.eth_in, "eth_in")?;
    let tokens_out = quote_buy(&state, eth_in)?;
    let after = state.after_buy(eth_in, tokens_out)?;
    println!("tokens_out={tokens_out}");
    println!("price_impact_bps={:.2}", price_impact_bps(&state, &after));
    Ok(())
}

pub fn run_sell(args: QuoteSellArgs) -> Result<()> {
    let state = args.reserves.state()?;
    let token_in = parse_positive_wei(&args.token_in, "token_in")?;
    let eth_out = quote_sell_local(&state, token_in)?;
    let after = state.after_sell(token_in, eth_out)?;
    println!("eth_out={eth_out}");
    println!("min_eth_out={}", slippage_floor(eth_out, args.slippage_bps));
    println!("price_impact_bps={:.2}", price_impact_bps(&state, &after));
    Ok(())
}
