//! Constant-product quote engine.
//!
//! Trade-affecting results (`tokens_out`, `eth_out`) are computed with exact
//! integers, widening to 512 bits for the invariant. Display metrics live in
//! [`CurveMetrics`] and are the only place floating point is used.

use alloy_primitives::{ruint::UintTryFrom, Address, U256, U512};
use log::debug;
use serde::Serialize;

use crate::{
    config::QuoteSource,
    contracts::BondingCurveClient,
    error::{ErrorCode, Result},
    state::BondingCurveState,
    transport::EvmViewTransport,
};

const WEI_PER_ETH: f64 = 1e18;

/// Tokens received for `eth_in` wei.
///
/// `new_token_reserves = k / (virtual_eth + eth_in)` truncates toward zero,
/// so the trader never receives more than the continuous curve would give.
pub fn quote_buy(state: &BondingCurveState, eth_in: U256) -> Result<U256> {
    state.ensure_tradeable()?;
    if eth_in.is_zero() {
        return Ok(U256::ZERO);
    }
    let virtual_tokens = U512::from(state.virtual_token_reserves);
    let new_eth = U512::from(state.virtual_eth_reserves) + U512::from(eth_in);
    let new_tokens = state.k() / new_eth;
    if new_tokens.is_zero() || new_tokens >= virtual_tokens {
        return Err(ErrorCode::InvalidQuote);
    }
    narrow(virtual_tokens - new_tokens)
}

/// ETH received for selling `token_in` tokens, computed off-chain.
///
/// Solves `k = (virtual_tokens + token_in) * new_eth` with the division
/// rounded up, so `eth_out` is rounded down.
pub fn quote_sell_local(state: &BondingCurveState, token_in: U256) -> Result<U256> {
    state.ensure_tradeable()?;
    if token_in.is_zero() {
        return Ok(U256::ZERO);
    }
    let virtual_eth = U512::from(state.virtual_eth_reserves);
    let new_tokens = U512::from(state.virtual_token_reserves) + U512::from(token_in);
    let k = state.k();
    let mut new_eth = k / new_tokens;
    if !(k % new_tokens).is_zero() {
        new_eth += U512::from(1u8);
    }
    if new_eth > virtual_eth {
        return Err(ErrorCode::InvalidQuote);
    }
    narrow(virtual_eth - new_eth)
}

/// ETH received for selling `token_in`, using the configured source.
///
/// [`QuoteSource::OnChain`] defers to the contract's `calculateEthCost` so the
/// quote matches deployed arithmetic bit for bit.
pub async fn quote_sell<T: EvmViewTransport>(
    client: &BondingCurveClient<T>,
    token: Address,
    state: &BondingCurveState,
    token_in: U256,
    source: QuoteSource,
) -> Result<U256> {
    state.ensure_tradeable()?;
    if token_in.is_zero() {
        return Ok(U256::ZERO);
    }
    match source {
        QuoteSource::Local => quote_sell_local(state, token_in),
        QuoteSource::OnChain => {
            let eth_out = client.calculate_eth_cost(token, token_in).await?;
            debug!("calculateEthCost({token}, {token_in}) = {eth_out}");
            if eth_out > state.virtual_eth_reserves {
                return Err(ErrorCode::InvalidQuote);
            }
            Ok(eth_out)
        }
    }
}

/// Display-only figures derived from a curve snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveMetrics {
    /// Spot price in ETH per token.
    pub price: f64,
    /// `price * total supply`, in ETH.
    pub market_cap: f64,
    /// Percentage towards `mcap_limit`, clamped to 100.
    pub bonding_progress: f64,
    /// `real_eth_reserves` in ETH. No trade ledger is kept at this layer, so
    /// accumulated curve liquidity stands in for volume.
    pub volume_proxy: f64,
}

pub fn price_and_metrics(state: &BondingCurveState) -> Result<CurveMetrics> {
    if state.virtual_token_reserves.is_zero() {
        return Err(ErrorCode::EmptyReserves);
    }
    let price = spot_price(state);
    let market_cap = price * to_f64(state.token_total_supply) / WEI_PER_ETH;
    Ok(CurveMetrics {
        price,
        market_cap,
        bonding_progress: bonding_progress(state),
        volume_proxy: to_f64(state.real_eth_reserves) / WEI_PER_ETH,
    })
}

/// Spot price before `before` and after `after`, in basis points.
pub fn price_impact_bps(before: &BondingCurveState, after: &BondingCurveState) -> f64 {
    if before.virtual_token_reserves.is_zero() || after.virtual_token_reserves.is_zero() {
        return 0.0;
    }
    let start = spot_price(before);
    if start == 0.0 {
        return 0.0;
    }
    (spot_price(after) - start) / start * 10_000.0
}

fn spot_price(state: &BondingCurveState) -> f64 {
    to_f64(state.virtual_eth_reserves) / to_f64(state.virtual_token_reserves)
}

fn bonding_progress(state: &BondingCurveState) -> f64 {
    if state.complete {
        return 100.0;
    }
    if state.real_token_reserves.is_zero() || state.mcap_limit.is_zero() {
        return 0.0;
    }
    let current_mcap = to_f64(state.virtual_eth_reserves) * to_f64(state.token_total_supply)
        / to_f64(state.real_token_reserves);
    (current_mcap / to_f64(state.mcap_limit) * 100.0).min(100.0)
}

fn to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, &limb| acc * 18_446_744_073_709_551_616.0 + limb as f64)
}

fn narrow(value: U512) -> Result<U256> {
    U256::uint_try_from(value).map_err(|_| ErrorCode::InvalidQuote)
}
