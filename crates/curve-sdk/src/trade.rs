//! Trade builder: reads fresh reserves, quotes, applies guards and emits a
//! ready-to-sign request. Signing and broadcasting belong to the caller.

use alloy_primitives::{Address, Bytes, U256};
use log::info;
use serde::Serialize;

use crate::{
    config::{EngineConfig, QuoteSource},
    contracts::{encode_buy, encode_sell},
    error::{ErrorCode, Result},
    quote::{price_and_metrics, quote_buy, quote_sell, CurveMetrics},
    reader::ReserveReader,
    state::BondingCurveState,
    transport::{EvmCall, EvmViewTransport},
};

const BPS_DENOMINATOR: u64 = 10_000;

/// Unsigned transaction for the curve contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRequest {
    pub to: Address,
    pub data: Bytes,
    /// ETH attached; zero for sells.
    pub value: U256,
    pub gas: u64,
    /// Floor enforced for this trade: the caller's value, or the derived default.
    pub min_out: U256,
    /// Amount the quote engine expects the trade to return.
    pub quoted_out: U256,
}

impl TradeRequest {
    pub fn into_call(self) -> EvmCall {
        EvmCall::new(self.to, self.data, self.value).with_gas_limit(self.gas)
    }
}

#[derive(Clone, Debug)]
pub struct BuyArgs {
    pub token: Address,
    pub eth_in: U256,
    pub min_tokens_out: Option<U256>,
}

#[derive(Clone, Debug)]
pub struct SellArgs {
    pub token: Address,
    pub token_in: U256,
    /// When `None`, the floor is `eth_out` less the configured slippage (5% by default).
    pub min_eth_out: Option<U256>,
}

/// `floor(amount * (10_000 - bps) / 10_000)` without intermediate overflow.
pub fn slippage_floor(amount: U256, bps: u16) -> U256 {
    let denom = U256::from(BPS_DENOMINATOR);
    let keep = U256::from(BPS_DENOMINATOR.saturating_sub(u64::from(bps)));
    amount / denom * keep + amount % denom * keep / denom
}

#[derive(Clone)]
pub struct TradeBuilder<T: EvmViewTransport> {
    reader: ReserveReader<T>,
    buy_gas_limit: u64,
    sell_gas_limit: u64,
    default_sell_slippage_bps: u16,
    sell_quote_source: QuoteSource,
}

impl<T: EvmViewTransport> TradeBuilder<T> {
    pub fn new(config: &EngineConfig, transport: T) -> Self {
        Self {
            reader: ReserveReader::new(config.curve, transport),
            buy_gas_limit: config.buy_gas_limit,
            sell_gas_limit: config.sell_gas_limit,
            default_sell_slippage_bps: config.default_sell_slippage_bps,
            sell_quote_source: config.sell_quote_source,
        }
    }

    pub fn curve(&self) -> Address {
        self.reader.client().address()
    }

    /// Slippage applied to sells that carry no explicit floor.
    pub fn default_sell_slippage_bps(&self) -> u16 {
        self.default_sell_slippage_bps
    }

    /// Fresh state plus display metrics for `token`.
    pub async fn price(&self, token: Address) -> Result<(BondingCurveState, CurveMetrics)> {
        let state = self.tracked_state(token).await?;
        let metrics = price_and_metrics(&state)?;
        Ok((state, metrics))
    }

    /// `buy(token, tokens_out, maxEthCost = eth_in)` with `value = eth_in`.
    pub async fn build_buy(&self, args: BuyArgs) -> Result<TradeRequest> {
        if args.eth_in.is_zero() {
            return Err(ErrorCode::InvalidInput);
        }
        let state = self.tradeable_state(args.token).await?;
        let tokens_out = quote_buy(&state, args.eth_in)?;
        if tokens_out.is_zero() {
            return Err(ErrorCode::InvalidQuote);
        }
        if let Some(min) = args.min_tokens_out {
            if tokens_out < min {
                info!(
                    "build_buy {}: quoted {tokens_out} below floor {min}",
                    args.token
                );
                return Err(ErrorCode::SlippageExceeded);
            }
        }
        info!(
            "build_buy {}: eth_in={} tokens_out={tokens_out}",
            args.token, args.eth_in
        );
        Ok(TradeRequest {
            to: self.curve(),
            data: encode_buy(args.token, tokens_out, args.eth_in),
            value: args.eth_in,
            gas: self.buy_gas_limit,
            min_out: args.min_tokens_out.unwrap_or(tokens_out),
            quoted_out: tokens_out,
        })
    }

    /// `sell(token, token_in, minEthOut)` with no ETH attached.
    pub async fn build_sell(&self, args: SellArgs) -> Result<TradeRequest> {
        if args.token_in.is_zero() {
            return Err(ErrorCode::InvalidInput);
        }
        let state = self.tradeable_state(args.token).await?;
        let eth_out = quote_sell(
            self.reader.client(),
            args.token,
            &state,
            args.token_in,
            self.sell_quote_source,
        )
        .await?;
        if eth_out.is_zero() {
            info!(
                "build_sell {}: {} tokens quote to zero eth",
                args.token, args.token_in
            );
            return Err(ErrorCode::InvalidQuote);
        }
        let min_eth_out = args
            .min_eth_out
            .unwrap_or_else(|| slippage_floor(eth_out, self.default_sell_slippage_bps));
        if eth_out < min_eth_out {
            info!(
                "build_sell {}: quoted {eth_out} below floor {min_eth_out}",
                args.token
            );
            return Err(ErrorCode::SlippageExceeded);
        }
        info!(
            "build_sell {}: token_in={} eth_out={eth_out} min_eth_out={min_eth_out}",
            args.token, args.token_in
        );
        Ok(TradeRequest {
            to: self.curve(),
            data: encode_sell(args.token, args.token_in, min_eth_out),
            value: U256::ZERO,
            gas: self.sell_gas_limit,
            min_out: min_eth_out,
            quoted_out: eth_out,
        })
    }

    async fn tracked_state(&self, token: Address) -> Result<BondingCurveState> {
        self.reader
            .get_bonding_curve_state(token)
            .await?
            .ok_or(ErrorCode::TokenNotFound)
    }

    async fn tradeable_state(&self, token: Address) -> Result<BondingCurveState> {
        let state = self.tracked_state(token).await?;
        if state.complete {
            info!("token {token} graduated; rejecting curve trade");
            return Err(ErrorCode::CurveGraduated);
        }
        Ok(state)
    }
}
