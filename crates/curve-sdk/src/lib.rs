//! Bonding-curve pricing and trade construction for creator coins.
//!
//! Reads a token's constant-product curve from the curve contract, quotes
//! buys and sells against it and builds unsigned `buy`/`sell` transactions
//! with slippage floors. Every call re-reads the chain; nothing is cached.

pub mod config;
pub mod contracts;
pub mod error;
pub mod quote;
pub mod reader;
pub mod state;
pub mod trade;
pub mod transport;

pub use config::{EngineConfig, QuoteSource};
pub use contracts::{BondingCurveClient, TxHash};
pub use error::{ErrorCode, Result};
pub use quote::{
    price_and_metrics, price_impact_bps, quote_buy, quote_sell, quote_sell_local, CurveMetrics,
};
pub use reader::{parse_token_address, ReserveReader};
pub use state::BondingCurveState;
pub use trade::{slippage_floor, BuyArgs, SellArgs, TradeBuilder, TradeRequest};
pub use transport::{AlloyHttpTransport, EvmCall, EvmTransport, EvmViewTransport};

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloy_primitives::{address, Address, Bytes, U256};
    use alloy_sol_types::SolValue;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    pub const CURVE: Address = address!("1111111111111111111111111111111111111111");
    pub const TOKEN: Address = address!("2222222222222222222222222222222222222222");

    const E18: u128 = 1_000_000_000_000_000_000;

    /// 1B virtual tokens against 30 ETH, 800M real tokens left, 100 ETH cap.
    pub fn sample_state() -> BondingCurveState {
        BondingCurveState {
            token_mint: TOKEN,
            virtual_token_reserves: U256::from(1_000_000_000u128 * E18),
            virtual_eth_reserves: U256::from(30u128 * E18),
            real_token_reserves: U256::from(800_000_000u128 * E18),
            real_eth_reserves: U256::ZERO,
            token_total_supply: U256::from(1_000_000_000u128 * E18),
            mcap_limit: U256::from(100u128 * E18),
            complete: false,
        }
    }

    pub fn encode_state(state: &BondingCurveState) -> Bytes {
        (
            state.token_mint,
            state.virtual_token_reserves,
            state.virtual_eth_reserves,
            state.real_token_reserves,
            state.real_eth_reserves,
            state.token_total_supply,
            state.mcap_limit,
            state.complete,
        )
            .abi_encode_params()
            .into()
    }

    pub fn encode_eth_cost(value: U256) -> Bytes {
        value.abi_encode().into()
    }

    /// Records view calls and replays queued responses, then the fallback.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        view_calls: Arc<Mutex<Vec<EvmCall>>>,
        queued: Arc<Mutex<VecDeque<Bytes>>>,
        fallback: Arc<Mutex<Option<Bytes>>>,
        fail_view: Arc<Mutex<VecDeque<bool>>>,
    }

    impl MockTransport {
        pub fn with_view_response(bytes: Bytes) -> Self {
            let transport = Self::default();
            transport.set_view_response(bytes);
            transport
        }

        pub fn set_view_response(&self, bytes: Bytes) {
            *self.fallback.lock().unwrap() = Some(bytes);
        }

        pub fn push_view_response(&self, bytes: Bytes) {
            self.queued.lock().unwrap().push_back(bytes);
        }

        pub fn fail_next_view(&self) {
            self.fail_view.lock().unwrap().push_back(true);
        }

        pub fn view_calls(&self) -> Vec<EvmCall> {
            self.view_calls.lock().unwrap().clone()
        }
    }

    impl EvmViewTransport for MockTransport {
        async fn call_view(&self, call: EvmCall) -> Result<Bytes> {
            self.view_calls.lock().unwrap().push(call);
            if self.fail_view.lock().unwrap().pop_front().unwrap_or(false) {
                return Err(ErrorCode::RpcFailure);
            }
            if let Some(next) = self.queued.lock().unwrap().pop_front() {
                return Ok(next);
            }
            self.fallback
                .lock()
                .unwrap()
                .clone()
                .ok_or(ErrorCode::RpcFailure)
        }
    }

    #[tokio::test]
    async fn decoded_state_matches_encoded_tuple() {
        let transport = MockTransport::with_view_response(encode_state(&sample_state()));
        let client = BondingCurveClient::new(CURVE, transport);
        let state = client.bonding_curve(TOKEN).await.expect("state");
        assert_eq!(state, sample_state());
    }

    #[tokio::test]
    async fn concurrent_reads_each_hit_the_chain() {
        let transport = MockTransport::with_view_response(encode_state(&sample_state()));
        let reader = ReserveReader::new(CURVE, transport.clone());
        let (a, b) = tokio::join!(
            reader.get_bonding_curve_state(TOKEN),
            reader.get_bonding_curve_state(TOKEN)
        );
        assert_eq!(a, b);
        assert_eq!(transport.view_calls().len(), 2);
    }
}
