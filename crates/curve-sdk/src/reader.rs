//! Reserve reader: one `bondingCurve(token)` view call per request.

use std::str::FromStr;

use alloy_primitives::Address;
use log::debug;

use crate::{
    contracts::BondingCurveClient,
    error::{ErrorCode, Result},
    state::BondingCurveState,
    transport::EvmViewTransport,
};

/// Parses a 0x-prefixed account address, rejecting the zero address.
pub fn parse_token_address(value: &str) -> Result<Address> {
    let address = Address::from_str(value.trim()).map_err(|_| ErrorCode::InvalidAddress)?;
    if address.is_zero() {
        return Err(ErrorCode::InvalidAddress);
    }
    Ok(address)
}

#[derive(Clone)]
pub struct ReserveReader<T: EvmViewTransport> {
    client: BondingCurveClient<T>,
}

impl<T: EvmViewTransport> ReserveReader<T> {
    pub fn new(curve: Address, transport: T) -> Self {
        Self {
            client: BondingCurveClient::new(curve, transport),
        }
    }

    pub fn client(&self) -> &BondingCurveClient<T> {
        &self.client
    }

    /// Current curve state for `token`, or `None` when the curve never registered it.
    ///
    /// Nothing is cached; concurrent callers each observe whatever the chain
    /// returned to them.
    pub async fn get_bonding_curve_state(
        &self,
        token: Address,
    ) -> Result<Option<BondingCurveState>> {
        if token.is_zero() {
            return Err(ErrorCode::InvalidAddress);
        }
        let state = self.client.bonding_curve(token).await?;
        if !state.is_tracked() {
            debug!("token {token} not tracked by curve {}", self.client.address());
            return Ok(None);
        }
        debug!(
            "curve state {token}: vT={} vE={} complete={}",
            state.virtual_token_reserves, state.virtual_eth_reserves, state.complete
        );
        Ok(Some(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{encode_state, sample_state, MockTransport, CURVE, TOKEN};

    #[test]
    fn parses_and_validates_addresses() {
        assert_eq!(
            parse_token_address(" 0x2222222222222222222222222222222222222222 "),
            Ok(TOKEN)
        );
        assert_eq!(
            parse_token_address("0x0000000000000000000000000000000000000000"),
            Err(ErrorCode::InvalidAddress)
        );
        assert_eq!(parse_token_address("0x1234"), Err(ErrorCode::InvalidAddress));
        assert_eq!(parse_token_address("creator-coin"), Err(ErrorCode::InvalidAddress));
    }

    #[tokio::test]
    async fn returns_decoded_state() {
        let transport = MockTransport::with_view_response(encode_state(&sample_state()));
        let reader = ReserveReader::new(CURVE, transport.clone());
        let state = reader.get_bonding_curve_state(TOKEN).await.unwrap();
        assert_eq!(state, Some(sample_state()));

        let calls = transport.view_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to, CURVE);
    }

    #[tokio::test]
    async fn zero_mint_is_not_found() {
        let mut state = sample_state();
        state.token_mint = Address::ZERO;
        let transport = MockTransport::with_view_response(encode_state(&state));
        let reader = ReserveReader::new(CURVE, transport);
        assert_eq!(reader.get_bonding_curve_state(TOKEN).await, Ok(None));
    }

    #[tokio::test]
    async fn distinguishes_rpc_and_decode_failures() {
        let transport = MockTransport::default();
        transport.fail_next_view();
        let reader = ReserveReader::new(CURVE, transport.clone());
        let err = reader.get_bonding_curve_state(TOKEN).await.unwrap_err();
        assert_eq!(err, ErrorCode::RpcFailure);
        assert!(err.is_retryable());

        transport.set_view_response(vec![0u8; 7].into());
        let err = reader.get_bonding_curve_state(TOKEN).await.unwrap_err();
        assert_eq!(err, ErrorCode::DecodeFailure);
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn zero_token_skips_rpc() {
        let transport = MockTransport::default();
        let reader = ReserveReader::new(CURVE, transport.clone());
        assert_eq!(
            reader.get_bonding_curve_state(Address::ZERO).await,
            Err(ErrorCode::InvalidAddress)
        );
        assert!(transport.view_calls().is_empty());
    }
}
