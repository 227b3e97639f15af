use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use log::error;

use crate::{
    error::{ErrorCode, Result},
    state::BondingCurveState,
    transport::{EvmCall, EvmViewTransport},
};

sol! {
    #[allow(non_camel_case_types)]
    contract BondingCurve {
        function bondingCurve(address token) view returns (
            address tokenMint,
            uint256 virtualTokenReserves,
            uint256 virtualEthReserves,
            uint256 realTokenReserves,
            uint256 realEthReserves,
            uint256 tokenTotalSupply,
            uint256 mcapLimit,
            bool complete
        );

        function calculateEthCost(address token, uint256 amount) view returns (uint256);

        function buy(address token, uint256 amount, uint256 maxEthCost) payable;
        function sell(address token, uint256 amount, uint256 minEthOut);
    }
}

impl From<BondingCurve::bondingCurveReturn> for BondingCurveState {
    fn from(value: BondingCurve::bondingCurveReturn) -> Self {
        Self {
            token_mint: value.tokenMint,
            virtual_token_reserves: value.virtualTokenReserves,
            virtual_eth_reserves: value.virtualEthReserves,
            real_token_reserves: value.realTokenReserves,
            real_eth_reserves: value.realEthReserves,
            token_total_supply: value.tokenTotalSupply,
            mcap_limit: value.mcapLimit,
            complete: value.complete,
        }
    }
}

/// Calldata for `buy(token, amount, maxEthCost)`.
pub fn encode_buy(token: Address, amount: U256, max_eth_cost: U256) -> Bytes {
    BondingCurve::buyCall {
        token,
        amount,
        maxEthCost: max_eth_cost,
    }
    .abi_encode()
    .into()
}

/// Calldata for `sell(token, amount, minEthOut)`.
pub fn encode_sell(token: Address, amount: U256, min_eth_out: U256) -> Bytes {
    BondingCurve::sellCall {
        token,
        amount,
        minEthOut: min_eth_out,
    }
    .abi_encode()
    .into()
}

/// Read-side client for the curve contract.
#[derive(Clone)]
pub struct BondingCurveClient<T: EvmViewTransport> {
    curve: Address,
    transport: T,
}

impl<T: EvmViewTransport> BondingCurveClient<T> {
    pub fn new(curve: Address, transport: T) -> Self {
        Self { curve, transport }
    }

    pub fn address(&self) -> Address {
        self.curve
    }

    /// Raw `bondingCurve(token)` snapshot; a zero mint means the token is untracked.
    pub async fn bonding_curve(&self, token: Address) -> Result<BondingCurveState> {
        let calldata = BondingCurve::bondingCurveCall { token }.abi_encode();
        let raw = self.view(calldata).await?;
        let decoded = BondingCurve::bondingCurveCall::abi_decode_returns(&raw, true)
            .map_err(|err| {
                error!(
                    "bondingCurve({token}) on {} returned undecodable data ({} bytes): {err}",
                    self.curve,
                    raw.len()
                );
                ErrorCode::DecodeFailure
            })?;
        Ok(decoded.into())
    }

    /// Contract-side ETH quote for `amount` tokens, used as the sell price source.
    pub async fn calculate_eth_cost(&self, token: Address, amount: U256) -> Result<U256> {
        let calldata = BondingCurve::calculateEthCostCall { token, amount }.abi_encode();
        let raw = self.view(calldata).await?;
        let decoded = BondingCurve::calculateEthCostCall::abi_decode_returns(&raw, true)
            .map_err(|err| {
                error!(
                    "calculateEthCost({token}, {amount}) on {} returned undecodable data: {err}",
                    self.curve
                );
                ErrorCode::DecodeFailure
            })?;
        Ok(decoded._0)
    }

    async fn view(&self, calldata: Vec<u8>) -> Result<Bytes> {
        let call = EvmCall::new(self.curve, Bytes::from(calldata), U256::ZERO);
        self.transport.call_view(call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;

    fn selector(signature: &str) -> [u8; 4] {
        let hash = keccak256(signature.as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    #[test]
    fn selectors_match_canonical_signatures() {
        assert_eq!(
            BondingCurve::bondingCurveCall::SELECTOR,
            selector("bondingCurve(address)")
        );
        assert_eq!(
            BondingCurve::calculateEthCostCall::SELECTOR,
            selector("calculateEthCost(address,uint256)")
        );
        assert_eq!(
            BondingCurve::buyCall::SELECTOR,
            selector("buy(address,uint256,uint256)")
        );
        assert_eq!(
            BondingCurve::sellCall::SELECTOR,
            selector("sell(address,uint256,uint256)")
        );
    }

    #[test]
    fn sell_calldata_layout() {
        let token = Address::repeat_byte(0xAB);
        let data = encode_sell(token, U256::from(7u64), U256::from(3u64));
        assert_eq!(data.len(), 4 + 3 * 32);
        assert_eq!(&data[..4], &selector("sell(address,uint256,uint256)"));
        assert_eq!(&data[16..36], token.as_slice());
        assert_eq!(data[67], 7);
        assert_eq!(data[99], 3);
    }
}
