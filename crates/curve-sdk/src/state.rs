//! Bonding-curve reserve snapshot as returned by the curve contract.

use alloy_primitives::{Address, U256, U512};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, Result};

/// Immutable per-call view of a token's curve.
///
/// All amounts are wei-scale integers. `virtual_token_reserves *
/// virtual_eth_reserves` is the constant-product invariant `k`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BondingCurveState {
    pub token_mint: Address,
    pub virtual_token_reserves: U256,
    pub virtual_eth_reserves: U256,
    pub real_token_reserves: U256,
    pub real_eth_reserves: U256,
    pub token_total_supply: U256,
    pub mcap_limit: U256,
    pub complete: bool,
}

impl BondingCurveState {
    /// The contract reports a zero mint for tokens it never registered.
    pub fn is_tracked(&self) -> bool {
        !self.token_mint.is_zero()
    }

    /// Rejects graduated curves and curves without virtual liquidity.
    pub fn ensure_tradeable(&self) -> Result<()> {
        if self.complete {
            return Err(ErrorCode::CurveGraduated);
        }
        if self.virtual_token_reserves.is_zero() || self.virtual_eth_reserves.is_zero() {
            return Err(ErrorCode::EmptyReserves);
        }
        Ok(())
    }

    /// Exact invariant `k`, widened so the product can never overflow.
    pub fn k(&self) -> U512 {
        U512::from(self.virtual_token_reserves) * U512::from(self.virtual_eth_reserves)
    }

    /// Snapshot after `eth_in` bought `tokens_out`.
    pub fn after_buy(&self, eth_in: U256, tokens_out: U256) -> Result<Self> {
        let mut next = self.clone();
        next.virtual_eth_reserves = checked(self.virtual_eth_reserves.checked_add(eth_in))?;
        next.virtual_token_reserves =
            checked(self.virtual_token_reserves.checked_sub(tokens_out))?;
        next.real_eth_reserves = checked(self.real_eth_reserves.checked_add(eth_in))?;
        next.real_token_reserves = self.real_token_reserves.saturating_sub(tokens_out);
        Ok(next)
    }

    /// Snapshot after `token_in` was sold for `eth_out`.
    pub fn after_sell(&self, token_in: U256, eth_out: U256) -> Result<Self> {
        let mut next = self.clone();
        next.virtual_token_reserves =
            checked(self.virtual_token_reserves.checked_add(token_in))?;
        next.virtual_eth_reserves = checked(self.virtual_eth_reserves.checked_sub(eth_out))?;
        next.real_token_reserves = checked(self.real_token_reserves.checked_add(token_in))?;
        next.real_eth_reserves = self.real_eth_reserves.saturating_sub(eth_out);
        Ok(next)
    }
}

fn checked(value: Option<U256>) -> Result<U256> {
    value.ok_or(ErrorCode::InvalidQuote)
}
