use std::{fs, path::Path};

use alloy_primitives::Address;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, Result};

/// Conservative gas budget attached to `buy` transactions.
pub const DEFAULT_BUY_GAS_LIMIT: u64 = 300_000;
/// Conservative gas budget attached to `sell` transactions.
pub const DEFAULT_SELL_GAS_LIMIT: u64 = 250_000;
/// Floor applied to sell quotes when the caller gives no `min_eth_out` (5%).
pub const DEFAULT_SELL_SLIPPAGE_BPS: u16 = 500;

/// Where sell quotes come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    /// `calculateEthCost` on the deployed curve.
    #[default]
    OnChain,
    /// Pure constant-product arithmetic, no extra RPC round trip.
    Local,
}

/// Engine settings, typically loaded from a JSON file and overridden by flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Curve (and router) contract receiving `buy`/`sell`.
    pub curve: Address,
    pub rpc_url: String,
    pub buy_gas_limit: u64,
    pub sell_gas_limit: u64,
    pub default_sell_slippage_bps: u16,
    pub sell_quote_source: QuoteSource,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            curve: Address::ZERO,
            rpc_url: "http://127.0.0.1:8545".into(),
            buy_gas_limit: DEFAULT_BUY_GAS_LIMIT,
            sell_gas_limit: DEFAULT_SELL_GAS_LIMIT,
            default_sell_slippage_bps: DEFAULT_SELL_SLIPPAGE_BPS,
            sell_quote_source: QuoteSource::OnChain,
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            warn!("config read error ({}): {err}", path.display());
            ErrorCode::InvalidInput
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|err| {
            warn!("config parse error ({}): {err}", path.display());
            ErrorCode::InvalidInput
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.curve.is_zero() {
            return Err(ErrorCode::InvalidAddress);
        }
        if self.default_sell_slippage_bps > 10_000
            || self.buy_gas_limit == 0
            || self.sell_gas_limit == 0
        {
            return Err(ErrorCode::InvalidInput);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"curve":"0x1111111111111111111111111111111111111111","sell_quote_source":"local"}"#,
        )
        .unwrap();
        assert_eq!(config.curve, Address::repeat_byte(0x11));
        assert_eq!(config.sell_quote_source, QuoteSource::Local);
        assert_eq!(config.default_sell_slippage_bps, 500);
        assert_eq!(config.buy_gas_limit, DEFAULT_BUY_GAS_LIMIT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_curve_is_rejected() {
        assert_eq!(EngineConfig::default().validate(), Err(ErrorCode::InvalidAddress));
        let config = EngineConfig {
            curve: Address::repeat_byte(0x11),
            default_sell_slippage_bps: 10_001,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ErrorCode::InvalidInput));
    }
}
