//! Transport abstractions for EVM RPC interactions.

use std::future::Future;

use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::eth::transaction::{TransactionInput, TransactionRequest};
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use log::{debug, warn};

use crate::error::{ErrorCode, Result};

/// Encoded EVM call that can be dispatched via a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvmCall {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas_limit: Option<u64>,
}

impl EvmCall {
    pub fn new(to: Address, data: impl Into<Bytes>, value: U256) -> Self {
        Self {
            to,
            data: data.into(),
            value,
            gas_limit: None,
        }
    }

    pub fn with_gas_limit(mut self, gas: u64) -> Self {
        self.gas_limit = Some(gas);
        self
    }
}

/// Abstraction over read-only `eth_call` style interactions.
///
/// Every quote or trade build awaits exactly one of these per chain read; no
/// state is cached between calls.
pub trait EvmViewTransport: Send + Sync {
    fn call_view(&self, call: EvmCall) -> impl Future<Output = Result<Bytes>> + Send;
}

/// Abstraction over sending signed EVM transactions.
pub trait EvmTransport: Send + Sync {
    fn send(&self, call: EvmCall) -> impl Future<Output = Result<B256>> + Send;
}

/// JSON-RPC transport backed by Alloy's provider stack.
///
/// Read-only by default; a local signer is only attached for callers that
/// broadcast on their own behalf.
#[derive(Clone)]
pub struct AlloyHttpTransport {
    rpc_url: reqwest::Url,
    wallet: Option<PrivateKeySigner>,
    default_gas: u64,
}

impl AlloyHttpTransport {
    /// Builds a read-only transport targeting `rpc_url`.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url = reqwest::Url::parse(rpc_url).map_err(|err| {
            warn!("transport init error (url parse): {err:?}");
            ErrorCode::InvalidInput
        })?;
        Ok(Self {
            rpc_url: url,
            wallet: None,
            default_gas: 300_000,
        })
    }

    /// Attaches a signer so [`EvmTransport::send`] becomes available.
    pub async fn with_signer(mut self, private_key_hex: &str) -> Result<Self> {
        let mut wallet: PrivateKeySigner = private_key_hex
            .parse()
            .map_err(|_| ErrorCode::InvalidInput)?;
        let provider = ProviderBuilder::new().on_http(self.rpc_url.clone());
        let chain_id = provider.get_chain_id().await.map_err(|err| {
            warn!("transport init error (chain_id): {err:?}");
            ErrorCode::RpcFailure
        })?;
        wallet.set_chain_id(Some(chain_id));
        self.wallet = Some(wallet);
        Ok(self)
    }

    pub fn with_default_gas(mut self, gas: u64) -> Self {
        self.default_gas = gas;
        self
    }

    pub fn signer_address(&self) -> Option<Address> {
        self.wallet.as_ref().map(|w| w.address())
    }

    fn build_transaction(&self, call: EvmCall) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .gas_limit(call.gas_limit.unwrap_or(self.default_gas))
            .input(TransactionInput::from(call.data.clone()))
            .value(call.value);
        if let Some(wallet) = &self.wallet {
            tx = tx.from(wallet.address());
        }
        tx.to = Some(alloy_primitives::TxKind::Call(call.to));
        tx
    }
}

impl EvmViewTransport for AlloyHttpTransport {
    async fn call_view(&self, call: EvmCall) -> Result<Bytes> {
        debug!("eth_call to={} bytes={}", call.to, call.data.len());
        let req = self.build_transaction(call);
        let provider = ProviderBuilder::new().on_http(self.rpc_url.clone());
        provider.call(&req).await.map_err(|err| {
            warn!("provider error (call_view): {err:?}");
            ErrorCode::RpcFailure
        })
    }
}

impl EvmTransport for AlloyHttpTransport {
    async fn send(&self, call: EvmCall) -> Result<B256> {
        let wallet = self.wallet.clone().ok_or(ErrorCode::InvalidInput)?;
        let tx = self.build_transaction(call);
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(EthereumWallet::new(wallet))
            .on_http(self.rpc_url.clone());
        let pending = provider.send_transaction(tx).await.map_err(|err| {
            warn!("provider error (send): {err:?}");
            ErrorCode::RpcFailure
        })?;
        Ok(*pending.tx_hash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_rpc_url() {
        assert_eq!(
            AlloyHttpTransport::new("not a url").err(),
            Some(ErrorCode::InvalidInput)
        );
    }

    #[test]
    fn read_only_transaction_has_no_sender() {
        let transport = AlloyHttpTransport::new("http://127.0.0.1:8545")
            .expect("url")
            .with_default_gas(123_456);
        let call = EvmCall::new(Address::repeat_byte(0x11), vec![1u8, 2, 3], U256::from(5u64));
        let tx = transport.build_transaction(call);
        assert_eq!(tx.from, None);
        assert_eq!(tx.gas, Some(123_456));
        assert_eq!(tx.value, Some(U256::from(5u64)));
        assert!(transport.signer_address().is_none());
    }
}
