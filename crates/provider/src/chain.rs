use alloy_primitives::{ChainId, TxHash};
use serde::{Deserialize, Serialize};

use crate::types::{AddChainParams, NativeCurrency, SwitchChainParams};

/// Everything the wallet needs to know about the target network: the id to
/// switch to and, should the wallet not know the chain, the full EIP-3085
/// registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    pub chain_id: ChainId,
    pub name: String,
    pub native_currency: NativeCurrency,
    pub rpc_url: String,
    pub explorer_url: String,
}

impl ChainDescriptor {
    /// The Polygon Mumbai testnet, where the badge and token contracts are
    /// deployed.
    pub fn polygon_mumbai() -> Self {
        Self {
            chain_id: 80001,
            name: "Polygon Mumbai Testnet".into(),
            native_currency: NativeCurrency {
                name: "MATIC".into(),
                symbol: "MATIC".into(),
                decimals: 18,
            },
            rpc_url: "https://rpc-mumbai.maticvigil.com/".into(),
            explorer_url: "https://mumbai.polygonscan.com/".into(),
        }
    }

    /// The chain id as the `0x`-prefixed hex quantity wallet calls expect.
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    /// Parameters for `wallet_switchEthereumChain`.
    pub fn switch_params(&self) -> SwitchChainParams {
        SwitchChainParams { chain_id: self.chain_id_hex() }
    }

    /// Parameters for `wallet_addEthereumChain` (EIP-3085).
    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.chain_id_hex(),
            chain_name: self.name.clone(),
            native_currency: self.native_currency.clone(),
            rpc_urls: vec![self.rpc_url.clone()],
            block_explorer_urls: vec![self.explorer_url.clone()],
        }
    }

    /// Block-explorer deep link for a submitted transaction.
    pub fn explorer_tx_url(&self, hash: TxHash) -> String {
        format!("{}/tx/{hash}", self.explorer_url.trim_end_matches('/'))
    }
}
