use alloy_primitives::{Address, Bytes, ChainId, TxHash, U64, U256};
use serde::{Deserialize, Serialize};

/// Standard EIP-1193 provider requests used by this dApp.
/// Reference: <https://eips.ethereum.org/EIPS/eip-1193>
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum ProviderRequest {
    #[serde(rename = "eth_requestAccounts")]
    RequestAccounts,

    #[serde(rename = "eth_accounts")]
    Accounts,

    #[serde(rename = "eth_chainId")]
    ChainId,

    #[serde(rename = "wallet_switchEthereumChain")]
    SwitchChain([SwitchChainParams; 1]),

    #[serde(rename = "wallet_addEthereumChain")]
    AddChain([AddChainParams; 1]),

    #[serde(rename = "eth_estimateGas")]
    EstimateGas([TransactionParams; 1]),

    #[serde(rename = "eth_sendTransaction")]
    SendTransaction([TransactionParams; 1]),

    #[serde(rename = "eth_getTransactionReceipt")]
    GetTransactionReceipt([TxHash; 1]),
}

impl ProviderRequest {
    /// The JSON-RPC method name of this request.
    pub fn method(&self) -> &'static str {
        match self {
            Self::RequestAccounts => "eth_requestAccounts",
            Self::Accounts => "eth_accounts",
            Self::ChainId => "eth_chainId",
            Self::SwitchChain(_) => "wallet_switchEthereumChain",
            Self::AddChain(_) => "wallet_addEthereumChain",
            Self::EstimateGas(_) => "eth_estimateGas",
            Self::SendTransaction(_) => "eth_sendTransaction",
            Self::GetTransactionReceipt(_) => "eth_getTransactionReceipt",
        }
    }
}

/// `wallet_switchEthereumChain` parameter object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChainParams {
    /// Target chain id as a `0x`-prefixed hex quantity.
    pub chain_id: String,
}

/// `wallet_addEthereumChain` parameter object (EIP-3085).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

/// Native currency descriptor used when registering a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Transaction parameter object for `eth_estimateGas` / `eth_sendTransaction`,
/// in the camelCase hex shape wallets expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionParams {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
}

/// The subset of a transaction receipt this dApp consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<U64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<U64>,
}

/// Asynchronous notifications pushed by the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The set of authorized accounts changed; an empty list means the user
    /// disconnected the site.
    AccountsChanged(Vec<Address>),
    /// The wallet's active chain changed.
    ChainChanged(ChainId),
}
