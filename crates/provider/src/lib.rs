//! # Wallet provider adapter for skillchain
//!
//! This crate wraps a browser-injected wallet following:
//! - [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193): Ethereum Provider JavaScript API
//! - [EIP-3085](https://eips.ethereum.org/EIPS/eip-3085): `wallet_addEthereumChain`
//! - JSON-RPC 2.0 for the request/response shapes
//!
//! The injected provider is modeled as a [`WalletTransport`] so the host page
//! (or a test) supplies the actual `request` implementation; everything in
//! here is a thin, typed layer over that seam:
//! 1. [`WalletProvider::connect`] requests account authorization
//! 2. [`WalletProvider::ensure_chain`] switches to the target network,
//!    registering it with the wallet once if it is unknown
//! 3. [`WalletProvider::invoke`] estimates gas, submits a contract call and
//!    awaits the receipt
//!
//! Provider notifications (`accountsChanged`, `chainChanged`) surface as a
//! [`WalletEvent`] stream; dropping the stream releases the subscription.

mod adapter;
mod call;
mod chain;
mod error;
mod transport;
mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use adapter::WalletProvider;
pub use call::ContractCall;
pub use chain::ChainDescriptor;
pub use error::{codes, ProviderError, TransportError};
pub use transport::WalletTransport;
pub use types::{
    AddChainParams, NativeCurrency, ProviderRequest, SwitchChainParams, TransactionParams,
    TransactionReceipt, WalletEvent,
};
