use alloy_primitives::ChainId;
use serde::{Deserialize, Serialize};

/// Provider error codes defined by EIP-1193 and MetaMask's
/// `wallet_switchEthereumChain` extension.
pub mod codes {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The requested chain has not been added to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
}

/// An error returned by the injected provider's `request` call.
///
/// The code and message are carried exactly as the wallet reported them;
/// messages often contain actionable detail ("insufficient funds") and must
/// never be paraphrased on the way up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct TransportError {
    pub code: i64,
    pub message: String,
}

impl TransportError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// The user declined the request in the wallet UI.
    pub fn user_rejected() -> Self {
        Self::new(codes::USER_REJECTED, "User rejected the request")
    }

    /// The wallet does not know the requested chain.
    pub fn unrecognized_chain() -> Self {
        Self::new(codes::UNRECOGNIZED_CHAIN, "Unrecognized chain ID")
    }
}

/// Errors surfaced by the wallet provider adapter.
///
/// All variants are terminal to the current user action only; none are
/// retried internally except the single chain-registration pass inside
/// [`ensure_chain`](crate::WalletProvider::ensure_chain).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No wallet extension is injected into the page.
    #[error("no wallet provider is available; is a wallet extension installed?")]
    Unavailable,
    /// The human declined the request in the wallet UI.
    #[error("user rejected the request: {0}")]
    UserRejected(String),
    /// The wallet does not know the chain and registration did not help.
    #[error("chain {0} is not recognized by the wallet")]
    UnrecognizedChain(ChainId),
    /// `eth_estimateGas` failed; the message is the wallet's, verbatim.
    #[error("gas estimation failed: {0}")]
    EstimationFailed(String),
    /// `eth_sendTransaction` (or the receipt query) failed; verbatim message.
    #[error("transaction submission failed: {0}")]
    SubmissionFailed(String),
    /// The wallet authorized the connection but returned no accounts.
    #[error("wallet returned no accounts")]
    NoAccounts,
    /// A contract call argument could not be coerced to its ABI type.
    #[error("invalid call arguments: {0}")]
    InvalidArgs(String),
    /// Any other provider-reported error, passed through untouched.
    #[error(transparent)]
    Rpc(#[from] TransportError),
    /// The provider returned JSON the adapter could not interpret.
    #[error("unexpected provider response: {0}")]
    UnexpectedResponse(String),
}
