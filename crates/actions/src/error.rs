use skillchain_provider::ProviderError;

/// Why a form submission was rejected or failed.
///
/// The first three are local validation verdicts produced before any network
/// call; `Provider` wraps whatever the wallet reported, message intact.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("wallet not connected")]
    NotConnected,
    #[error("please fill in all fields")]
    MissingInput,
    #[error("token amount must be a positive number")]
    InvalidAmount,
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
