use alloy_primitives::{Address, TxHash};
use tracing::debug;

use skillchain_provider::{
    ContractCall, ProviderError, TransactionReceipt, WalletProvider, WalletTransport,
};
use skillchain_session::{Notification, SessionManager};

use crate::{contracts, error::ActionError};

/// State behind the "Mint NFT Badge" card: the student's wallet address, the
/// badge name, and whether a submission is in flight.
#[derive(Debug, Clone, Default)]
pub struct MintBadgeForm {
    pub recipient: String,
    pub badge_name: String,
    busy: bool,
}

impl MintBadgeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a submission is in flight. The UI disables its submit
    /// control off this flag; the `&mut` receiver of [`submit`](Self::submit)
    /// is what actually rules out overlap.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Validate the form and mint a badge to the recipient.
    ///
    /// Gates, in order: session connected, both fields non-empty. On success
    /// the fields are cleared and a success notification carries the
    /// transaction hash; on failure the fields are kept for correction and
    /// the wallet's message is surfaced verbatim.
    pub async fn submit<T: WalletTransport>(
        &mut self,
        session: &SessionManager<T>,
    ) -> Result<TxHash, ActionError> {
        let sender = session.account().ok_or(ActionError::NotConnected)?;
        let provider = session.provider().ok_or(ActionError::NotConnected)?;
        if self.recipient.trim().is_empty() || self.badge_name.trim().is_empty() {
            return Err(ActionError::MissingInput);
        }

        self.busy = true;
        let result = mint(provider, sender, self.recipient.trim(), self.badge_name.trim()).await;
        self.busy = false;

        match result {
            Ok(receipt) => {
                let hash = receipt.transaction_hash;
                debug!(%hash, badge_name = %self.badge_name, "badge minted");
                self.recipient.clear();
                self.badge_name.clear();
                session.notify(Notification::success(
                    "Badge minted",
                    format!(
                        "Transaction hash: {hash}\n{}",
                        session.chain().explorer_tx_url(hash)
                    ),
                ));
                Ok(hash)
            }
            Err(err) => {
                session.notify(Notification::error("Minting failed", err.to_string()));
                Err(err.into())
            }
        }
    }
}

async fn mint<T: WalletTransport>(
    provider: &WalletProvider<T>,
    from: Address,
    recipient: &str,
    badge_name: &str,
) -> Result<TransactionReceipt, ProviderError> {
    let call = ContractCall::new(contracts::BADGE_REGISTRY, contracts::MINT_BADGE)?
        .arg(recipient)
        .arg(badge_name);
    provider.invoke(&call, from).await
}
