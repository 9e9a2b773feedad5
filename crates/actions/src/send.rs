use alloy_primitives::{
    utils::{ParseUnits, Unit},
    Address, TxHash, U256,
};
use tracing::debug;

use skillchain_provider::{
    ContractCall, ProviderError, TransactionReceipt, WalletProvider, WalletTransport,
};
use skillchain_session::{Notification, SessionManager};

use crate::{contracts, error::ActionError};

/// State behind the "Send SkillTokens" card: recipient address, a
/// human-readable token amount, and whether a submission is in flight.
#[derive(Debug, Clone, Default)]
pub struct SendTokensForm {
    pub recipient: String,
    pub amount: String,
    busy: bool,
}

impl SendTokensForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Validate the form and transfer tokens to the recipient.
    ///
    /// Gates, in order: session connected, both fields non-empty, amount a
    /// strictly positive finite number. The amount converts to base units
    /// assuming the token's 18 decimals before anything touches the network.
    pub async fn submit<T: WalletTransport>(
        &mut self,
        session: &SessionManager<T>,
    ) -> Result<TxHash, ActionError> {
        let sender = session.account().ok_or(ActionError::NotConnected)?;
        let provider = session.provider().ok_or(ActionError::NotConnected)?;
        if self.recipient.trim().is_empty() || self.amount.trim().is_empty() {
            return Err(ActionError::MissingInput);
        }
        let amount = parse_amount(&self.amount)?;

        self.busy = true;
        let result = transfer(provider, sender, self.recipient.trim(), amount).await;
        self.busy = false;

        match result {
            Ok(receipt) => {
                let hash = receipt.transaction_hash;
                debug!(%hash, %amount, "tokens sent");
                self.recipient.clear();
                self.amount.clear();
                session.notify(Notification::success(
                    "Tokens sent",
                    format!(
                        "Transaction hash: {hash}\n{}",
                        session.chain().explorer_tx_url(hash)
                    ),
                ));
                Ok(hash)
            }
            Err(err) => {
                session.notify(Notification::error("Transfer failed", err.to_string()));
                Err(err.into())
            }
        }
    }
}

async fn transfer<T: WalletTransport>(
    provider: &WalletProvider<T>,
    from: Address,
    recipient: &str,
    amount: U256,
) -> Result<TransactionReceipt, ProviderError> {
    let call = ContractCall::new(contracts::SKILL_TOKEN, contracts::TRANSFER)?
        .arg(recipient)
        .arg(amount.to_string());
    provider.invoke(&call, from).await
}

/// Parse a user-typed token amount into base units (18 decimals).
///
/// Rejects anything that is not a strictly positive finite number, before
/// the unit conversion gets a say.
fn parse_amount(input: &str) -> Result<U256, ActionError> {
    let input = input.trim();
    let number: f64 = input.parse().map_err(|_| ActionError::InvalidAmount)?;
    if !number.is_finite() || number <= 0.0 {
        return Err(ActionError::InvalidAmount);
    }
    match ParseUnits::parse_units(input, Unit::ETHER) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        _ => Err(ActionError::InvalidAmount),
    }
}
