use std::time::Duration;

use alloy_primitives::{Address, ChainId, TxHash, U256};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::{
    call::ContractCall,
    chain::ChainDescriptor,
    error::{codes, ProviderError, TransportError},
    transport::WalletTransport,
    types::{ProviderRequest, TransactionParams, TransactionReceipt, WalletEvent},
};

/// How often a submitted transaction is polled for its receipt.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Thin, typed wrapper over an injected [`WalletTransport`].
///
/// Holds no state of its own; every operation is a pass-through to the
/// wallet with request building, response parsing and error classification
/// on top.
#[derive(Debug)]
pub struct WalletProvider<T> {
    transport: T,
}

impl<T: WalletTransport> WalletProvider<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request account authorization and return the active account.
    ///
    /// Fails with [`ProviderError::UserRejected`] if the human declines, and
    /// [`ProviderError::NoAccounts`] if the wallet authorizes the site but
    /// exposes no accounts.
    pub async fn connect(&self) -> Result<Address, ProviderError> {
        trace!("requesting wallet account authorization");
        let accounts: Vec<Address> = self.call(ProviderRequest::RequestAccounts, classify).await?;
        accounts.first().copied().ok_or(ProviderError::NoAccounts)
    }

    /// The accounts currently authorized for this site. Read-only.
    pub async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.call(ProviderRequest::Accounts, classify).await
    }

    /// The wallet's active chain id. Read-only.
    pub async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        let hex: String = self.call(ProviderRequest::ChainId, classify).await?;
        parse_chain_id(&hex)
    }

    /// Switch the wallet to `chain`, teaching it the chain first if needed.
    ///
    /// If the switch fails because the wallet does not know the chain (code
    /// 4902), the chain is registered with the fixed descriptor and the
    /// switch retried exactly once; a second 4902 is surfaced as
    /// [`ProviderError::UnrecognizedChain`].
    pub async fn ensure_chain(&self, chain: &ChainDescriptor) -> Result<(), ProviderError> {
        match self.switch_chain(chain).await {
            Err(ProviderError::UnrecognizedChain(_)) => {
                debug!(chain_id = chain.chain_id, "chain unknown to wallet, registering");
                self.transport
                    .request(ProviderRequest::AddChain([chain.add_chain_params()]))
                    .await
                    .map_err(classify)?;
                self.switch_chain(chain).await
            }
            other => other,
        }
    }

    async fn switch_chain(&self, chain: &ChainDescriptor) -> Result<(), ProviderError> {
        trace!(chain_id = chain.chain_id, "requesting chain switch");
        match self.transport.request(ProviderRequest::SwitchChain([chain.switch_params()])).await {
            Ok(_) => Ok(()),
            Err(e) if e.code == codes::UNRECOGNIZED_CHAIN => {
                Err(ProviderError::UnrecognizedChain(chain.chain_id))
            }
            Err(e) => Err(classify(e)),
        }
    }

    /// Estimate gas for `call`, submit it from `from`, and await the receipt.
    ///
    /// Estimation and submission failures carry the wallet's message
    /// verbatim. The receipt is polled with no timeout; a transaction the
    /// chain never mines suspends the caller indefinitely.
    pub async fn invoke(
        &self,
        call: &ContractCall,
        from: Address,
    ) -> Result<TransactionReceipt, ProviderError> {
        let mut tx = TransactionParams { from, to: call.to(), data: call.calldata()?, gas: None };

        let gas: U256 = self
            .call(ProviderRequest::EstimateGas([tx.clone()]), |e| {
                ProviderError::EstimationFailed(e.message)
            })
            .await?;
        trace!(signature = %call.signature(), %gas, "gas estimated");
        tx.gas = Some(gas);

        let hash: TxHash = self
            .call(ProviderRequest::SendTransaction([tx]), |e| {
                ProviderError::SubmissionFailed(e.message)
            })
            .await?;
        debug!(%hash, "transaction submitted, awaiting receipt");

        self.wait_for_receipt(hash).await
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TransactionReceipt, ProviderError> {
        loop {
            let value = self
                .transport
                .request(ProviderRequest::GetTransactionReceipt([hash]))
                .await
                .map_err(|e| ProviderError::SubmissionFailed(e.message))?;
            if !value.is_null() {
                return parse(value);
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }

    /// Subscribe to the wallet's notification stream.
    pub fn events(&self) -> mpsc::UnboundedReceiver<WalletEvent> {
        self.transport.subscribe()
    }

    /// Perform a request, classify transport failures with `map_err`, and
    /// parse the JSON result.
    async fn call<R: DeserializeOwned>(
        &self,
        request: ProviderRequest,
        map_err: impl FnOnce(TransportError) -> ProviderError,
    ) -> Result<R, ProviderError> {
        let value = self.transport.request(request).await.map_err(map_err)?;
        parse(value)
    }
}

fn parse<R: DeserializeOwned>(value: serde_json::Value) -> Result<R, ProviderError> {
    serde_json::from_value(value).map_err(|e| ProviderError::UnexpectedResponse(e.to_string()))
}

fn parse_chain_id(hex: &str) -> Result<ChainId, ProviderError> {
    let digits = hex
        .strip_prefix("0x")
        .ok_or_else(|| ProviderError::UnexpectedResponse(format!("chain id {hex:?}")))?;
    ChainId::from_str_radix(digits, 16)
        .map_err(|_| ProviderError::UnexpectedResponse(format!("chain id {hex:?}")))
}

/// Classify a raw provider error by its EIP-1193 code.
fn classify(e: TransportError) -> ProviderError {
    if e.code == codes::USER_REJECTED {
        ProviderError::UserRejected(e.message)
    } else {
        ProviderError::Rpc(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use alloy_primitives::address;

    const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const TOKEN: Address = address!("0x0987654321098765432109876543210987654321");
    const MUMBAI: ChainId = 80001;

    /// A wallet that knows the target chain and has Alice authorized.
    fn wallet() -> (MockTransport, WalletProvider<MockTransport>) {
        let transport = MockTransport::new().with_accounts([ALICE]).with_known_chain(MUMBAI);
        (transport.clone(), WalletProvider::new(transport))
    }

    fn transfer_call() -> ContractCall {
        ContractCall::new(TOKEN, "transfer(address,uint256)")
            .unwrap()
            .arg(BOB.to_string())
            .arg("1000000000000000000")
    }

    fn methods(transport: &MockTransport) -> Vec<&'static str> {
        transport.requests().iter().map(|r| r.method()).collect()
    }

    #[tokio::test]
    async fn connect_returns_first_account() {
        let (_, provider) = wallet();
        assert_eq!(provider.connect().await.unwrap(), ALICE);
    }

    #[tokio::test]
    async fn connect_with_empty_wallet_is_no_accounts() {
        let provider = WalletProvider::new(MockTransport::new());
        assert!(matches!(provider.connect().await, Err(ProviderError::NoAccounts)));
    }

    #[tokio::test]
    async fn connect_surfaces_user_rejection() {
        let (transport, provider) = wallet();
        transport.fail("eth_requestAccounts", TransportError::user_rejected());

        match provider.connect().await {
            Err(ProviderError::UserRejected(message)) => {
                assert_eq!(message, "User rejected the request");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn chain_id_parses_hex_quantity() {
        let (_, provider) = wallet();
        assert_eq!(provider.chain_id().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ensure_chain_switches_directly_when_known() {
        let (transport, provider) = wallet();
        provider.ensure_chain(&ChainDescriptor::polygon_mumbai()).await.unwrap();

        assert_eq!(methods(&transport), ["wallet_switchEthereumChain"]);
        assert_eq!(transport.chain_id(), MUMBAI);
    }

    #[tokio::test]
    async fn ensure_chain_registers_unknown_chain_once() {
        let transport = MockTransport::new().with_accounts([ALICE]);
        let provider = WalletProvider::new(transport.clone());
        provider.ensure_chain(&ChainDescriptor::polygon_mumbai()).await.unwrap();

        assert_eq!(
            methods(&transport),
            ["wallet_switchEthereumChain", "wallet_addEthereumChain", "wallet_switchEthereumChain"],
        );
        assert_eq!(transport.chain_id(), MUMBAI);
    }

    #[tokio::test]
    async fn ensure_chain_gives_up_after_one_registration() {
        let (transport, provider) = wallet();
        transport.fail("wallet_switchEthereumChain", TransportError::unrecognized_chain());

        match provider.ensure_chain(&ChainDescriptor::polygon_mumbai()).await {
            Err(ProviderError::UnrecognizedChain(id)) => assert_eq!(id, MUMBAI),
            other => panic!("expected unrecognized chain, got {other:?}"),
        }
        // switch, add, switch - and nothing more
        assert_eq!(
            methods(&transport),
            ["wallet_switchEthereumChain", "wallet_addEthereumChain", "wallet_switchEthereumChain"],
        );
    }

    #[tokio::test]
    async fn ensure_chain_surfaces_switch_rejection() {
        let (transport, provider) = wallet();
        transport.fail("wallet_switchEthereumChain", TransportError::user_rejected());

        let res = provider.ensure_chain(&ChainDescriptor::polygon_mumbai()).await;
        assert!(matches!(res, Err(ProviderError::UserRejected(_))));
    }

    #[tokio::test]
    async fn invoke_attaches_the_estimate_it_received() {
        let (transport, provider) = wallet();
        let receipt = provider.invoke(&transfer_call(), ALICE).await.unwrap();
        assert_ne!(receipt.transaction_hash, TxHash::ZERO);

        let requests = transport.requests();
        let [ProviderRequest::EstimateGas([estimated]), ProviderRequest::SendTransaction([sent]), ..] =
            &requests[..]
        else {
            panic!("unexpected request sequence: {requests:?}");
        };
        assert_eq!(estimated.gas, None);
        assert_eq!(sent.gas, Some(U256::from(21_000)));
        assert_eq!(sent.from, ALICE);
        assert_eq!(sent.to, TOKEN);
        assert_eq!(sent.data, estimated.data);
    }

    #[tokio::test(start_paused = true)]
    async fn invoke_polls_until_the_receipt_appears() {
        let transport = MockTransport::new()
            .with_accounts([ALICE])
            .with_known_chain(MUMBAI)
            .with_receipt_delay(2);
        let provider = WalletProvider::new(transport.clone());

        provider.invoke(&transfer_call(), ALICE).await.unwrap();

        let polls = methods(&transport)
            .iter()
            .filter(|m| **m == "eth_getTransactionReceipt")
            .count();
        assert_eq!(polls, 3);
    }

    #[tokio::test]
    async fn estimation_failure_message_is_verbatim() {
        let (transport, provider) = wallet();
        transport.fail(
            "eth_estimateGas",
            TransportError::new(-32000, "insufficient funds for transfer"),
        );

        match provider.invoke(&transfer_call(), ALICE).await {
            Err(ProviderError::EstimationFailed(message)) => {
                assert_eq!(message, "insufficient funds for transfer");
            }
            other => panic!("expected estimation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn submission_failure_message_is_verbatim() {
        let (transport, provider) = wallet();
        transport.fail("eth_sendTransaction", TransportError::new(-32003, "nonce too low"));

        match provider.invoke(&transfer_call(), ALICE).await {
            Err(ProviderError::SubmissionFailed(message)) => assert_eq!(message, "nonce too low"),
            other => panic!("expected submission failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dropping_the_event_stream_releases_the_subscription() {
        let (transport, provider) = wallet();

        let mut live = provider.events();
        let dropped = provider.events();
        drop(dropped);

        transport.emit(WalletEvent::ChainChanged(MUMBAI));
        assert_eq!(live.recv().await, Some(WalletEvent::ChainChanged(MUMBAI)));
        assert_eq!(transport.subscriber_count(), 1);
    }
}
