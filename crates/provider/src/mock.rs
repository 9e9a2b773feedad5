//! Scripted in-memory wallet transport.
//!
//! Plays the role MetaMask plays against the real adapter: it owns a set of
//! accounts, a current chain, and a list of chains it has been taught, and
//! it answers the EIP-1193 requests the adapter issues. Tests script
//! failures per method and emit provider notifications explicitly so event
//! ordering stays deterministic.

use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
    time::Duration,
};

use alloy_primitives::{keccak256, Address, ChainId, TxHash, U256};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use crate::{
    error::TransportError,
    transport::WalletTransport,
    types::{ProviderRequest, WalletEvent},
};

/// Cloning shares the underlying state, so a test can keep a handle for
/// assertions while the session under test owns another.
#[derive(Debug, Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Debug)]
struct MockState {
    accounts: Vec<Address>,
    chain_id: ChainId,
    known_chains: BTreeSet<ChainId>,
    gas_estimate: U256,
    /// Number of receipt polls that return null before the receipt appears.
    receipt_delay: u32,
    /// Artificial delay before every response resolves.
    latency: Option<Duration>,
    failures: HashMap<&'static str, TransportError>,
    requests: Vec<ProviderRequest>,
    receipts: HashMap<TxHash, u32>,
    subscribers: Vec<mpsc::UnboundedSender<WalletEvent>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// A wallet on mainnet (chain 1) with no authorized accounts.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                accounts: Vec::new(),
                chain_id: 1,
                known_chains: BTreeSet::from([1]),
                gas_estimate: U256::from(21_000),
                receipt_delay: 0,
                latency: None,
                failures: HashMap::new(),
                requests: Vec::new(),
                receipts: HashMap::new(),
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn with_accounts(self, accounts: impl IntoIterator<Item = Address>) -> Self {
        self.inner.lock().accounts = accounts.into_iter().collect();
        self
    }

    /// Teach the wallet a chain without switching to it.
    pub fn with_known_chain(self, chain_id: ChainId) -> Self {
        self.inner.lock().known_chains.insert(chain_id);
        self
    }

    pub fn with_receipt_delay(self, polls: u32) -> Self {
        self.inner.lock().receipt_delay = polls;
        self
    }

    pub fn with_latency(self, latency: Duration) -> Self {
        self.inner.lock().latency = Some(latency);
        self
    }

    /// Script every subsequent call of `method` to fail with `error`.
    pub fn fail(&self, method: &'static str, error: TransportError) {
        self.inner.lock().failures.insert(method, error);
    }

    /// Push a provider notification to all live subscribers, pruning any
    /// whose receiver has been dropped.
    pub fn emit(&self, event: WalletEvent) {
        self.inner.lock().subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Every request the adapter has issued, in order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.inner.lock().requests.clone()
    }

    pub fn chain_id(&self) -> ChainId {
        self.inner.lock().chain_id
    }

    pub fn subscriber_count(&self) -> usize {
        let mut state = self.inner.lock();
        state.subscribers.retain(|tx| !tx.is_closed());
        state.subscribers.len()
    }
}

#[async_trait]
impl WalletTransport for MockTransport {
    async fn request(&self, request: ProviderRequest) -> Result<Value, TransportError> {
        let latency = {
            let mut state = self.inner.lock();
            state.requests.push(request.clone());
            state.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.inner.lock();
        if let Some(error) = state.failures.get(request.method()) {
            return Err(error.clone());
        }

        match request {
            ProviderRequest::RequestAccounts | ProviderRequest::Accounts => {
                Ok(json!(state.accounts.clone()))
            }
            ProviderRequest::ChainId => Ok(json!(format!("0x{:x}", state.chain_id))),
            ProviderRequest::SwitchChain([params]) => {
                let chain_id = parse_chain_id(&params.chain_id)?;
                if state.known_chains.contains(&chain_id) {
                    state.chain_id = chain_id;
                    Ok(Value::Null)
                } else {
                    Err(TransportError::unrecognized_chain())
                }
            }
            ProviderRequest::AddChain([params]) => {
                let chain_id = parse_chain_id(&params.chain_id)?;
                state.known_chains.insert(chain_id);
                Ok(Value::Null)
            }
            ProviderRequest::EstimateGas(_) => Ok(json!(state.gas_estimate)),
            ProviderRequest::SendTransaction([tx]) => {
                let encoded = serde_json::to_vec(&tx)
                    .map_err(|e| TransportError::new(-32603, e.to_string()))?;
                let hash = TxHash::from(keccak256(encoded));
                let delay = state.receipt_delay;
                state.receipts.insert(hash, delay);
                Ok(json!(hash))
            }
            ProviderRequest::GetTransactionReceipt([hash]) => {
                match state.receipts.get_mut(&hash) {
                    Some(polls) if *polls == 0 => Ok(json!({
                        "transactionHash": hash,
                        "blockNumber": "0x1",
                        "status": "0x1",
                    })),
                    Some(polls) => {
                        *polls -= 1;
                        Ok(Value::Null)
                    }
                    None => Ok(Value::Null),
                }
            }
        }
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<WalletEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().subscribers.push(tx);
        rx
    }
}

fn parse_chain_id(hex: &str) -> Result<ChainId, TransportError> {
    hex.strip_prefix("0x")
        .and_then(|digits| ChainId::from_str_radix(digits, 16).ok())
        .ok_or_else(|| TransportError::new(-32602, format!("invalid chainId {hex:?}")))
}
