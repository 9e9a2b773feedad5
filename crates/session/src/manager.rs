use alloy_primitives::{Address, ChainId};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, trace, warn};

use skillchain_provider::{
    ChainDescriptor, ProviderError, WalletEvent, WalletProvider, WalletTransport,
};

use crate::{
    notification::Notification,
    state::{NetworkInfo, Session},
};

/// Buffered notifications per observer; a lagging observer loses the oldest,
/// never blocks a state transition.
const NOTIFICATION_BUFFER: usize = 16;

/// Owner and sole mutator of the wallet [`Session`].
///
/// The provider is an injected dependency; `None` models a page with no
/// wallet extension. All reads go through cheap snapshot accessors, all
/// mutations through [`connect`](Self::connect) /
/// [`disconnect`](Self::disconnect) / [`handle_event`](Self::handle_event).
pub struct SessionManager<T> {
    provider: Option<WalletProvider<T>>,
    chain: ChainDescriptor,
    session: Mutex<Session>,
    /// Last chain id reported by the wallet; feeds [`NetworkInfo`].
    chain_id: Mutex<Option<ChainId>>,
    notifications: broadcast::Sender<Notification>,
    invalidated: watch::Sender<Option<ChainId>>,
}

impl<T: WalletTransport> SessionManager<T> {
    pub fn new(transport: Option<T>, chain: ChainDescriptor) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_BUFFER);
        let (invalidated, _) = watch::channel(None);
        Self {
            provider: transport.map(WalletProvider::new),
            chain,
            session: Mutex::new(Session::default()),
            chain_id: Mutex::new(None),
            notifications,
            invalidated,
        }
    }

    /// The wallet provider adapter, if a wallet is injected.
    pub fn provider(&self) -> Option<&WalletProvider<T>> {
        self.provider.as_ref()
    }

    /// The fixed target network descriptor.
    pub fn chain(&self) -> &ChainDescriptor {
        &self.chain
    }

    pub fn snapshot(&self) -> Session {
        self.session.lock().clone()
    }

    pub fn account(&self) -> Option<Address> {
        self.session.lock().account
    }

    pub fn is_connected(&self) -> bool {
        self.session.lock().is_connected()
    }

    pub fn is_connecting(&self) -> bool {
        self.session.lock().connecting
    }

    /// Where the wallet points relative to the target network, if known yet.
    pub fn network_info(&self) -> Option<NetworkInfo> {
        self.chain_id
            .lock()
            .map(|chain_id| NetworkInfo { chain_id, expected: chain_id == self.chain.chain_id })
    }

    /// Observe transient user-facing notifications.
    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Publish a transient notification. Delivery is best-effort; the send
    /// result is deliberately ignored when nobody is listening.
    pub fn notify(&self, notification: Notification) {
        let _ = self.notifications.send(notification);
    }

    /// Observe session invalidation. The value flips to `Some(new_chain_id)`
    /// when the wallet switches chains under us.
    pub fn invalidated(&self) -> watch::Receiver<Option<ChainId>> {
        self.invalidated.subscribe()
    }

    /// Connect the wallet: request account authorization, then make sure the
    /// wallet is on the target network.
    ///
    /// At most one connect is in flight at a time; a call while one is
    /// pending is a no-op returning `Ok(())`. A declined or failed network
    /// switch leaves the account connected (with the error recorded and the
    /// chain mismatch visible through [`network_info`](Self::network_info)).
    pub async fn connect(&self) -> Result<(), ProviderError> {
        let Some(provider) = &self.provider else {
            let err = ProviderError::Unavailable;
            self.session.lock().last_error = Some(err.to_string());
            return Err(err);
        };

        {
            let mut session = self.session.lock();
            if session.connecting {
                trace!("connect already in flight, ignoring");
                return Ok(());
            }
            session.connecting = true;
            session.last_error = None;
        }

        let result = self.connect_inner(provider).await;

        let mut session = self.session.lock();
        session.connecting = false;
        if let Err(err) = &result {
            session.last_error = Some(err.to_string());
        }
        result
    }

    async fn connect_inner(&self, provider: &WalletProvider<T>) -> Result<(), ProviderError> {
        let account = provider.connect().await?;
        debug!(%account, "wallet authorized");
        self.session.lock().account = Some(account);

        let switched = provider.ensure_chain(&self.chain).await;

        // Refresh the cached chain id whether or not the switch went
        // through, so a mismatch is observable rather than stale.
        if let Ok(chain_id) = provider.chain_id().await {
            *self.chain_id.lock() = Some(chain_id);
        }

        switched
    }

    /// Forget the connected account. Deterministic and infallible.
    pub fn disconnect(&self) {
        let mut session = self.session.lock();
        session.account = None;
        session.last_error = None;
        debug!("session disconnected");
    }

    /// Apply a single provider notification.
    pub fn handle_event(&self, event: WalletEvent) {
        match event {
            WalletEvent::AccountsChanged(accounts) => match accounts.first() {
                Some(&account) => {
                    debug!(%account, "active account changed");
                    self.session.lock().account = Some(account);
                }
                None => {
                    debug!("wallet reported no authorized accounts");
                    self.disconnect();
                }
            },
            WalletEvent::ChainChanged(chain_id) => {
                warn!(chain_id, "active chain changed, invalidating session");
                *self.chain_id.lock() = Some(chain_id);
                self.invalidated.send_replace(Some(chain_id));
            }
        }
    }

    /// Pump provider notifications until the wallet closes the stream.
    ///
    /// In-flight operations racing a chain change are not cancelled; their
    /// outcome is whatever the wallet does with them.
    pub async fn drive(&self, mut events: mpsc::UnboundedReceiver<WalletEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        trace!("wallet event stream closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillchain_provider::{mock::MockTransport, TransportError};
    use std::{sync::Arc, time::Duration};

    use alloy_primitives::address;

    const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const MUMBAI: ChainId = 80001;

    fn manager_with(transport: MockTransport) -> SessionManager<MockTransport> {
        SessionManager::new(Some(transport), ChainDescriptor::polygon_mumbai())
    }

    fn connected_wallet() -> MockTransport {
        MockTransport::new().with_accounts([ALICE]).with_known_chain(MUMBAI)
    }

    #[tokio::test]
    async fn connect_without_a_wallet_stays_disconnected() {
        let manager = SessionManager::<MockTransport>::new(None, ChainDescriptor::polygon_mumbai());

        let res = manager.connect().await;
        assert!(matches!(res, Err(ProviderError::Unavailable)));

        let session = manager.snapshot();
        assert!(!session.is_connected());
        assert!(!session.connecting);
        assert!(session.last_error.is_some());
    }

    #[tokio::test]
    async fn connect_authorizes_and_switches_chain() {
        let manager = manager_with(connected_wallet());
        manager.connect().await.unwrap();

        let session = manager.snapshot();
        assert_eq!(session.account, Some(ALICE));
        assert!(!session.connecting);
        assert_eq!(session.last_error, None);
        assert_eq!(
            manager.network_info(),
            Some(NetworkInfo { chain_id: MUMBAI, expected: true }),
        );
    }

    #[tokio::test]
    async fn connect_rejection_is_recorded() {
        let transport = connected_wallet();
        transport.fail("eth_requestAccounts", TransportError::user_rejected());
        let manager = manager_with(transport);

        let res = manager.connect().await;
        assert!(matches!(res, Err(ProviderError::UserRejected(_))));

        let session = manager.snapshot();
        assert!(!session.is_connected());
        assert!(!session.connecting);
        assert!(session.last_error.unwrap().contains("User rejected"));
    }

    #[tokio::test]
    async fn declined_chain_switch_keeps_the_account() {
        let transport = connected_wallet();
        transport.fail("wallet_switchEthereumChain", TransportError::user_rejected());
        let manager = manager_with(transport);

        assert!(manager.connect().await.is_err());

        let session = manager.snapshot();
        assert_eq!(session.account, Some(ALICE));
        assert!(session.last_error.is_some());
        // still on mainnet, and that is observable
        assert_eq!(manager.network_info(), Some(NetworkInfo { chain_id: 1, expected: false }));
    }

    #[tokio::test]
    async fn second_connect_while_pending_is_a_noop() {
        let transport = connected_wallet().with_latency(Duration::from_millis(100));
        let manager = Arc::new(manager_with(transport.clone()));

        let first = tokio::spawn({
            let manager = Arc::clone(&manager);
            async move { manager.connect().await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(manager.is_connecting());
        manager.connect().await.unwrap();

        first.await.unwrap().unwrap();
        let authorizations = transport
            .requests()
            .iter()
            .filter(|r| r.method() == "eth_requestAccounts")
            .count();
        assert_eq!(authorizations, 1);
    }

    #[tokio::test]
    async fn account_change_updates_the_session() {
        let manager = manager_with(connected_wallet());
        manager.connect().await.unwrap();

        manager.handle_event(WalletEvent::AccountsChanged(vec![BOB, ALICE]));
        assert_eq!(manager.account(), Some(BOB));
    }

    #[tokio::test]
    async fn empty_account_list_disconnects() {
        let manager = manager_with(connected_wallet());
        manager.connect().await.unwrap();

        manager.handle_event(WalletEvent::AccountsChanged(Vec::new()));
        assert!(!manager.is_connected());
    }

    #[tokio::test]
    async fn chain_change_publishes_invalidation() {
        let manager = manager_with(connected_wallet());
        manager.connect().await.unwrap();
        let invalidated = manager.invalidated();
        assert_eq!(*invalidated.borrow(), None);

        manager.handle_event(WalletEvent::ChainChanged(137));

        assert_eq!(*invalidated.borrow(), Some(137));
        assert_eq!(manager.network_info(), Some(NetworkInfo { chain_id: 137, expected: false }));

        // switching back to the target chain is expected again
        manager.handle_event(WalletEvent::ChainChanged(80001));
        assert_eq!(manager.network_info(), Some(NetworkInfo { chain_id: 80001, expected: true }));
    }

    #[tokio::test]
    async fn drive_pumps_transport_events() {
        let transport = connected_wallet();
        let manager = Arc::new(manager_with(transport.clone()));
        manager.connect().await.unwrap();

        let events = manager.provider().unwrap().events();
        let pump = tokio::spawn({
            let manager = Arc::clone(&manager);
            async move { manager.drive(events).await }
        });

        transport.emit(WalletEvent::AccountsChanged(Vec::new()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!manager.is_connected());

        pump.abort();
        let _ = pump.await;
    }

    #[tokio::test]
    async fn notifications_reach_subscribers() {
        let manager = manager_with(connected_wallet());
        let mut notes = manager.subscribe_notifications();

        manager.notify(Notification::success("Connected", "0xabc"));
        assert_eq!(notes.try_recv().unwrap(), Notification::success("Connected", "0xabc"));
    }
}
