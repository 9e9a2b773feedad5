//! Shared fixtures for skillchain tests: tracing setup, well-known test
//! accounts, and pre-wired mock wallet/session pairs.

use alloy_primitives::{address, Address};

use skillchain_provider::ChainDescriptor;
use skillchain_session::SessionManager;

pub use skillchain_provider::mock::MockTransport;

/// First two accounts of the standard test mnemonic.
pub const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// Initialize a test subscriber honoring `RUST_LOG`. Idempotent.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A wallet with Alice authorized that already knows the Mumbai testnet.
pub fn wallet() -> MockTransport {
    MockTransport::new().with_accounts([ALICE]).with_known_chain(80001)
}

/// A session manager targeting Mumbai over a handle to `transport`.
pub fn session(transport: &MockTransport) -> SessionManager<MockTransport> {
    SessionManager::new(Some(transport.clone()), ChainDescriptor::polygon_mumbai())
}

/// A session manager that has already connected Alice's wallet.
pub async fn connected_session(transport: &MockTransport) -> SessionManager<MockTransport> {
    let manager = session(transport);
    manager.connect().await.expect("mock wallet connect");
    manager
}
