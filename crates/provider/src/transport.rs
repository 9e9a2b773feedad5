use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::{
    error::TransportError,
    types::{ProviderRequest, WalletEvent},
};

/// The seam between this crate and a browser-injected wallet.
///
/// This is the EIP-1193 `request({method, params})` surface plus the
/// provider's notification stream. The host page supplies the real
/// implementation; tests supply [`MockTransport`](crate::mock::MockTransport).
///
/// Reliability, retries and timeouts are the wallet's business: a `request`
/// call may suspend its caller indefinitely and the adapter makes no attempt
/// to cancel it.
#[async_trait]
pub trait WalletTransport: Send + Sync {
    /// Perform a single provider request, returning the raw JSON result.
    async fn request(&self, request: ProviderRequest) -> Result<serde_json::Value, TransportError>;

    /// Subscribe to `accountsChanged` / `chainChanged` notifications.
    ///
    /// The subscription lives as long as the returned receiver: dropping it
    /// releases the underlying listener registration.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<WalletEvent>;
}
