use alloy_primitives::{Address, ChainId};

/// Snapshot of the wallet session.
///
/// Created empty on load, mutated only by [`SessionManager`](crate::SessionManager),
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// The connected account, if any.
    pub account: Option<Address>,
    /// True strictly between the start and completion of a connect call.
    pub connecting: bool,
    /// Message of the most recent failed user action, if any.
    pub last_error: Option<String>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}

/// Where the wallet currently points, relative to the target network.
///
/// Derived read-only from the provider; recomputed on every chain-change
/// notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    /// The wallet's active chain.
    pub chain_id: ChainId,
    /// Whether that chain is the fixed target network.
    pub expected: bool,
}
