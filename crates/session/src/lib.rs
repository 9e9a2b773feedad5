//! # Wallet session state for skillchain
//!
//! The closest thing this dApp has to a stateful component: who is
//! connected, whether a connect is in flight, and what the last failure was.
//!
//! [`SessionManager`] owns the session record and is its only mutator. It is
//! fed from exactly two sources: explicit user actions
//! ([`connect`](SessionManager::connect) / [`disconnect`](SessionManager::disconnect))
//! and asynchronous provider notifications pumped through
//! [`drive`](SessionManager::drive). A chain change does not reload anything;
//! it publishes an explicit invalidation signal on a watch channel so the
//! embedder picks its own recovery strategy. Results of user actions surface
//! on a broadcast channel of transient [`Notification`]s.
//!
//! Nothing here is persisted; the session lives and dies with the page.

mod manager;
mod notification;
mod state;

pub use manager::SessionManager;
pub use notification::{Notification, NotificationKind};
pub use state::{NetworkInfo, Session};
