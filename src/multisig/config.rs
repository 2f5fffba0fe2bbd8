//! Wallet configuration

use serde::{Deserialize, Serialize};

/// Number of events kept in the wallet history by default
pub const DEFAULT_EVENT_HISTORY_LIMIT: usize = 100;

/// Tunables fixed at wallet construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Upper bound on the owner set, administrator included. `None` means unbounded.
    pub max_owners: Option<usize>,
    /// Number of events retained in the wallet history; must be at least 1
    pub event_history_limit: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            max_owners: None,
            event_history_limit: DEFAULT_EVENT_HISTORY_LIMIT,
        }
    }
}

impl WalletConfig {
    /// Configuration with an owner cap
    pub fn with_max_owners(mut self, max_owners: usize) -> Self {
        self.max_owners = Some(max_owners);
        self
    }

    /// Configuration with a custom history size
    pub fn with_event_history_limit(mut self, limit: usize) -> Self {
        self.event_history_limit = limit;
        self
    }
}
