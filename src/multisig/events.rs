//! Domain events emitted by the wallet
//!
//! Each successful mutating call produces exactly one [`WalletEvent`].

use crate::address::Address;
use crate::multisig::proposal::ProposalId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// An observable state change
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletEvent {
    OwnerAdded {
        owner: Address,
    },
    OwnerRemoved {
        owner: Address,
    },
    ProposalCreated {
        id: ProposalId,
        proposer: Address,
        destination: Address,
        amount: u128,
    },
    Approved {
        id: ProposalId,
        owner: Address,
    },
    Revoked {
        id: ProposalId,
        owner: Address,
    },
    Executed {
        id: ProposalId,
        destination: Address,
        amount: u128,
    },
    Deposited {
        from: Address,
        amount: u128,
    },
}

impl fmt::Display for WalletEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OwnerAdded { owner } => write!(f, "OwnerAdded({})", owner),
            Self::OwnerRemoved { owner } => write!(f, "OwnerRemoved({})", owner),
            Self::ProposalCreated {
                id,
                proposer,
                destination,
                amount,
            } => write!(
                f,
                "ProposalCreated(#{}, by {}, {} -> {})",
                id, proposer, amount, destination
            ),
            Self::Approved { id, owner } => write!(f, "Approved(#{}, {})", id, owner),
            Self::Revoked { id, owner } => write!(f, "Revoked(#{}, {})", id, owner),
            Self::Executed {
                id,
                destination,
                amount,
            } => write!(f, "Executed(#{}, {} -> {})", id, amount, destination),
            Self::Deposited { from, amount } => write!(f, "Deposited({} from {})", amount, from),
        }
    }
}

/// An event together with its position in the wallet history
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Monotonic sequence number, starting at 0
    pub sequence: u64,
    /// When the event was recorded
    pub recorded_at: DateTime<Utc>,
    pub event: WalletEvent,
}

/// Bounded event history
///
/// Once `limit` records are held the oldest is dropped. Sequence numbers
/// keep increasing across drops.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    records: VecDeque<EventRecord>,
    next_sequence: u64,
    limit: usize,
}

impl EventLog {
    /// Create an empty log keeping at most `limit` records
    ///
    /// A limit of 0 is raised to 1 so the latest record is always kept.
    /// [`MultisigWallet::new`](crate::multisig::MultisigWallet::new) rejects
    /// a zero limit before it gets here.
    pub fn new(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            next_sequence: 0,
            limit: limit.max(1),
        }
    }

    /// Maximum number of retained records
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Append an event
    pub fn record(&mut self, event: WalletEvent) -> &EventRecord {
        let record = EventRecord {
            sequence: self.next_sequence,
            recorded_at: Utc::now(),
            event,
        };
        self.next_sequence += 1;

        self.records.push_back(record);
        while self.records.len() > self.limit.max(1) {
            self.records.pop_front();
        }

        // Just pushed, so the deque is non-empty
        &self.records[self.records.len() - 1]
    }

    /// Iterate records, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// The most recent `count` records, oldest first
    pub fn recent(&self, count: usize) -> Vec<&EventRecord> {
        let skip = self.records.len().saturating_sub(count);
        self.records.iter().skip(skip).collect()
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of events ever recorded
    pub fn total_recorded(&self) -> u64 {
        self.next_sequence
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(crate::multisig::config::DEFAULT_EVENT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deposit(amount: u128) -> WalletEvent {
        WalletEvent::Deposited {
            from: Address::from_label("funder"),
            amount,
        }
    }

    #[test]
    fn test_record_assigns_sequence() {
        let mut log = EventLog::new(10);

        assert_eq!(log.record(deposit(1)).sequence, 0);
        assert_eq!(log.record(deposit(2)).sequence, 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.total_recorded(), 2);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut log = EventLog::new(3);
        for amount in 1..=5 {
            log.record(deposit(amount));
        }

        assert_eq!(log.len(), 3);
        assert_eq!(log.total_recorded(), 5);

        let sequences: Vec<u64> = log.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![2, 3, 4]);
    }

    #[test]
    fn test_zero_limit_keeps_latest() {
        let mut log = EventLog::new(0);
        assert_eq!(log.limit(), 1);

        log.record(deposit(1));
        log.record(deposit(2));
        assert_eq!(log.len(), 1);
        assert_eq!(log.recent(1)[0].event, deposit(2));
    }

    #[test]
    fn test_recent() {
        let mut log = EventLog::new(10);
        for amount in 1..=4 {
            log.record(deposit(amount));
        }

        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].event, deposit(3));
        assert_eq!(recent[1].event, deposit(4));

        assert_eq!(log.recent(100).len(), 4);
    }

    #[test]
    fn test_event_serde_roundtrip() {
        let json = serde_json::to_string(&deposit(7)).unwrap();
        assert!(json.starts_with("{\"deposited\""));

        let back: WalletEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, deposit(7));
    }
}
