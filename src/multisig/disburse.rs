//! Disbursement of released funds
//!
//! The wallet does not move value itself. When a proposal executes it hands
//! the destination and amount to a [`Disburser`]; if that call fails the
//! execution is abandoned and nothing is committed.

use crate::address::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Disbursement failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisburseError {
    #[error("Receiver {0} rejected the transfer")]
    Rejected(Address),
}

/// Sink for released funds
pub trait Disburser {
    /// Deliver `amount` to `to`
    fn disburse(&mut self, to: &Address, amount: u128) -> Result<(), DisburseError>;
}

/// A completed disbursement
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub to: Address,
    pub amount: u128,
    pub paid_at: DateTime<Utc>,
}

/// Disburser that records every payout
///
/// Addresses on the refusal list reject value, which lets callers model a
/// receiver that cannot accept funds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutLog {
    payouts: Vec<Payout>,
    refused: BTreeSet<Address>,
}

impl PayoutLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            payouts: Vec::new(),
            refused: BTreeSet::new(),
        }
    }

    /// Make `address` reject all future payouts
    pub fn refuse(&mut self, address: Address) {
        self.refused.insert(address);
    }

    /// Allow `address` to receive payouts again
    pub fn accept(&mut self, address: &Address) {
        self.refused.remove(address);
    }

    /// Whether `address` currently rejects payouts
    pub fn is_refused(&self, address: &Address) -> bool {
        self.refused.contains(address)
    }

    /// All payouts, oldest first
    pub fn payouts(&self) -> &[Payout] {
        &self.payouts
    }

    /// Sum of everything paid to `address`
    pub fn total_paid_to(&self, address: &Address) -> u128 {
        self.payouts
            .iter()
            .filter(|p| p.to == *address)
            .map(|p| p.amount)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.payouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payouts.is_empty()
    }
}

impl Disburser for PayoutLog {
    fn disburse(&mut self, to: &Address, amount: u128) -> Result<(), DisburseError> {
        if self.refused.contains(to) {
            return Err(DisburseError::Rejected(*to));
        }

        self.payouts.push(Payout {
            to: *to,
            amount,
            paid_at: Utc::now(),
        });
        Ok(())
    }
}
