//! Value-transfer proposals
//!
//! A proposal is created pending, collects approvals from owners and is
//! executed at most once. The approval count is maintained alongside the
//! voter set and always equals its size.

use crate::address::Address;
use crate::multisig::error::{IntegrityError, MultisigError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Index of a proposal in the ledger
pub type ProposalId = u64;

/// Lifecycle state of a proposal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProposalStatus {
    /// Collecting approvals
    Pending,
    /// Funds released; terminal
    Executed,
}

/// A transfer intent awaiting approval
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Proposal {
    /// Ledger index
    pub id: ProposalId,
    /// Owner that created the proposal
    pub proposer: Address,
    /// Recipient of the funds
    pub destination: Address,
    /// Amount to release, fixed at creation
    pub amount: u128,
    /// Number of owners currently approving
    approval_count: u32,
    /// Owners currently approving
    approvals: BTreeSet<Address>,
    executed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// When execution succeeded
    pub executed_at: Option<DateTime<Utc>>,
}

impl Proposal {
    /// Create a new pending proposal with no approvals
    pub fn new(id: ProposalId, proposer: Address, destination: Address, amount: u128) -> Self {
        Self {
            id,
            proposer,
            destination,
            amount,
            approval_count: 0,
            approvals: BTreeSet::new(),
            executed: false,
            created_at: Utc::now(),
            executed_at: None,
        }
    }

    /// Current approval tally
    pub fn approval_count(&self) -> u32 {
        self.approval_count
    }

    /// Whether `owner` currently approves
    pub fn has_approved(&self, owner: &Address) -> bool {
        self.approvals.contains(owner)
    }

    /// Owners currently approving, in address order
    pub fn approvers(&self) -> impl Iterator<Item = &Address> {
        self.approvals.iter()
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn status(&self) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else {
            ProposalStatus::Pending
        }
    }

    /// Fail with `AlreadyExecuted` once the proposal is terminal
    pub fn ensure_pending(&self) -> Result<(), MultisigError> {
        if self.executed {
            Err(MultisigError::AlreadyExecuted(self.id))
        } else {
            Ok(())
        }
    }

    /// Record an approval from `owner`
    pub(crate) fn add_approval(&mut self, owner: Address) -> Result<(), MultisigError> {
        self.ensure_pending()?;

        if self.approvals.contains(&owner) {
            return Err(MultisigError::AlreadyApproved { id: self.id, owner });
        }

        self.approvals.insert(owner);
        self.approval_count += 1;
        Ok(())
    }

    /// Withdraw an approval from `owner`
    pub(crate) fn remove_approval(&mut self, owner: Address) -> Result<(), MultisigError> {
        self.ensure_pending()?;

        let not_approved = MultisigError::NotApproved { id: self.id, owner };
        if !self.approvals.contains(&owner) {
            return Err(not_approved);
        }
        let count = self.approval_count.checked_sub(1).ok_or(not_approved)?;

        self.approvals.remove(&owner);
        self.approval_count = count;
        Ok(())
    }

    /// Move to the terminal state
    pub(crate) fn mark_executed(&mut self) {
        self.executed = true;
        self.executed_at = Some(Utc::now());
    }

    /// Whether the tally agrees with the voter set
    pub fn is_consistent(&self) -> bool {
        self.approval_count as usize == self.approvals.len()
    }

    /// Check a proposal expected at ledger position `index`
    pub fn check_integrity(&self, index: u64) -> Result<(), IntegrityError> {
        if self.id != index {
            return Err(IntegrityError::MisplacedProposal { index, id: self.id });
        }
        if !self.is_consistent() {
            return Err(IntegrityError::TallyMismatch {
                id: self.id,
                count: self.approval_count,
                approvers: self.approvals.len(),
            });
        }
        if self.destination.is_zero() {
            return Err(IntegrityError::NullDestination(self.id));
        }
        if self.amount == 0 {
            return Err(IntegrityError::ZeroAmount(self.id));
        }
        if self.executed != self.executed_at.is_some() {
            return Err(IntegrityError::ExecutionMismatch(self.id));
        }
        Ok(())
    }
}
