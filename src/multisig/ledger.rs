//! Transaction ledger
//!
//! Append-only list of transfer proposals addressed by index. Handles the
//! propose / approve / revoke / execute workflow and enforces one vote per
//! owner per proposal and at-most-once execution.
//!
//! Every check runs before any mutation, so a rejected call leaves the
//! ledger untouched.

use crate::address::Address;
use crate::multisig::disburse::Disburser;
use crate::multisig::error::{IntegrityError, MultisigError};
use crate::multisig::events::WalletEvent;
use crate::multisig::proposal::{Proposal, ProposalId};
use crate::multisig::quorum::{is_quorum, quorum_threshold};
use crate::multisig::registry::OwnerRegistry;
use serde::{Deserialize, Serialize};

/// All proposals ever created, indexed by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLedger {
    proposals: Vec<Proposal>,
}

impl TransactionLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            proposals: Vec::new(),
        }
    }

    /// Id the next proposal will receive
    pub fn next_id(&self) -> ProposalId {
        self.proposals.len() as ProposalId
    }

    /// Number of proposals
    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    /// Look up a proposal, failing with `InvalidId` for ids not yet allocated
    pub fn get(&self, id: ProposalId) -> Result<&Proposal, MultisigError> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.proposals.get(index))
            .ok_or(MultisigError::InvalidId {
                id,
                count: self.next_id(),
            })
    }

    fn get_mut(&mut self, id: ProposalId) -> Result<&mut Proposal, MultisigError> {
        let count = self.next_id();
        usize::try_from(id)
            .ok()
            .and_then(|index| self.proposals.get_mut(index))
            .ok_or(MultisigError::InvalidId { id, count })
    }

    /// All proposals in id order
    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Proposals that have not executed yet
    pub fn pending(&self) -> Vec<&Proposal> {
        self.proposals.iter().filter(|p| !p.is_executed()).collect()
    }

    /// Create a pending proposal
    pub fn propose(
        &mut self,
        registry: &OwnerRegistry,
        caller: &Address,
        destination: Address,
        amount: u128,
    ) -> Result<WalletEvent, MultisigError> {
        registry.ensure_owner(caller)?;

        if destination.is_zero() {
            return Err(MultisigError::NullDestination);
        }
        if amount == 0 {
            return Err(MultisigError::InvalidAmount);
        }

        let id = self.next_id();
        self.proposals
            .push(Proposal::new(id, *caller, destination, amount));

        Ok(WalletEvent::ProposalCreated {
            id,
            proposer: *caller,
            destination,
            amount,
        })
    }

    /// Record the caller's approval
    pub fn approve(
        &mut self,
        registry: &OwnerRegistry,
        caller: &Address,
        id: ProposalId,
    ) -> Result<WalletEvent, MultisigError> {
        registry.ensure_owner(caller)?;

        self.get_mut(id)?.add_approval(*caller)?;

        Ok(WalletEvent::Approved { id, owner: *caller })
    }

    /// Withdraw the caller's approval
    pub fn revoke(
        &mut self,
        registry: &OwnerRegistry,
        caller: &Address,
        id: ProposalId,
    ) -> Result<WalletEvent, MultisigError> {
        registry.ensure_owner(caller)?;

        self.get_mut(id)?.remove_approval(*caller)?;

        Ok(WalletEvent::Revoked { id, owner: *caller })
    }

    /// Run every execution check without changing anything
    ///
    /// Quorum is `3 * approvals >= 2 * owners`; custody must hold strictly
    /// more than the amount.
    pub fn check_executable(
        &self,
        registry: &OwnerRegistry,
        caller: &Address,
        id: ProposalId,
        balance: u128,
    ) -> Result<&Proposal, MultisigError> {
        registry.ensure_owner(caller)?;

        let proposal = self.get(id)?;
        proposal.ensure_pending()?;

        let owners = registry.owner_count();
        if !is_quorum(proposal.approval_count(), owners) {
            return Err(MultisigError::QuorumNotMet {
                approvals: proposal.approval_count(),
                owners,
                required: quorum_threshold(owners),
            });
        }

        if balance <= proposal.amount {
            return Err(MultisigError::InsufficientFunds {
                balance,
                amount: proposal.amount,
            });
        }

        Ok(proposal)
    }

    /// Execute a proposal, releasing funds through `disburser`
    ///
    /// The proposal is marked executed only after the disbursement
    /// succeeds. The caller is responsible for debiting custody.
    pub fn execute<D: Disburser + ?Sized>(
        &mut self,
        registry: &OwnerRegistry,
        caller: &Address,
        id: ProposalId,
        balance: u128,
        disburser: &mut D,
    ) -> Result<WalletEvent, MultisigError> {
        let (destination, amount) = {
            let proposal = self.check_executable(registry, caller, id, balance)?;
            (proposal.destination, proposal.amount)
        };

        disburser
            .disburse(&destination, amount)
            .map_err(|e| MultisigError::DisbursementFailed(e.to_string()))?;

        self.get_mut(id)?.mark_executed();

        Ok(WalletEvent::Executed {
            id,
            destination,
            amount,
        })
    }

    /// Verify every proposal sits at its own index with a consistent tally
    pub fn check_invariants(&self) -> Result<(), IntegrityError> {
        self.proposals
            .iter()
            .zip(0..)
            .try_for_each(|(proposal, index)| proposal.check_integrity(index))
    }
}
