//! Multi-owner custodial wallet
//!
//! [`MultisigWallet`] is the single authority object: it owns the owner
//! registry, the transaction ledger, the custodied balance and the event
//! history. Every operation takes the calling identity explicitly and either
//! applies completely, recording exactly one event, or fails leaving the
//! wallet unchanged.

use crate::address::Address;
use crate::multisig::config::WalletConfig;
use crate::multisig::disburse::Disburser;
use crate::multisig::error::{IntegrityError, MultisigError};
use crate::multisig::events::{EventLog, WalletEvent};
use crate::multisig::ledger::TransactionLedger;
use crate::multisig::proposal::{Proposal, ProposalId};
use crate::multisig::quorum::{is_quorum, quorum_threshold};
use crate::multisig::registry::OwnerRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A multi-signature wallet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigWallet {
    /// Wallet configuration
    config: WalletConfig,
    registry: OwnerRegistry,
    ledger: TransactionLedger,
    /// Custodied funds
    balance: u128,
    events: EventLog,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl MultisigWallet {
    /// Create a wallet administered by `caller`
    ///
    /// # Arguments
    /// * `caller` - Becomes the administrator and first owner
    /// * `initial_owners` - Additional owners; must be non-empty
    /// * `config` - Wallet tunables
    ///
    /// # Errors
    /// `ZeroHistoryLimit`, `EmptyOwnerSet`, `NullOwner`, `DuplicateOwner` or
    /// `OwnerLimitReached`
    pub fn new(
        caller: Address,
        initial_owners: &[Address],
        config: WalletConfig,
    ) -> Result<Self, MultisigError> {
        if config.event_history_limit == 0 {
            log::debug!("Wallet initialization rejected: zero history limit");
            return Err(MultisigError::ZeroHistoryLimit);
        }

        let registry = OwnerRegistry::initialize(caller, initial_owners, config.max_owners)
            .inspect_err(|e| log::debug!("Wallet initialization rejected: {}", e))?;

        log::info!(
            "Multisig wallet created by {} with {} owners",
            caller,
            registry.owner_count()
        );

        Ok(Self {
            events: EventLog::new(config.event_history_limit),
            config,
            registry,
            ledger: TransactionLedger::new(),
            balance: 0,
            created_at: Utc::now(),
        })
    }

    /// Create a wallet with the default configuration
    pub fn with_defaults(
        caller: Address,
        initial_owners: &[Address],
    ) -> Result<Self, MultisigError> {
        Self::new(caller, initial_owners, WalletConfig::default())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn administrator(&self) -> Address {
        self.registry.administrator()
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.registry.is_owner(address)
    }

    /// Owners in insertion order
    pub fn list_owners(&self) -> &[Address] {
        self.registry.owners()
    }

    pub fn owner_count(&self) -> usize {
        self.registry.owner_count()
    }

    /// Custodied balance
    pub fn balance(&self) -> u128 {
        self.balance
    }

    /// Approvals currently needed to execute
    pub fn quorum_threshold(&self) -> u32 {
        quorum_threshold(self.registry.owner_count())
    }

    /// Look up a proposal
    pub fn proposal(&self, id: ProposalId) -> Result<&Proposal, MultisigError> {
        self.ledger.get(id)
    }

    /// All proposals in id order
    pub fn proposals(&self) -> &[Proposal] {
        self.ledger.proposals()
    }

    /// Proposals that have not executed
    pub fn pending_proposals(&self) -> Vec<&Proposal> {
        self.ledger.pending()
    }

    /// Number of proposals ever created
    pub fn proposal_count(&self) -> u64 {
        self.ledger.next_id()
    }

    /// Whether `owner` currently approves proposal `id`
    pub fn has_approved(&self, id: ProposalId, owner: &Address) -> Result<bool, MultisigError> {
        Ok(self.ledger.get(id)?.has_approved(owner))
    }

    /// Whether proposal `id` is pending with quorum and enough funds
    pub fn is_executable(&self, id: ProposalId) -> bool {
        match self.ledger.get(id) {
            Ok(p) => {
                !p.is_executed()
                    && is_quorum(p.approval_count(), self.registry.owner_count())
                    && self.balance > p.amount
            }
            Err(_) => false,
        }
    }

    /// Event history
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Check the state invariants of a wallet that did not come from
    /// [`MultisigWallet::new`], such as one deserialized from a snapshot
    pub fn validate(&self) -> Result<(), IntegrityError> {
        self.registry.check_invariants()?;
        if self.registry.max_owners() != self.config.max_owners {
            return Err(IntegrityError::OwnerLimitMismatch {
                registry: self.registry.max_owners(),
                config: self.config.max_owners,
            });
        }

        if self.config.event_history_limit == 0 {
            return Err(IntegrityError::ZeroHistoryLimit);
        }
        if self.events.limit() != self.config.event_history_limit {
            return Err(IntegrityError::HistoryLimitMismatch {
                log: self.events.limit(),
                config: self.config.event_history_limit,
            });
        }

        self.ledger.check_invariants()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Credit custody; open to anyone
    pub fn deposit(&mut self, from: Address, amount: u128) -> Result<WalletEvent, MultisigError> {
        let result = if amount == 0 {
            Err(MultisigError::InvalidAmount)
        } else {
            self.balance
                .checked_add(amount)
                .ok_or(MultisigError::BalanceOverflow)
        };
        self.balance = Self::logged("deposit", &from, result)?;

        Ok(self.commit(WalletEvent::Deposited { from, amount }))
    }

    /// Create a transfer proposal and return its id
    pub fn propose(
        &mut self,
        caller: Address,
        destination: Address,
        amount: u128,
    ) -> Result<ProposalId, MultisigError> {
        let result = self
            .ledger
            .propose(&self.registry, &caller, destination, amount);
        let event = Self::logged("propose", &caller, result)?;

        let id = self.ledger.next_id() - 1;
        self.commit(event);
        Ok(id)
    }

    /// Approve proposal `id`
    pub fn approve(
        &mut self,
        caller: Address,
        id: ProposalId,
    ) -> Result<WalletEvent, MultisigError> {
        let result = self.ledger.approve(&self.registry, &caller, id);
        let event = Self::logged("approve", &caller, result)?;
        Ok(self.commit(event))
    }

    /// Withdraw the caller's approval of proposal `id`
    pub fn revoke(&mut self, caller: Address, id: ProposalId) -> Result<WalletEvent, MultisigError> {
        let result = self.ledger.revoke(&self.registry, &caller, id);
        let event = Self::logged("revoke", &caller, result)?;
        Ok(self.commit(event))
    }

    /// Execute proposal `id`, releasing funds through `disburser`
    ///
    /// Requires quorum and a balance strictly greater than the amount. If
    /// the disburser fails the proposal stays pending and custody is not
    /// debited.
    pub fn execute<D: Disburser + ?Sized>(
        &mut self,
        caller: Address,
        id: ProposalId,
        disburser: &mut D,
    ) -> Result<WalletEvent, MultisigError> {
        let result = self
            .ledger
            .execute(&self.registry, &caller, id, self.balance, disburser);
        let event = Self::logged("execute", &caller, result)?;

        if let WalletEvent::Executed { amount, .. } = &event {
            // Checked against the balance before disbursing
            self.balance -= *amount;
        }

        Ok(self.commit(event))
    }

    /// Add an owner (administrator only)
    pub fn add_owner(
        &mut self,
        caller: Address,
        owner: Address,
    ) -> Result<WalletEvent, MultisigError> {
        let result = self.registry.add_owner(&caller, owner);
        let event = Self::logged("add_owner", &caller, result)?;
        Ok(self.commit(event))
    }

    /// Remove an owner (administrator only)
    ///
    /// Approvals the owner already cast keep counting toward quorum.
    pub fn remove_owner(
        &mut self,
        caller: Address,
        owner: Address,
    ) -> Result<WalletEvent, MultisigError> {
        let result = self.registry.remove_owner(&caller, owner);
        let event = Self::logged("remove_owner", &caller, result)?;
        Ok(self.commit(event))
    }

    fn logged<T>(
        operation: &str,
        caller: &Address,
        result: Result<T, MultisigError>,
    ) -> Result<T, MultisigError> {
        result.inspect_err(|e| log::debug!("{} by {} rejected: {}", operation, caller.short(), e))
    }

    fn commit(&mut self, event: WalletEvent) -> WalletEvent {
        log::info!("{}", event);
        self.events.record(event).event.clone()
    }
}
