//! Owner registry
//!
//! Tracks which addresses may propose, approve, revoke and execute, and
//! which single owner is the administrator allowed to edit membership.
//!
//! Owners are enumerated in insertion order. Removal keeps the relative
//! order of the remaining owners.

use crate::address::Address;
use crate::multisig::error::{IntegrityError, MultisigError};
use crate::multisig::events::WalletEvent;
use serde::{Deserialize, Serialize};

/// Fails with the cap when `count` owners would exceed it
fn check_limit(max_owners: Option<usize>, count: usize) -> Result<(), usize> {
    match max_owners {
        Some(limit) if count > limit => Err(limit),
        _ => Ok(()),
    }
}

/// Owner set plus administrator identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerRegistry {
    /// Fixed at construction; always a member of `owners`
    administrator: Address,
    /// Distinct, non-null, insertion ordered
    owners: Vec<Address>,
    /// Optional membership cap, administrator included
    max_owners: Option<usize>,
}

impl OwnerRegistry {
    /// Build the registry with `caller` as administrator
    ///
    /// # Errors
    /// `EmptyOwnerSet` if `initial_owners` is empty, `NullOwner` for a null
    /// address, `DuplicateOwner` if the caller or any address repeats, and
    /// `OwnerLimitReached` if the set exceeds `max_owners`.
    pub fn initialize(
        caller: Address,
        initial_owners: &[Address],
        max_owners: Option<usize>,
    ) -> Result<Self, MultisigError> {
        if initial_owners.is_empty() {
            return Err(MultisigError::EmptyOwnerSet);
        }

        let mut owners = Vec::with_capacity(initial_owners.len() + 1);
        for &owner in std::iter::once(&caller).chain(initial_owners) {
            if owner.is_zero() {
                return Err(MultisigError::NullOwner);
            }
            if owners.contains(&owner) {
                return Err(MultisigError::DuplicateOwner(owner));
            }
            owners.push(owner);
        }

        check_limit(max_owners, owners.len())
            .map_err(|limit| MultisigError::OwnerLimitReached { limit })?;

        Ok(Self {
            administrator: caller,
            owners,
            max_owners,
        })
    }

    /// The administrator
    pub fn administrator(&self) -> Address {
        self.administrator
    }

    /// Check membership
    pub fn is_owner(&self, address: &Address) -> bool {
        self.owners.contains(address)
    }

    /// Owners in insertion order
    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    /// Number of owners
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// Membership cap, if any
    pub fn max_owners(&self) -> Option<usize> {
        self.max_owners
    }

    /// Fail with `Unauthorized` unless `caller` is an owner
    pub fn ensure_owner(&self, caller: &Address) -> Result<(), MultisigError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(MultisigError::Unauthorized(*caller))
        }
    }

    fn ensure_administrator(&self, caller: &Address) -> Result<(), MultisigError> {
        if *caller == self.administrator {
            Ok(())
        } else {
            Err(MultisigError::Unauthorized(*caller))
        }
    }

    /// Add an owner (administrator only)
    pub fn add_owner(
        &mut self,
        caller: &Address,
        owner: Address,
    ) -> Result<WalletEvent, MultisigError> {
        self.ensure_administrator(caller)?;

        if owner.is_zero() {
            return Err(MultisigError::NullOwner);
        }
        if self.is_owner(&owner) {
            return Err(MultisigError::DuplicateOwner(owner));
        }
        check_limit(self.max_owners, self.owners.len() + 1)
            .map_err(|limit| MultisigError::OwnerLimitReached { limit })?;

        self.owners.push(owner);
        Ok(WalletEvent::OwnerAdded { owner })
    }

    /// Remove an owner (administrator only)
    ///
    /// Approvals the removed owner already cast stay counted.
    pub fn remove_owner(
        &mut self,
        caller: &Address,
        owner: Address,
    ) -> Result<WalletEvent, MultisigError> {
        self.ensure_administrator(caller)?;

        if owner.is_zero() {
            return Err(MultisigError::NullOwner);
        }
        if owner == self.administrator {
            return Err(MultisigError::CannotRemoveAdministrator);
        }

        let index = self
            .owners
            .iter()
            .position(|o| *o == owner)
            .ok_or(MultisigError::NotAnOwner(owner))?;

        self.owners.remove(index);
        Ok(WalletEvent::OwnerRemoved { owner })
    }

    /// Verify the membership invariants `initialize` and the admin
    /// operations maintain
    pub fn check_invariants(&self) -> Result<(), IntegrityError> {
        if self.owners.is_empty() {
            return Err(IntegrityError::NoOwners);
        }

        for (i, owner) in self.owners.iter().enumerate() {
            if owner.is_zero() {
                return Err(IntegrityError::NullOwner);
            }
            if self.owners[..i].contains(owner) {
                return Err(IntegrityError::DuplicateOwner(*owner));
            }
        }

        if !self.is_owner(&self.administrator) {
            return Err(IntegrityError::AdministratorNotOwner(self.administrator));
        }
        check_limit(self.max_owners, self.owners.len()).map_err(|limit| {
            IntegrityError::TooManyOwners {
                count: self.owners.len(),
                limit,
            }
        })?;

        Ok(())
    }
}
