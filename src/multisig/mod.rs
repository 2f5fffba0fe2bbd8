//! Multi-owner wallet with two-thirds quorum
//!
//! A fixed administrator and a set of co-owners jointly control custodied
//! funds. Any owner may propose a transfer; owners approve or revoke their
//! approval; once at least two thirds of the current owners approve, any
//! owner may execute the transfer exactly once.
//!
//! # Example
//!
//! ```
//! use multisig_wallet::address::Address;
//! use multisig_wallet::multisig::{MultisigWallet, PayoutLog};
//!
//! let alice = Address::from_label("alice");
//! let bob = Address::from_label("bob");
//! let carol = Address::from_label("carol");
//! let dave = Address::from_label("dave");
//!
//! let mut wallet = MultisigWallet::with_defaults(alice, &[bob, carol])?;
//! wallet.deposit(dave, 500)?;
//!
//! let id = wallet.propose(alice, dave, 50)?;
//! wallet.approve(bob, id)?;
//! wallet.approve(carol, id)?;
//!
//! let mut payouts = PayoutLog::new();
//! wallet.execute(alice, id, &mut payouts)?;
//! assert_eq!(wallet.balance(), 450);
//! # Ok::<(), multisig_wallet::multisig::MultisigError>(())
//! ```

pub mod config;
pub mod disburse;
pub mod error;
pub mod events;
pub mod ledger;
pub mod proposal;
pub mod quorum;
pub mod registry;
pub mod wallet;

#[cfg(test)]
mod proptests;

pub use config::WalletConfig;
pub use disburse::{DisburseError, Disburser, Payout, PayoutLog};
pub use error::{ErrorKind, IntegrityError, MultisigError};
pub use events::{EventLog, EventRecord, WalletEvent};
pub use ledger::TransactionLedger;
pub use proposal::{Proposal, ProposalId, ProposalStatus};
pub use quorum::{is_quorum, quorum_threshold};
pub use registry::OwnerRegistry;
pub use wallet::MultisigWallet;
