//! Multisig Wallet: a multi-owner custodial wallet in Rust
//!
//! This crate provides a shared wallet where a fixed set of co-owners must
//! jointly authorize every release of funds:
//! - Owner registry with a single administrator managing membership
//! - Append-only proposal ledger with per-owner approve/revoke voting
//! - Two-thirds integer quorum and exactly-once execution
//! - Pluggable disbursement with all-or-nothing execution
//! - Bounded event history of every state change
//! - Versioned JSON persistence that verifies state on load, with rotating backups
//!
//! # Example
//!
//! ```rust
//! use multisig_wallet::address::Address;
//! use multisig_wallet::multisig::{MultisigWallet, PayoutLog};
//!
//! let admin = Address::from_label("admin");
//! let owners = [Address::from_label("bob"), Address::from_label("carol")];
//!
//! // Create a wallet and fund it
//! let mut wallet = MultisigWallet::with_defaults(admin, &owners).unwrap();
//! wallet.deposit(Address::from_label("donor"), 1_000).unwrap();
//!
//! // Propose and approve a transfer
//! let recipient = Address::from_label("recipient");
//! let id = wallet.propose(admin, recipient, 250).unwrap();
//! wallet.approve(owners[0], id).unwrap();
//! wallet.approve(owners[1], id).unwrap();
//!
//! // Execute once quorum is met
//! let mut payouts = PayoutLog::new();
//! wallet.execute(admin, id, &mut payouts).unwrap();
//! println!("Balance: {}", wallet.balance());
//! ```

pub mod address;
pub mod cli;
pub mod multisig;
pub mod storage;

// Re-export commonly used types
pub use address::Address;
pub use multisig::{
    Disburser, IntegrityError, MultisigError, MultisigWallet, OwnerRegistry, PayoutLog, Proposal,
    ProposalId, TransactionLedger, WalletConfig, WalletEvent,
};
pub use storage::{Storage, StorageConfig, WalletSnapshot};
