//! Account identities
//!
//! Every participant of a multisig wallet (owners, depositors and payout
//! destinations) is identified by a 20-byte [`Address`]. The all-zero
//! address is the null address and is rejected wherever an owner or
//! destination is required.
//!
//! # Example
//!
//! ```
//! use multisig_wallet::address::Address;
//!
//! let alice = Address::from_label("alice");
//! let parsed: Address = alice.to_string().parse().unwrap();
//! assert_eq!(alice, parsed);
//! assert!(Address::ZERO.is_zero());
//! ```

pub mod address;

pub use address::{Address, AddressError, ADDRESS_LEN};
