//! Property-based tests for the wallet state machine
//!
//! Random operation sequences from a small pool of actors exercise:
//! - Tally consistency: approval count always equals the voter set size
//! - Atomic rejection: a failed call leaves wallet and payouts unchanged
//! - One event per successful call
//! - Exactly-once execution and balance conservation

use super::{MultisigError, MultisigWallet, PayoutLog, WalletEvent};
use crate::address::Address;
use proptest::prelude::*;
use std::collections::HashMap;

const ACTORS: [&str; 5] = ["alice", "bob", "carol", "dave", "erin"];

fn actor(index: usize) -> Address {
    Address::from_label(ACTORS[index % ACTORS.len()])
}

#[derive(Debug, Clone)]
enum Op {
    Deposit(usize, u128),
    Propose(usize, Option<usize>, u128),
    Approve(usize, u64),
    Revoke(usize, u64),
    Execute(usize, u64),
    AddOwner(usize, usize),
    RemoveOwner(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let who = 0..ACTORS.len();
    let id = 0u64..6;
    prop_oneof![
        (who.clone(), 0u128..200).prop_map(|(a, n)| Op::Deposit(a, n)),
        (who.clone(), proptest::option::weighted(0.9, 0..ACTORS.len()), 0u128..150)
            .prop_map(|(a, d, n)| Op::Propose(a, d, n)),
        (who.clone(), id.clone()).prop_map(|(a, i)| Op::Approve(a, i)),
        (who.clone(), id.clone()).prop_map(|(a, i)| Op::Revoke(a, i)),
        (who.clone(), id).prop_map(|(a, i)| Op::Execute(a, i)),
        (who.clone(), who.clone()).prop_map(|(a, t)| Op::AddOwner(a, t)),
        (who.clone(), who).prop_map(|(a, t)| Op::RemoveOwner(a, t)),
    ]
}

fn apply(
    wallet: &mut MultisigWallet,
    payouts: &mut PayoutLog,
    op: &Op,
) -> Result<WalletEvent, MultisigError> {
    match *op {
        Op::Deposit(a, n) => wallet.deposit(actor(a), n),
        Op::Propose(a, d, n) => {
            let destination = d.map(actor).unwrap_or(Address::ZERO);
            wallet.propose(actor(a), destination, n)?;
            Ok(wallet.events().iter().last().unwrap().event.clone())
        }
        Op::Approve(a, i) => wallet.approve(actor(a), i),
        Op::Revoke(a, i) => wallet.revoke(actor(a), i),
        Op::Execute(a, i) => wallet.execute(actor(a), i, payouts),
        Op::AddOwner(a, t) => wallet.add_owner(actor(a), actor(t)),
        Op::RemoveOwner(a, t) => wallet.remove_owner(actor(a), actor(t)),
    }
}

proptest! {
    /// Property: every call either applies with one event or changes nothing
    #[test]
    fn calls_are_atomic_and_tallies_consistent(
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let mut wallet = MultisigWallet::with_defaults(actor(0), &[actor(1), actor(2)]).unwrap();
        let mut payouts = PayoutLog::new();
        // Erin never accepts funds
        payouts.refuse(actor(4));

        let mut deposited: u128 = 0;
        let mut executions: HashMap<u64, usize> = HashMap::new();

        for op in &ops {
            let wallet_before = wallet.clone();
            let payouts_before = payouts.clone();
            let recorded_before = wallet.events().total_recorded();

            match apply(&mut wallet, &mut payouts, op) {
                Ok(event) => {
                    prop_assert_eq!(wallet.events().total_recorded(), recorded_before + 1);
                    match event {
                        WalletEvent::Deposited { amount, .. } => deposited += amount,
                        WalletEvent::Executed { id, .. } => {
                            *executions.entry(id).or_insert(0) += 1;
                        }
                        _ => {}
                    }
                }
                Err(_) => {
                    prop_assert_eq!(&wallet, &wallet_before);
                    prop_assert_eq!(&payouts, &payouts_before);
                }
            }

            for proposal in wallet.proposals() {
                prop_assert!(proposal.is_consistent());
            }
            prop_assert_eq!(wallet.validate(), Ok(()));
        }

        // Exactly-once execution
        for (id, count) in &executions {
            prop_assert_eq!(*count, 1, "proposal {} executed {} times", id, count);
            prop_assert!(wallet.proposal(*id).unwrap().is_executed());
        }

        // Balance conservation
        let paid: u128 = payouts.payouts().iter().map(|p| p.amount).sum();
        prop_assert_eq!(wallet.balance(), deposited - paid);
        prop_assert_eq!(payouts.len(), executions.len());

        // Administrator is never removed
        prop_assert!(wallet.is_owner(&actor(0)));
    }

    /// Property: approve followed by revoke by the same owner is a no-op on the tally
    #[test]
    fn approve_then_revoke_restores_tally(
        approvers in prop::collection::vec(0usize..3, 0..6),
        owner in 0usize..3,
    ) {
        let mut wallet = MultisigWallet::with_defaults(actor(0), &[actor(1), actor(2)]).unwrap();
        let id = wallet.propose(actor(0), actor(3), 10).unwrap();

        for a in approvers {
            let _ = wallet.approve(actor(a), id);
        }

        let count_before = wallet.proposal(id).unwrap().approval_count();
        if wallet.has_approved(id, &actor(owner)).unwrap() {
            wallet.revoke(actor(owner), id).unwrap();
            wallet.approve(actor(owner), id).unwrap();
        } else {
            wallet.approve(actor(owner), id).unwrap();
            wallet.revoke(actor(owner), id).unwrap();
        }

        prop_assert_eq!(wallet.proposal(id).unwrap().approval_count(), count_before);
    }

    /// Property: the quorum threshold is the smallest count meeting 3a >= 2n
    #[test]
    fn threshold_is_minimal(owners in 1usize..10_000) {
        let t = super::quorum_threshold(owners);
        prop_assert!(super::is_quorum(t, owners));
        prop_assert!(!super::is_quorum(t - 1, owners));
    }
}
