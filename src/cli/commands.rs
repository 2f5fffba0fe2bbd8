//! CLI commands for the multisig wallet
//!
//! Each handler loads the saved wallet, applies one operation and saves the
//! result only if the operation succeeded.

use crate::address::{Address, AddressError};
use crate::multisig::{MultisigWallet, ProposalId, ProposalStatus, WalletConfig, WalletEvent};
use crate::storage::{Storage, StorageConfig, WalletSnapshot};
use std::path::{Path, PathBuf};

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Parse an address given as hex (`0x…`) or as a label
///
/// Labels are turned into addresses with [`Address::from_label`].
pub fn parse_address(input: &str) -> Result<Address, AddressError> {
    if input.starts_with("0x") || input.starts_with("0X") {
        input.parse()
    } else {
        Ok(Address::from_label(input))
    }
}

/// Application state
pub struct AppState {
    pub snapshot: WalletSnapshot,
    pub storage: Storage,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load the saved wallet from `data_dir`
    pub fn load(data_dir: PathBuf) -> CliResult<Self> {
        let storage = open_storage(&data_dir)?;

        if !storage.exists() {
            return Err(format!(
                "no wallet found in {:?}; create one with: multisig init",
                data_dir
            )
            .into());
        }

        let snapshot = storage.load()?;
        Ok(Self {
            snapshot,
            storage,
            data_dir,
        })
    }

    /// Save the current state
    pub fn save(&self) -> CliResult<()> {
        self.storage.save(&self.snapshot)?;
        Ok(())
    }

    fn wallet(&self) -> &MultisigWallet {
        &self.snapshot.wallet
    }
}

fn open_storage(data_dir: &Path) -> CliResult<Storage> {
    let storage_config = StorageConfig {
        data_dir: data_dir.to_path_buf(),
        ..Default::default()
    };
    Ok(Storage::new(storage_config)?)
}

fn print_event(event: &WalletEvent) {
    println!("✅ {}", event);
}

/// Create a new wallet administered by `caller`
pub fn cmd_init(
    data_dir: &Path,
    caller: Address,
    owners: &[Address],
    max_owners: Option<usize>,
    history_limit: Option<usize>,
) -> CliResult<()> {
    let storage = open_storage(data_dir)?;

    if storage.exists() {
        println!("⚠️  Wallet already exists at {:?}", data_dir);
        return Ok(());
    }

    let mut config = WalletConfig::default();
    if let Some(max) = max_owners {
        config = config.with_max_owners(max);
    }
    if let Some(limit) = history_limit {
        config = config.with_event_history_limit(limit);
    }

    let wallet = MultisigWallet::new(caller, owners, config)?;
    storage.save(&WalletSnapshot::new(wallet.clone()))?;

    println!("🔐 Multisig wallet initialized!");
    println!("   📁 Data directory: {:?}", data_dir);
    println!("   👑 Administrator: {}", wallet.administrator());
    println!("   👥 Owners: {}", wallet.owner_count());
    println!(
        "   🗳️  Quorum: {}-of-{}",
        wallet.quorum_threshold(),
        wallet.owner_count()
    );

    Ok(())
}

/// Credit custody
pub fn cmd_deposit(state: &mut AppState, from: Address, amount: u128) -> CliResult<()> {
    let event = state.snapshot.wallet.deposit(from, amount)?;
    state.save()?;

    print_event(&event);
    println!("   💰 Balance: {}", state.wallet().balance());
    Ok(())
}

/// Propose a transfer
pub fn cmd_propose(
    state: &mut AppState,
    caller: Address,
    to: Address,
    amount: u128,
) -> CliResult<()> {
    let id = state.snapshot.wallet.propose(caller, to, amount)?;
    state.save()?;

    println!("📝 Proposal #{} created", id);
    println!("   To: {}", to);
    println!("   Amount: {}", amount);
    println!(
        "   Needs {} approval(s) to execute",
        state.wallet().quorum_threshold()
    );
    Ok(())
}

/// Approve a proposal
pub fn cmd_approve(state: &mut AppState, caller: Address, id: ProposalId) -> CliResult<()> {
    let event = state.snapshot.wallet.approve(caller, id)?;
    state.save()?;

    print_event(&event);
    print_tally(state.wallet(), id)
}

/// Revoke an approval
pub fn cmd_revoke(state: &mut AppState, caller: Address, id: ProposalId) -> CliResult<()> {
    let event = state.snapshot.wallet.revoke(caller, id)?;
    state.save()?;

    print_event(&event);
    print_tally(state.wallet(), id)
}

/// Execute a proposal
pub fn cmd_execute(state: &mut AppState, caller: Address, id: ProposalId) -> CliResult<()> {
    let snapshot = &mut state.snapshot;
    let event = snapshot.wallet.execute(caller, id, &mut snapshot.payouts)?;
    state.save()?;

    print_event(&event);
    println!("   💰 Remaining balance: {}", state.wallet().balance());
    Ok(())
}

/// Add an owner
pub fn cmd_add_owner(state: &mut AppState, caller: Address, owner: Address) -> CliResult<()> {
    let event = state.snapshot.wallet.add_owner(caller, owner)?;
    state.save()?;

    print_event(&event);
    println!("   👥 Owners: {}", state.wallet().owner_count());
    Ok(())
}

/// Remove an owner
pub fn cmd_remove_owner(state: &mut AppState, caller: Address, owner: Address) -> CliResult<()> {
    let event = state.snapshot.wallet.remove_owner(caller, owner)?;
    state.save()?;

    print_event(&event);
    println!("   👥 Owners: {}", state.wallet().owner_count());
    Ok(())
}

fn print_tally(wallet: &MultisigWallet, id: ProposalId) -> CliResult<()> {
    let proposal = wallet.proposal(id)?;
    println!(
        "   🗳️  Approvals: {}/{}",
        proposal.approval_count(),
        wallet.quorum_threshold()
    );
    if wallet.is_executable(id) {
        println!("   ▶️  Ready to execute");
    }
    Ok(())
}

/// List owners
pub fn cmd_owners(state: &AppState) -> CliResult<()> {
    let wallet = state.wallet();

    println!("👥 Owners ({}):", wallet.owner_count());
    for owner in wallet.list_owners() {
        if *owner == wallet.administrator() {
            println!("   {} (administrator)", owner);
        } else {
            println!("   {}", owner);
        }
    }
    Ok(())
}

/// List proposals
pub fn cmd_proposals(state: &AppState, pending_only: bool) -> CliResult<()> {
    let wallet = state.wallet();
    let proposals: Vec<_> = if pending_only {
        wallet.pending_proposals()
    } else {
        wallet.proposals().iter().collect()
    };

    if proposals.is_empty() {
        println!("📭 No proposals. Create one with: multisig propose");
        return Ok(());
    }

    println!("📋 Proposals:");
    for p in proposals {
        let status = match p.status() {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Executed => "executed",
        };
        println!(
            "   #{} | {} -> {} | {} approval(s) | {}",
            p.id,
            p.amount,
            p.destination.short(),
            p.approval_count(),
            status
        );
    }
    Ok(())
}

/// Show one proposal in detail
pub fn cmd_show(state: &AppState, id: ProposalId) -> CliResult<()> {
    let wallet = state.wallet();
    let proposal = wallet.proposal(id)?;

    println!("📄 Proposal #{}", proposal.id);
    println!("   ├─ Proposer: {}", proposal.proposer);
    println!("   ├─ Destination: {}", proposal.destination);
    println!("   ├─ Amount: {}", proposal.amount);
    println!("   ├─ Status: {:?}", proposal.status());
    println!(
        "   ├─ Created: {}",
        proposal.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    if let Some(at) = proposal.executed_at {
        println!("   ├─ Executed: {}", at.format("%Y-%m-%d %H:%M:%S"));
    }
    println!(
        "   └─ Approvals: {}/{}",
        proposal.approval_count(),
        wallet.quorum_threshold()
    );
    for approver in proposal.approvers() {
        let note = if wallet.is_owner(approver) {
            ""
        } else {
            " (no longer an owner)"
        };
        println!("      └─ {}{}", approver, note);
    }
    Ok(())
}

/// Show wallet summary
pub fn cmd_status(state: &AppState) -> CliResult<()> {
    let wallet = state.wallet();

    println!("🔐 Multisig Wallet");
    println!("   ├─ Administrator: {}", wallet.administrator());
    println!("   ├─ Owners: {}", wallet.owner_count());
    match wallet.config().max_owners {
        Some(max) => println!("   ├─ Owner limit: {}", max),
        None => println!("   ├─ Owner limit: none"),
    }
    println!(
        "   ├─ Quorum: {}-of-{}",
        wallet.quorum_threshold(),
        wallet.owner_count()
    );
    println!("   ├─ Balance: {}", wallet.balance());
    println!("   ├─ Proposals: {}", wallet.proposal_count());
    println!("   ├─ Pending: {}", wallet.pending_proposals().len());
    println!("   └─ Payouts: {}", state.snapshot.payouts.len());
    Ok(())
}

/// Show recent events
pub fn cmd_events(state: &AppState, count: usize) -> CliResult<()> {
    let events = state.wallet().events();

    if events.is_empty() {
        println!("📭 No events recorded yet.");
        return Ok(());
    }

    println!(
        "📜 Events (showing {} of {} recorded):",
        count.min(events.len()),
        events.total_recorded()
    );
    for record in events.recent(count) {
        println!(
            "   {} | {} | {}",
            record.sequence,
            record.recorded_at.format("%Y-%m-%d %H:%M:%S"),
            record.event
        );
    }
    Ok(())
}

/// List backup generations with a summary of each
pub fn cmd_backups(state: &AppState) -> CliResult<()> {
    let generations = state.storage.list_backups();

    if generations.is_empty() {
        println!("📭 No backups yet.");
        return Ok(());
    }

    println!("🗂️  Backups (1 is the most recent):");
    for generation in generations {
        match state.storage.restore_backup(generation) {
            Ok(backup) => println!(
                "   {} | balance {} | {} proposals | {} owners",
                generation,
                backup.wallet.balance(),
                backup.wallet.proposal_count(),
                backup.wallet.owner_count()
            ),
            Err(e) => println!("   {} | ❌ {}", generation, e),
        }
    }
    Ok(())
}

/// Replace the current wallet with a backup generation
///
/// The replaced state becomes backup 1, so a restore can itself be undone.
pub fn cmd_restore(state: &mut AppState, generation: usize) -> CliResult<()> {
    state.snapshot = state.storage.restore_backup(generation)?;
    state.save()?;

    println!("♻️  Restored backup {}", generation);
    println!("   ├─ Balance: {}", state.wallet().balance());
    println!("   └─ Proposals: {}", state.wallet().proposal_count());
    Ok(())
}

/// Show released funds
pub fn cmd_payouts(state: &AppState) -> CliResult<()> {
    let payouts = state.snapshot.payouts.payouts();

    if payouts.is_empty() {
        println!("📭 No payouts yet.");
        return Ok(());
    }

    println!("💸 Payouts:");
    for payout in payouts {
        println!(
            "   {} -> {} at {}",
            payout.amount,
            payout.to,
            payout.paid_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}
