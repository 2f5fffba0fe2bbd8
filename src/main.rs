//! Multisig Wallet CLI Application
//!
//! A command-line interface for operating a multi-owner wallet.

use clap::{Parser, Subcommand};
use multisig_wallet::address::Address;
use multisig_wallet::cli::{self, parse_address, AppState};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "multisig")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "A multi-owner wallet with two-thirds quorum approval", long_about = None)]
struct Cli {
    /// Data directory for wallet storage
    #[arg(short, long, default_value = ".multisig_data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new wallet
    Init {
        /// Administrator (hex address or label)
        #[arg(short, long, value_parser = parse_address)]
        caller: Address,

        /// Additional owner; repeat for each owner
        #[arg(short, long = "owner", value_parser = parse_address, required = true)]
        owners: Vec<Address>,

        /// Maximum number of owners, administrator included
        #[arg(long)]
        max_owners: Option<usize>,

        /// Number of events to keep in the history (at least 1)
        #[arg(long)]
        history_limit: Option<usize>,
    },

    /// Deposit funds into the wallet (open to anyone)
    Deposit {
        /// Depositor
        #[arg(short, long, value_parser = parse_address)]
        from: Address,

        /// Amount to deposit
        #[arg(short, long)]
        amount: u128,
    },

    /// Propose a transfer
    Propose {
        /// Proposing owner
        #[arg(short, long, value_parser = parse_address)]
        caller: Address,

        /// Recipient
        #[arg(short, long, value_parser = parse_address)]
        to: Address,

        /// Amount to transfer
        #[arg(short, long)]
        amount: u128,
    },

    /// Approve a proposal
    Approve {
        #[arg(short, long, value_parser = parse_address)]
        caller: Address,

        /// Proposal id
        #[arg(short, long)]
        id: u64,
    },

    /// Revoke an approval
    Revoke {
        #[arg(short, long, value_parser = parse_address)]
        caller: Address,

        /// Proposal id
        #[arg(short, long)]
        id: u64,
    },

    /// Execute an approved proposal
    Execute {
        #[arg(short, long, value_parser = parse_address)]
        caller: Address,

        /// Proposal id
        #[arg(short, long)]
        id: u64,
    },

    /// Add an owner (administrator only)
    AddOwner {
        #[arg(short, long, value_parser = parse_address)]
        caller: Address,

        /// Owner to add
        #[arg(short, long, value_parser = parse_address)]
        owner: Address,
    },

    /// Remove an owner (administrator only)
    RemoveOwner {
        #[arg(short, long, value_parser = parse_address)]
        caller: Address,

        /// Owner to remove
        #[arg(short, long, value_parser = parse_address)]
        owner: Address,
    },

    /// List owners
    Owners,

    /// List proposals
    Proposals {
        /// Only show proposals that have not executed
        #[arg(short, long)]
        pending: bool,
    },

    /// Show a proposal
    Show {
        /// Proposal id
        #[arg(short, long)]
        id: u64,
    },

    /// Show wallet summary
    Status,

    /// Show recent events
    Events {
        /// Number of events to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },

    /// Show released funds
    Payouts,

    /// List saved backups
    Backups,

    /// Restore a backup as the current wallet
    Restore {
        /// Backup generation; 1 is the most recent
        #[arg(short, long, default_value = "1")]
        generation: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Handle init command separately (no saved state yet)
    if let Commands::Init {
        caller,
        owners,
        max_owners,
        history_limit,
    } = &cli.command
    {
        return cli::cmd_init(&cli.data_dir, *caller, owners, *max_owners, *history_limit);
    }

    let mut state = AppState::load(cli.data_dir.clone())?;

    match cli.command {
        Commands::Init { .. } => unreachable!(),

        Commands::Deposit { from, amount } => cli::cmd_deposit(&mut state, from, amount)?,
        Commands::Propose { caller, to, amount } => {
            cli::cmd_propose(&mut state, caller, to, amount)?
        }
        Commands::Approve { caller, id } => cli::cmd_approve(&mut state, caller, id)?,
        Commands::Revoke { caller, id } => cli::cmd_revoke(&mut state, caller, id)?,
        Commands::Execute { caller, id } => cli::cmd_execute(&mut state, caller, id)?,
        Commands::AddOwner { caller, owner } => cli::cmd_add_owner(&mut state, caller, owner)?,
        Commands::RemoveOwner { caller, owner } => {
            cli::cmd_remove_owner(&mut state, caller, owner)?
        }

        Commands::Owners => cli::cmd_owners(&state)?,
        Commands::Proposals { pending } => cli::cmd_proposals(&state, pending)?,
        Commands::Show { id } => cli::cmd_show(&state, id)?,
        Commands::Status => cli::cmd_status(&state)?,
        Commands::Events { count } => cli::cmd_events(&state, count)?,
        Commands::Payouts => cli::cmd_payouts(&state)?,
        Commands::Backups => cli::cmd_backups(&state)?,
        Commands::Restore { generation } => cli::cmd_restore(&mut state, generation)?,
    }

    Ok(())
}
