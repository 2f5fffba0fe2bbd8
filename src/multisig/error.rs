//! Multisig wallet errors
//!
//! Every error is a caller-correctable rejection. A call that returns an
//! error has not changed any wallet state.

use crate::address::Address;
use crate::multisig::proposal::ProposalId;
use thiserror::Error;

/// Errors related to multisig operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultisigError {
    // Authorization
    #[error("Caller not authorized: {0}")]
    Unauthorized(Address),
    #[error("Not an owner: {0}")]
    NotAnOwner(Address),

    // Validation
    #[error("Owner address cannot be the null address")]
    NullOwner,
    #[error("Duplicate owner: {0}")]
    DuplicateOwner(Address),
    #[error("Destination cannot be the null address")]
    NullDestination,
    #[error("Invalid amount: amount must be greater than 0")]
    InvalidAmount,
    #[error("Invalid proposal id {id}: {count} proposals exist")]
    InvalidId { id: ProposalId, count: u64 },
    #[error("Initial owner set is empty")]
    EmptyOwnerSet,
    #[error("Owner limit reached: at most {limit} owners")]
    OwnerLimitReached { limit: usize },
    #[error("Event history limit must be at least 1")]
    ZeroHistoryLimit,

    // State
    #[error("Proposal {id} already approved by {owner}")]
    AlreadyApproved { id: ProposalId, owner: Address },
    #[error("Proposal {id} not approved by {owner}")]
    NotApproved { id: ProposalId, owner: Address },
    #[error("Proposal {0} already executed")]
    AlreadyExecuted(ProposalId),
    #[error("The administrator cannot be removed")]
    CannotRemoveAdministrator,

    // Resource
    #[error("Quorum not met: have {approvals} approvals from {owners} owners, need {required}")]
    QuorumNotMet {
        approvals: u32,
        owners: usize,
        required: u32,
    },
    #[error("Insufficient funds: balance {balance} must exceed {amount}")]
    InsufficientFunds { balance: u128, amount: u128 },
    #[error("Disbursement failed: {0}")]
    DisbursementFailed(String),
    #[error("Balance overflow")]
    BalanceOverflow,
}

/// A broken state invariant found in a wallet that was not built through
/// its own operations, such as one read back from disk
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("Owner set is empty")]
    NoOwners,
    #[error("Null address in owner set")]
    NullOwner,
    #[error("Owner {0} listed more than once")]
    DuplicateOwner(Address),
    #[error("Administrator {0} is not an owner")]
    AdministratorNotOwner(Address),
    #[error("{count} owners exceed the limit of {limit}")]
    TooManyOwners { count: usize, limit: usize },
    #[error("Owner limit {registry:?} disagrees with configured {config:?}")]
    OwnerLimitMismatch {
        registry: Option<usize>,
        config: Option<usize>,
    },
    #[error("Proposal at index {index} carries id {id}")]
    MisplacedProposal { index: u64, id: ProposalId },
    #[error("Proposal {id} counts {count} approvals but lists {approvers} approvers")]
    TallyMismatch {
        id: ProposalId,
        count: u32,
        approvers: usize,
    },
    #[error("Proposal {0} has a null destination")]
    NullDestination(ProposalId),
    #[error("Proposal {0} has a zero amount")]
    ZeroAmount(ProposalId),
    #[error("Proposal {0} execution time disagrees with its status")]
    ExecutionMismatch(ProposalId),
    #[error("Event history limit {log} disagrees with configured {config}")]
    HistoryLimitMismatch { log: usize, config: usize },
    #[error("Event history limit must be at least 1")]
    ZeroHistoryLimit,
}

/// Broad category of a [`MultisigError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    Validation,
    State,
    Resource,
}

impl MultisigError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) | Self::NotAnOwner(_) => ErrorKind::Authorization,
            Self::NullOwner
            | Self::DuplicateOwner(_)
            | Self::NullDestination
            | Self::InvalidAmount
            | Self::InvalidId { .. }
            | Self::EmptyOwnerSet
            | Self::OwnerLimitReached { .. }
            | Self::ZeroHistoryLimit => ErrorKind::Validation,
            Self::AlreadyApproved { .. }
            | Self::NotApproved { .. }
            | Self::AlreadyExecuted(_)
            | Self::CannotRemoveAdministrator => ErrorKind::State,
            Self::QuorumNotMet { .. }
            | Self::InsufficientFunds { .. }
            | Self::DisbursementFailed(_)
            | Self::BalanceOverflow => ErrorKind::Resource,
        }
    }
}
