//! Ledger error codes
//!
//! Range: 0x0300 - 0x03FF
//! Format: LEDGER_ERROR_<CATEGORY>_<SPECIFIC>

use thiserror::Error;

// ===== Authorization Errors (0x0300 - 0x030F) =====

pub const LEDGER_ERROR_UNAUTHORIZED: u64 = 0x0300;

// ===== Validation Errors (0x0310 - 0x031F) =====

pub const LEDGER_ERROR_INVALID_ARGUMENT: u64 = 0x0310;
pub const LEDGER_ERROR_LENGTH_MISMATCH: u64 = 0x0311;

// ===== State Transition Errors (0x0320 - 0x032F) =====

pub const LEDGER_ERROR_ALREADY_EXECUTED: u64 = 0x0320;
pub const LEDGER_ERROR_ALREADY_MINTED: u64 = 0x0321;
pub const LEDGER_ERROR_INVALID_STATE_TRANSITION: u64 = 0x0322;

// ===== Lookup Errors (0x0330 - 0x033F) =====

pub const LEDGER_ERROR_NOT_FOUND: u64 = 0x0330;
pub const LEDGER_ERROR_INDEX_OUT_OF_RANGE: u64 = 0x0331;

// ===== Balance Errors (0x0340 - 0x034F) =====

pub const LEDGER_ERROR_INSUFFICIENT_FUNDS: u64 = 0x0340;
pub const LEDGER_ERROR_INSUFFICIENT_ALLOWANCE: u64 = 0x0341;
pub const LEDGER_ERROR_INSUFFICIENT_POOL_BALANCE: u64 = 0x0342;
pub const LEDGER_ERROR_OVERFLOW: u64 = 0x0343;

// ===== Runtime Errors (0x0350 - 0x035F) =====

pub const LEDGER_ERROR_CONTRACT_PAUSED: u64 = 0x0350;
pub const LEDGER_ERROR_LEDGER_NOT_CONFIGURED: u64 = 0x0351;
pub const LEDGER_ERROR_LOCK_POISONED: u64 = 0x0352;

/// Every way a ledger operation can be rejected.
///
/// A rejected operation leaves no trace in state: the caller gets the error
/// and nothing else.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Caller is not authorized for this operation")]
    Unauthorized,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Length mismatch: {holders} holders for {amounts} amounts")]
    LengthMismatch { holders: usize, amounts: usize },
    #[error("Mint request {0} was already executed")]
    AlreadyExecuted(u64),
    #[error("Initial supply was already minted")]
    AlreadyMinted,
    #[error("Invalid state transition")]
    InvalidStateTransition,
    #[error("Mint request {0} not found")]
    NotFound(u64),
    #[error("Index {index} out of range, count is {count}")]
    IndexOutOfRange { index: u64, count: u64 },
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Insufficient allowance")]
    InsufficientAllowance,
    #[error("Insufficient pool balance")]
    InsufficientPoolBalance,
    #[error("Contract is paused")]
    ContractPaused,
    #[error("No token ledger configured")]
    LedgerNotConfigured,
    #[error("Arithmetic overflow")]
    Overflow,
    #[error("Ledger lock is poisoned")]
    LockPoisoned,
}

impl LedgerError {
    /// Convert error to u64 error code
    pub fn to_code(&self) -> u64 {
        match self {
            Self::Unauthorized => LEDGER_ERROR_UNAUTHORIZED,
            Self::InvalidArgument(_) => LEDGER_ERROR_INVALID_ARGUMENT,
            Self::LengthMismatch { .. } => LEDGER_ERROR_LENGTH_MISMATCH,
            Self::AlreadyExecuted(_) => LEDGER_ERROR_ALREADY_EXECUTED,
            Self::AlreadyMinted => LEDGER_ERROR_ALREADY_MINTED,
            Self::InvalidStateTransition => LEDGER_ERROR_INVALID_STATE_TRANSITION,
            Self::NotFound(_) => LEDGER_ERROR_NOT_FOUND,
            Self::IndexOutOfRange { .. } => LEDGER_ERROR_INDEX_OUT_OF_RANGE,
            Self::InsufficientFunds => LEDGER_ERROR_INSUFFICIENT_FUNDS,
            Self::InsufficientAllowance => LEDGER_ERROR_INSUFFICIENT_ALLOWANCE,
            Self::InsufficientPoolBalance => LEDGER_ERROR_INSUFFICIENT_POOL_BALANCE,
            Self::ContractPaused => LEDGER_ERROR_CONTRACT_PAUSED,
            Self::LedgerNotConfigured => LEDGER_ERROR_LEDGER_NOT_CONFIGURED,
            Self::Overflow => LEDGER_ERROR_OVERFLOW,
            Self::LockPoisoned => LEDGER_ERROR_LOCK_POISONED,
        }
    }

    pub fn invalid(reason: &str) -> Self {
        Self::InvalidArgument(reason.to_owned())
    }
}
