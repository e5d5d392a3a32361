//! The Maskin ledger state machine.
//!
//! [`Token`] is the authoritative ledger: balances, allowances, holder
//! registry, governed minting, pausing and delegation. [`Deputation`] is the
//! holder pool that pays out its balance in caller-chunked batches.

pub mod deputation;
pub mod replay;
pub mod shared;
pub mod storage;
pub mod token;

pub use deputation::Deputation;
pub use shared::{lock, shared, SharedToken};
pub use token::Token;
