//! Shared domain types for the Maskin ledger.
//!
//! Everything in here is plain data plus pure functions: addresses, amounts,
//! revenue split rates, role sets, mint requests, events and errors. The
//! stateful contracts live in `maskin_ledger`.

pub mod access;
pub mod amount;
pub mod config;
pub mod crypto;
pub mod error;
pub mod event;
pub mod mint;
pub mod rates;
