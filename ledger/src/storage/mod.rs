//! Ledger storage
//!
//! Operations never touch storage directly: they read and write through a
//! [`LedgerProvider`], which during execution is an [`OverlayStorage`] layered
//! over the committed [`MemoryStorage`].

mod memory;
mod overlay;

pub use memory::{BalanceSheet, MemoryStorage};
pub use overlay::{LedgerKey, LedgerOverlay, LedgerValue, OverlayStorage};

use maskin_common::{
    access::AccessRegistry, amount::Amount, crypto::Address, error::LedgerError,
    mint::MintRequest, rates::PaidRates,
};
use serde::{Deserialize, Serialize};

/// Token-wide configuration that admins may change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Receives the system share of each mint
    pub wallet: Address,
    /// Holder pool, receives the holder share of each mint
    pub deputation: Address,
    pub rates: PaidRates,
    /// Genesis allocation credited by `pre_mint`
    #[serde(with = "maskin_common::amount::decimal")]
    pub initial_supply: Amount,
    pub pre_minted: bool,
}

// ===== Ledger Provider Trait =====

pub trait LedgerProvider {
    // ===== Balance Operations =====

    /// Get balance for account, 0 if never credited
    fn get_balance(&self, account: &Address) -> Result<Amount, LedgerError>;

    /// Set balance for account
    fn set_balance(&mut self, account: &Address, balance: Amount) -> Result<(), LedgerError>;

    /// Get total supply
    fn get_total_supply(&self) -> Result<Amount, LedgerError>;

    /// Set total supply
    fn set_total_supply(&mut self, supply: Amount) -> Result<(), LedgerError>;

    // ===== Allowance Operations =====

    /// Get allowance granted by owner to spender
    fn get_allowance(&self, owner: &Address, spender: &Address) -> Result<Amount, LedgerError>;

    /// Set allowance granted by owner to spender
    fn set_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        value: Amount,
    ) -> Result<(), LedgerError>;

    // ===== Holder Registry =====

    fn get_holder_count(&self) -> Result<u64, LedgerError>;

    fn get_holder(&self, index: u64) -> Result<Option<Address>, LedgerError>;

    fn is_holder(&self, account: &Address) -> Result<bool, LedgerError>;

    /// Append a holder. Callers check `is_holder` first.
    fn add_holder(&mut self, account: &Address) -> Result<(), LedgerError>;

    // ===== Mint Requests =====

    fn get_mint_request_count(&self) -> Result<u64, LedgerError>;

    fn get_mint_request(&self, id: u64) -> Result<Option<MintRequest>, LedgerError>;

    /// Append a mint request and return its id
    fn add_mint_request(&mut self, request: MintRequest) -> Result<u64, LedgerError>;

    /// Overwrite an existing mint request
    fn set_mint_request(&mut self, id: u64, request: MintRequest) -> Result<(), LedgerError>;

    // ===== Contract State =====

    fn get_access(&self) -> Result<AccessRegistry, LedgerError>;

    fn set_access(&mut self, access: AccessRegistry) -> Result<(), LedgerError>;

    fn is_paused(&self) -> Result<bool, LedgerError>;

    fn set_paused(&mut self, paused: bool) -> Result<(), LedgerError>;

    /// Delegate-of-record, null when delegation is disabled
    fn get_delegated_from(&self) -> Result<Address, LedgerError>;

    fn set_delegated_from(&mut self, addr: &Address) -> Result<(), LedgerError>;

    fn get_settings(&self) -> Result<TokenSettings, LedgerError>;

    fn set_settings(&mut self, settings: TokenSettings) -> Result<(), LedgerError>;
}
