use super::{LedgerProvider, TokenSettings};
use indexmap::IndexSet;
use maskin_common::{
    access::AccessRegistry,
    amount::{Amount, U256},
    crypto::Address,
    error::LedgerError,
    mint::MintRequest,
};
use std::collections::HashMap;

/// Balances, allowances and total supply.
///
/// Kept apart from the rest of the token state so the owner can swap it out
/// wholesale (`Token::set_balance_sheet`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSheet {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl BalanceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Sum of every balance, `None` if it does not fit in 256 bits
    pub fn sum_of_balances(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(U256::zero(), |acc, balance| acc.checked_add(*balance))
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    fn set_balance(&mut self, account: &Address, balance: Amount) {
        if balance.is_zero() {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, balance);
        }
    }

    fn set_allowance(&mut self, owner: &Address, spender: &Address, value: Amount) {
        // Zero allowance is the same as no allowance
        if value.is_zero() {
            self.allowances.remove(&(*owner, *spender));
        } else {
            self.allowances.insert((*owner, *spender), value);
        }
    }
}

/// Committed state of one token ledger.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    sheet: BalanceSheet,
    holders: IndexSet<Address>,
    mint_requests: Vec<MintRequest>,
    access: AccessRegistry,
    paused: bool,
    delegated_from: Address,
    settings: TokenSettings,
}

impl MemoryStorage {
    pub fn new(access: AccessRegistry, settings: TokenSettings) -> Self {
        Self {
            sheet: BalanceSheet::new(),
            holders: IndexSet::new(),
            mint_requests: Vec::new(),
            access,
            paused: false,
            delegated_from: Address::null(),
            settings,
        }
    }

    pub fn sheet(&self) -> &BalanceSheet {
        &self.sheet
    }

    /// Swap the balance sheet, returning the previous one
    pub fn replace_sheet(&mut self, sheet: BalanceSheet) -> BalanceSheet {
        std::mem::replace(&mut self.sheet, sheet)
    }

    pub fn access(&self) -> &AccessRegistry {
        &self.access
    }

    pub fn holders(&self) -> impl Iterator<Item = &Address> {
        self.holders.iter()
    }
}

impl LedgerProvider for MemoryStorage {
    fn get_balance(&self, account: &Address) -> Result<Amount, LedgerError> {
        Ok(self.sheet.balance_of(account))
    }

    fn set_balance(&mut self, account: &Address, balance: Amount) -> Result<(), LedgerError> {
        self.sheet.set_balance(account, balance);
        Ok(())
    }

    fn get_total_supply(&self) -> Result<Amount, LedgerError> {
        Ok(self.sheet.total_supply)
    }

    fn set_total_supply(&mut self, supply: Amount) -> Result<(), LedgerError> {
        self.sheet.total_supply = supply;
        Ok(())
    }

    fn get_allowance(&self, owner: &Address, spender: &Address) -> Result<Amount, LedgerError> {
        Ok(self.sheet.allowance(owner, spender))
    }

    fn set_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        value: Amount,
    ) -> Result<(), LedgerError> {
        self.sheet.set_allowance(owner, spender, value);
        Ok(())
    }

    fn get_holder_count(&self) -> Result<u64, LedgerError> {
        Ok(self.holders.len() as u64)
    }

    fn get_holder(&self, index: u64) -> Result<Option<Address>, LedgerError> {
        let index = usize::try_from(index).map_err(|_| LedgerError::Overflow)?;
        Ok(self.holders.get_index(index).copied())
    }

    fn is_holder(&self, account: &Address) -> Result<bool, LedgerError> {
        Ok(self.holders.contains(account))
    }

    fn add_holder(&mut self, account: &Address) -> Result<(), LedgerError> {
        self.holders.insert(*account);
        Ok(())
    }

    fn get_mint_request_count(&self) -> Result<u64, LedgerError> {
        Ok(self.mint_requests.len() as u64)
    }

    fn get_mint_request(&self, id: u64) -> Result<Option<MintRequest>, LedgerError> {
        let id = usize::try_from(id).map_err(|_| LedgerError::Overflow)?;
        Ok(self.mint_requests.get(id).cloned())
    }

    fn add_mint_request(&mut self, request: MintRequest) -> Result<u64, LedgerError> {
        let id = self.mint_requests.len() as u64;
        self.mint_requests.push(request);
        Ok(id)
    }

    fn set_mint_request(&mut self, id: u64, request: MintRequest) -> Result<(), LedgerError> {
        let slot = usize::try_from(id)
            .ok()
            .and_then(|index| self.mint_requests.get_mut(index))
            .ok_or(LedgerError::NotFound(id))?;
        *slot = request;
        Ok(())
    }

    fn get_access(&self) -> Result<AccessRegistry, LedgerError> {
        Ok(self.access.clone())
    }

    fn set_access(&mut self, access: AccessRegistry) -> Result<(), LedgerError> {
        self.access = access;
        Ok(())
    }

    fn is_paused(&self) -> Result<bool, LedgerError> {
        Ok(self.paused)
    }

    fn set_paused(&mut self, paused: bool) -> Result<(), LedgerError> {
        self.paused = paused;
        Ok(())
    }

    fn get_delegated_from(&self) -> Result<Address, LedgerError> {
        Ok(self.delegated_from)
    }

    fn set_delegated_from(&mut self, addr: &Address) -> Result<(), LedgerError> {
        self.delegated_from = *addr;
        Ok(())
    }

    fn get_settings(&self) -> Result<TokenSettings, LedgerError> {
        Ok(self.settings.clone())
    }

    fn set_settings(&mut self, settings: TokenSettings) -> Result<(), LedgerError> {
        self.settings = settings;
        Ok(())
    }
}
