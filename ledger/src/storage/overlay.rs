use super::{LedgerProvider, TokenSettings};
use maskin_common::{
    access::AccessRegistry, amount::Amount, crypto::Address, error::LedgerError,
    mint::MintRequest,
};
use std::collections::HashMap;

/// Key types for overlay storage
///
/// Ordering matters: [`LedgerOverlay::apply`] replays changes in key order so
/// appended holders and mint requests land at the indices they were given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LedgerKey {
    // ===== Balance sheet =====
    Balance(Address),
    Allowance { owner: Address, spender: Address },
    TotalSupply,

    // ===== Append-only logs =====
    Holder(u64),
    HolderFlag(Address),
    HolderCount,
    MintRequest(u64),
    MintRequestCount,

    // ===== Contract state =====
    Access,
    Paused,
    DelegatedFrom,
    Settings,
}

/// Value types for overlay storage
#[derive(Debug, Clone)]
pub enum LedgerValue {
    Amount(Amount),
    Count(u64),
    Flag(bool),
    Address(Address),
    MintRequest(MintRequest),
    Access(Box<AccessRegistry>),
    Settings(Box<TokenSettings>),
}

/// Writes accumulated by one operation.
///
/// On success the changes are applied to the committed storage. On failure
/// the overlay is dropped and nothing it recorded is ever visible.
#[derive(Debug, Clone, Default)]
pub struct LedgerOverlay {
    changes: HashMap<LedgerKey, LedgerValue>,
}

impl LedgerOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, key: &LedgerKey) -> Option<&LedgerValue> {
        self.changes.get(key)
    }

    pub fn set(&mut self, key: LedgerKey, value: LedgerValue) {
        self.changes.insert(key, value);
    }

    /// Write every change into `target`.
    ///
    /// Every entry is type-checked before the first write, so a corrupt
    /// overlay is rejected whole. The writes themselves cannot fail against
    /// [`MemoryStorage`](super::MemoryStorage): its setters are infallible
    /// and mint requests are only updated below the committed count.
    pub fn apply<P: LedgerProvider>(self, target: &mut P) -> Result<(), LedgerError> {
        let mut changes: Vec<_> = self.changes.into_iter().collect();
        if let Some((key, _)) = changes.iter().find(|(key, value)| !fits(key, value)) {
            return Err(corrupt(key));
        }
        changes.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (key, value) in changes {
            match (key, value) {
                (LedgerKey::Balance(account), LedgerValue::Amount(balance)) => {
                    target.set_balance(&account, balance)?
                }
                (LedgerKey::Allowance { owner, spender }, LedgerValue::Amount(value)) => {
                    target.set_allowance(&owner, &spender, value)?
                }
                (LedgerKey::TotalSupply, LedgerValue::Amount(supply)) => {
                    target.set_total_supply(supply)?
                }
                (LedgerKey::Holder(_), LedgerValue::Address(account)) => {
                    target.add_holder(&account)?
                }
                (LedgerKey::MintRequest(id), LedgerValue::MintRequest(request)) => {
                    if id < target.get_mint_request_count()? {
                        target.set_mint_request(id, request)?;
                    } else {
                        target.add_mint_request(request)?;
                    }
                }
                (LedgerKey::Access, LedgerValue::Access(access)) => target.set_access(*access)?,
                (LedgerKey::Paused, LedgerValue::Flag(paused)) => target.set_paused(paused)?,
                (LedgerKey::DelegatedFrom, LedgerValue::Address(addr)) => {
                    target.set_delegated_from(&addr)?
                }
                (LedgerKey::Settings, LedgerValue::Settings(settings)) => {
                    target.set_settings(*settings)?
                }
                // Derived from the appends above
                (LedgerKey::HolderFlag(_), _)
                | (LedgerKey::HolderCount, _)
                | (LedgerKey::MintRequestCount, _) => {}
                (key, _) => return Err(corrupt(&key)),
            }
        }
        Ok(())
    }
}

fn fits(key: &LedgerKey, value: &LedgerValue) -> bool {
    matches!(
        (key, value),
        (
            LedgerKey::Balance(_) | LedgerKey::Allowance { .. } | LedgerKey::TotalSupply,
            LedgerValue::Amount(_)
        ) | (
            LedgerKey::Holder(_) | LedgerKey::DelegatedFrom,
            LedgerValue::Address(_)
        ) | (
            LedgerKey::HolderFlag(_) | LedgerKey::Paused,
            LedgerValue::Flag(_)
        ) | (
            LedgerKey::HolderCount | LedgerKey::MintRequestCount,
            LedgerValue::Count(_)
        ) | (LedgerKey::MintRequest(_), LedgerValue::MintRequest(_))
            | (LedgerKey::Access, LedgerValue::Access(_))
            | (LedgerKey::Settings, LedgerValue::Settings(_))
    )
}

fn corrupt(key: &LedgerKey) -> LedgerError {
    LedgerError::InvalidArgument(format!("overlay entry for {key:?} has the wrong type"))
}

/// A [`LedgerProvider`] that reads through to `base` and keeps every write in
/// its own overlay.
pub struct OverlayStorage<'a, P: LedgerProvider> {
    base: &'a P,
    overlay: LedgerOverlay,
}

impl<'a, P: LedgerProvider> OverlayStorage<'a, P> {
    pub fn new(base: &'a P) -> Self {
        Self {
            base,
            overlay: LedgerOverlay::new(),
        }
    }

    pub fn into_overlay(self) -> LedgerOverlay {
        self.overlay
    }

    fn amount(&self, key: &LedgerKey) -> Result<Option<Amount>, LedgerError> {
        match self.overlay.get(key) {
            None => Ok(None),
            Some(LedgerValue::Amount(value)) => Ok(Some(*value)),
            Some(_) => Err(corrupt(key)),
        }
    }

    fn count(&self, key: &LedgerKey) -> Result<Option<u64>, LedgerError> {
        match self.overlay.get(key) {
            None => Ok(None),
            Some(LedgerValue::Count(value)) => Ok(Some(*value)),
            Some(_) => Err(corrupt(key)),
        }
    }
}

impl<P: LedgerProvider> LedgerProvider for OverlayStorage<'_, P> {
    fn get_balance(&self, account: &Address) -> Result<Amount, LedgerError> {
        match self.amount(&LedgerKey::Balance(*account))? {
            Some(balance) => Ok(balance),
            None => self.base.get_balance(account),
        }
    }

    fn set_balance(&mut self, account: &Address, balance: Amount) -> Result<(), LedgerError> {
        self.overlay
            .set(LedgerKey::Balance(*account), LedgerValue::Amount(balance));
        Ok(())
    }

    fn get_total_supply(&self) -> Result<Amount, LedgerError> {
        match self.amount(&LedgerKey::TotalSupply)? {
            Some(supply) => Ok(supply),
            None => self.base.get_total_supply(),
        }
    }

    fn set_total_supply(&mut self, supply: Amount) -> Result<(), LedgerError> {
        self.overlay
            .set(LedgerKey::TotalSupply, LedgerValue::Amount(supply));
        Ok(())
    }

    fn get_allowance(&self, owner: &Address, spender: &Address) -> Result<Amount, LedgerError> {
        let key = LedgerKey::Allowance {
            owner: *owner,
            spender: *spender,
        };
        match self.amount(&key)? {
            Some(value) => Ok(value),
            None => self.base.get_allowance(owner, spender),
        }
    }

    fn set_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        value: Amount,
    ) -> Result<(), LedgerError> {
        let key = LedgerKey::Allowance {
            owner: *owner,
            spender: *spender,
        };
        self.overlay.set(key, LedgerValue::Amount(value));
        Ok(())
    }

    fn get_holder_count(&self) -> Result<u64, LedgerError> {
        match self.count(&LedgerKey::HolderCount)? {
            Some(count) => Ok(count),
            None => self.base.get_holder_count(),
        }
    }

    fn get_holder(&self, index: u64) -> Result<Option<Address>, LedgerError> {
        let key = LedgerKey::Holder(index);
        match self.overlay.get(&key) {
            None => self.base.get_holder(index),
            Some(LedgerValue::Address(account)) => Ok(Some(*account)),
            Some(_) => Err(corrupt(&key)),
        }
    }

    fn is_holder(&self, account: &Address) -> Result<bool, LedgerError> {
        let key = LedgerKey::HolderFlag(*account);
        match self.overlay.get(&key) {
            None => self.base.is_holder(account),
            Some(LedgerValue::Flag(flag)) => Ok(*flag),
            Some(_) => Err(corrupt(&key)),
        }
    }

    fn add_holder(&mut self, account: &Address) -> Result<(), LedgerError> {
        let count = self.get_holder_count()?;
        let next = count.checked_add(1).ok_or(LedgerError::Overflow)?;
        self.overlay
            .set(LedgerKey::Holder(count), LedgerValue::Address(*account));
        self.overlay
            .set(LedgerKey::HolderFlag(*account), LedgerValue::Flag(true));
        self.overlay
            .set(LedgerKey::HolderCount, LedgerValue::Count(next));
        Ok(())
    }

    fn get_mint_request_count(&self) -> Result<u64, LedgerError> {
        match self.count(&LedgerKey::MintRequestCount)? {
            Some(count) => Ok(count),
            None => self.base.get_mint_request_count(),
        }
    }

    fn get_mint_request(&self, id: u64) -> Result<Option<MintRequest>, LedgerError> {
        let key = LedgerKey::MintRequest(id);
        match self.overlay.get(&key) {
            None => self.base.get_mint_request(id),
            Some(LedgerValue::MintRequest(request)) => Ok(Some(request.clone())),
            Some(_) => Err(corrupt(&key)),
        }
    }

    fn add_mint_request(&mut self, request: MintRequest) -> Result<u64, LedgerError> {
        let id = self.get_mint_request_count()?;
        let next = id.checked_add(1).ok_or(LedgerError::Overflow)?;
        self.overlay
            .set(LedgerKey::MintRequest(id), LedgerValue::MintRequest(request));
        self.overlay
            .set(LedgerKey::MintRequestCount, LedgerValue::Count(next));
        Ok(id)
    }

    fn set_mint_request(&mut self, id: u64, request: MintRequest) -> Result<(), LedgerError> {
        if id >= self.get_mint_request_count()? {
            return Err(LedgerError::NotFound(id));
        }
        self.overlay
            .set(LedgerKey::MintRequest(id), LedgerValue::MintRequest(request));
        Ok(())
    }

    fn get_access(&self) -> Result<AccessRegistry, LedgerError> {
        match self.overlay.get(&LedgerKey::Access) {
            None => self.base.get_access(),
            Some(LedgerValue::Access(access)) => Ok(access.as_ref().clone()),
            Some(_) => Err(corrupt(&LedgerKey::Access)),
        }
    }

    fn set_access(&mut self, access: AccessRegistry) -> Result<(), LedgerError> {
        self.overlay
            .set(LedgerKey::Access, LedgerValue::Access(Box::new(access)));
        Ok(())
    }

    fn is_paused(&self) -> Result<bool, LedgerError> {
        match self.overlay.get(&LedgerKey::Paused) {
            None => self.base.is_paused(),
            Some(LedgerValue::Flag(paused)) => Ok(*paused),
            Some(_) => Err(corrupt(&LedgerKey::Paused)),
        }
    }

    fn set_paused(&mut self, paused: bool) -> Result<(), LedgerError> {
        self.overlay
            .set(LedgerKey::Paused, LedgerValue::Flag(paused));
        Ok(())
    }

    fn get_delegated_from(&self) -> Result<Address, LedgerError> {
        match self.overlay.get(&LedgerKey::DelegatedFrom) {
            None => self.base.get_delegated_from(),
            Some(LedgerValue::Address(addr)) => Ok(*addr),
            Some(_) => Err(corrupt(&LedgerKey::DelegatedFrom)),
        }
    }

    fn set_delegated_from(&mut self, addr: &Address) -> Result<(), LedgerError> {
        self.overlay
            .set(LedgerKey::DelegatedFrom, LedgerValue::Address(*addr));
        Ok(())
    }

    fn get_settings(&self) -> Result<TokenSettings, LedgerError> {
        match self.overlay.get(&LedgerKey::Settings) {
            None => self.base.get_settings(),
            Some(LedgerValue::Settings(settings)) => Ok(settings.as_ref().clone()),
            Some(_) => Err(corrupt(&LedgerKey::Settings)),
        }
    }

    fn set_settings(&mut self, settings: TokenSettings) -> Result<(), LedgerError> {
        self.overlay
            .set(LedgerKey::Settings, LedgerValue::Settings(Box::new(settings)));
        Ok(())
    }
}
