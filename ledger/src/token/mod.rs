//! The token contract.
//!
//! Every mutating entry point takes the authenticated caller as its first
//! argument and runs inside [`Token::execute`]: reads and writes go through a
//! fresh overlay, events are buffered next to it, and both are committed only
//! if the operation returns `Ok`.

mod access;
mod balance;
mod delegate;
mod holders;
mod mint;
mod pause;

use crate::storage::{BalanceSheet, LedgerProvider, MemoryStorage, OverlayStorage, TokenSettings};
use log::{debug, log_enabled, trace, Level};
use maskin_common::{
    access::AccessRegistry,
    amount::Amount,
    config::TokenConfig,
    crypto::Address,
    error::LedgerError,
    event::{EmittedEvent, LedgerEvent},
    mint::MintRequest,
    rates::PaidRates,
};

/// Execution context of a single operation.
pub(crate) struct Context<'a> {
    pub(crate) storage: OverlayStorage<'a, MemoryStorage>,
    pub(crate) contract: Address,
    events: Vec<LedgerEvent>,
}

impl<'a> Context<'a> {
    fn new(base: &'a MemoryStorage, contract: Address) -> Self {
        Self {
            storage: OverlayStorage::new(base),
            contract,
            events: Vec::new(),
        }
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    /// Load the role registry, let `f` change it and store it back.
    pub(crate) fn update_access<T>(
        &mut self,
        f: impl FnOnce(&mut AccessRegistry) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut access = self.storage.get_access()?;
        let result = f(&mut access)?;
        self.storage.set_access(access)?;
        Ok(result)
    }
}

#[derive(Debug)]
pub struct Token {
    address: Address,
    storage: MemoryStorage,
    events: Vec<EmittedEvent>,
}

impl Token {
    pub fn new(config: &TokenConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let settings = TokenSettings {
            wallet: config.system_wallet,
            deputation: config.deputation_address(),
            rates: config.rates()?,
            initial_supply: config.initial_supply,
            pre_minted: false,
        };
        let address = config.token_address();
        if log_enabled!(Level::Debug) {
            debug!(
                "Token {} created, owner {}, wallet {}, deputation {}",
                address, config.owner, settings.wallet, settings.deputation
            );
        }

        Ok(Self {
            address,
            storage: MemoryStorage::new(AccessRegistry::new(config.owner), settings),
            events: Vec::new(),
        })
    }

    /// Run `f` against a write overlay and commit it only on success.
    pub(crate) fn execute<T>(
        &mut self,
        op: &'static str,
        caller: &Address,
        f: impl FnOnce(&mut Context<'_>) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let (result, overlay, events) = {
            let mut ctx = Context::new(&self.storage, self.address);
            let result = f(&mut ctx);
            (result, ctx.storage.into_overlay(), ctx.events)
        };

        match result {
            Ok(value) => {
                debug!("{} by {} committed {} changes", op, caller, overlay.len());
                // Rejects a corrupt overlay before its first write
                overlay.apply(&mut self.storage)?;
                for event in events {
                    if log_enabled!(Level::Debug) {
                        debug!("Token {} emitted {:?}", self.address, event);
                    }
                    self.events.push(EmittedEvent {
                        contract: self.address,
                        event,
                    });
                }
                Ok(value)
            }
            Err(e) => {
                trace!("{} by {} rejected: {}", op, caller, e);
                Err(e)
            }
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn storage(&self) -> &MemoryStorage {
        &self.storage
    }

    pub fn sheet(&self) -> &BalanceSheet {
        self.storage.sheet()
    }

    /// Every event committed so far, oldest first.
    pub fn events(&self) -> &[EmittedEvent] {
        &self.events
    }

    /// Take the committed events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<EmittedEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Reads =====

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.sheet().balance_of(account)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.sheet().allowance(owner, spender)
    }

    pub fn total_supply(&self) -> Amount {
        self.sheet().total_supply()
    }

    pub fn owner(&self) -> Result<Address, LedgerError> {
        Ok(*self.storage.get_access()?.owner())
    }

    pub fn pending_owner(&self) -> Result<Option<Address>, LedgerError> {
        Ok(self.storage.get_access()?.pending_owner().copied())
    }

    pub fn is_admin(&self, addr: &Address) -> Result<bool, LedgerError> {
        Ok(self.storage.get_access()?.is_admin(addr))
    }

    pub fn is_operator(&self, addr: &Address) -> Result<bool, LedgerError> {
        Ok(self.storage.get_access()?.is_operator(addr))
    }

    pub fn is_paused(&self) -> Result<bool, LedgerError> {
        self.storage.is_paused()
    }

    pub fn delegated_from(&self) -> Result<Address, LedgerError> {
        self.storage.get_delegated_from()
    }

    pub fn wallet(&self) -> Result<Address, LedgerError> {
        Ok(self.storage.get_settings()?.wallet)
    }

    pub fn deputation(&self) -> Result<Address, LedgerError> {
        Ok(self.storage.get_settings()?.deputation)
    }

    pub fn paid_rates(&self) -> Result<PaidRates, LedgerError> {
        Ok(self.storage.get_settings()?.rates)
    }

    pub fn mint_request_count(&self) -> Result<u64, LedgerError> {
        self.storage.get_mint_request_count()
    }

    pub fn get_mint_request(&self, id: u64) -> Result<MintRequest, LedgerError> {
        self.storage
            .get_mint_request(id)?
            .ok_or(LedgerError::NotFound(id))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use maskin_common::amount::U256;

    pub(crate) const OWNER: u64 = 1;
    pub(crate) const ADMIN: u64 = 2;
    pub(crate) const OPERATOR: u64 = 3;
    pub(crate) const WALLET: u64 = 4;
    pub(crate) const POOL: u64 = 5;
    pub(crate) const TOKEN: u64 = 6;

    pub(crate) fn addr(i: u64) -> Address {
        Address::from_index(i)
    }

    pub(crate) fn amount(v: u64) -> Amount {
        U256::from(v)
    }

    /// Token with admin and operator set and a small genesis supply.
    pub(crate) fn token() -> Token {
        let mut config = TokenConfig::new(addr(OWNER), addr(WALLET));
        config.address = Some(addr(TOKEN));
        config.deputation = Some(addr(POOL));
        config.initial_supply = amount(1_000_000);
        let mut token = Token::new(&config).unwrap();
        token.add_admin(&addr(OWNER), &addr(ADMIN)).unwrap();
        token.add_operator(&addr(OWNER), &addr(OPERATOR)).unwrap();
        token
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = TokenConfig::new(Address::null(), addr(WALLET));
        assert!(Token::new(&config).is_err());
    }

    #[test]
    fn test_failed_operation_commits_nothing() {
        let mut token = token();
        let before = token.events().len();
        let result = token.execute("scratch", &addr(OWNER), |ctx| {
            ctx.storage.set_total_supply(amount(5))?;
            ctx.emit(LedgerEvent::Pause);
            Err::<(), _>(LedgerError::Overflow)
        });
        assert_eq!(result, Err(LedgerError::Overflow));
        assert_eq!(token.total_supply(), U256::zero());
        assert_eq!(token.events().len(), before);
    }

    #[test]
    fn test_successful_operation_commits_events() {
        let mut token = token();
        token.drain_events();
        token
            .execute("scratch", &addr(OWNER), |ctx| {
                ctx.storage.set_total_supply(amount(5))?;
                ctx.emit(LedgerEvent::Pause);
                Ok(())
            })
            .unwrap();
        assert_eq!(token.total_supply(), amount(5));
        assert_eq!(token.events().len(), 1);
        assert_eq!(token.events()[0].contract, addr(TOKEN));
    }
}
