//! Forwarding entry points for the delegate-of-record.
//!
//! A newer contract operating on this ledger's state calls these with the
//! address it authenticated (`origin`). The only check made against the real
//! caller is that it is the delegate-of-record; everything else is evaluated
//! as if `origin` had called the plain operation.

use super::Token;
use crate::storage::LedgerProvider;
use log::info;
use maskin_common::{amount::Amount, crypto::Address, error::LedgerError, event::LedgerEvent};

fn require_delegate<P: LedgerProvider>(storage: &P, caller: &Address) -> Result<(), LedgerError> {
    let delegate = storage.get_delegated_from()?;
    if delegate.is_null() || delegate != *caller {
        return Err(LedgerError::Unauthorized);
    }
    Ok(())
}

impl Token {
    /// Owner only. Replaces the delegate-of-record; the null address
    /// disables delegation.
    pub fn set_delegated_from(&mut self, caller: &Address, addr: &Address) -> Result<(), LedgerError> {
        self.execute("set_delegated_from", caller, |ctx| {
            ctx.storage.get_access()?.require_owner(caller)?;
            ctx.storage.set_delegated_from(addr)?;
            ctx.emit(LedgerEvent::DelegatedFromSet { addr: *addr });
            Ok(())
        })?;
        info!("Token {}: delegated from {}", self.address, addr);
        Ok(())
    }

    // ===== Reads =====

    pub fn delegate_total_supply(&self, caller: &Address) -> Result<Amount, LedgerError> {
        require_delegate(&self.storage, caller)?;
        Ok(self.total_supply())
    }

    pub fn delegate_balance_of(&self, caller: &Address, who: &Address) -> Result<Amount, LedgerError> {
        require_delegate(&self.storage, caller)?;
        Ok(self.balance_of(who))
    }

    pub fn delegate_allowance(
        &self,
        caller: &Address,
        owner: &Address,
        spender: &Address,
    ) -> Result<Amount, LedgerError> {
        require_delegate(&self.storage, caller)?;
        Ok(self.allowance(owner, spender))
    }

    // ===== Writes =====

    pub fn delegate_transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        value: Amount,
        origin: &Address,
    ) -> Result<(), LedgerError> {
        self.execute("delegate_transfer", caller, |ctx| {
            require_delegate(&ctx.storage, caller)?;
            ctx.require_not_paused()?;
            ctx.move_balance(origin, to, value)
        })
    }

    pub fn delegate_transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        value: Amount,
        origin: &Address,
    ) -> Result<(), LedgerError> {
        self.execute("delegate_transfer_from", caller, |ctx| {
            require_delegate(&ctx.storage, caller)?;
            ctx.require_not_paused()?;
            ctx.transfer_from_as(origin, from, to, value)
        })
    }

    pub fn delegate_approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        value: Amount,
        origin: &Address,
    ) -> Result<(), LedgerError> {
        self.execute("delegate_approve", caller, |ctx| {
            require_delegate(&ctx.storage, caller)?;
            ctx.require_not_paused()?;
            ctx.approve_as(origin, spender, value)
        })
    }

    pub fn delegate_increase_approval(
        &mut self,
        caller: &Address,
        spender: &Address,
        added: Amount,
        origin: &Address,
    ) -> Result<(), LedgerError> {
        self.execute("delegate_increase_approval", caller, |ctx| {
            require_delegate(&ctx.storage, caller)?;
            ctx.require_not_paused()?;
            ctx.increase_approval_as(origin, spender, added)
        })
    }

    pub fn delegate_decrease_approval(
        &mut self,
        caller: &Address,
        spender: &Address,
        subtracted: Amount,
        origin: &Address,
    ) -> Result<(), LedgerError> {
        self.execute("delegate_decrease_approval", caller, |ctx| {
            require_delegate(&ctx.storage, caller)?;
            ctx.require_not_paused()?;
            ctx.decrease_approval_as(origin, spender, subtracted)
        })
    }

    /// Burn `value` from `from`, as if `from` had called `burn`.
    pub fn delegate_burn(
        &mut self,
        caller: &Address,
        from: &Address,
        value: Amount,
        note: &str,
    ) -> Result<(), LedgerError> {
        self.execute("delegate_burn", caller, |ctx| {
            require_delegate(&ctx.storage, caller)?;
            ctx.require_not_paused()?;
            ctx.burn_from(from, value, note)
        })
    }
}
