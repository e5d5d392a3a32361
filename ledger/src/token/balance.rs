use super::{Context, Token};
use crate::storage::{BalanceSheet, LedgerProvider};
use log::info;
use maskin_common::{
    amount::{self, Amount},
    crypto::Address,
    error::LedgerError,
    event::LedgerEvent,
};

impl Context<'_> {
    /// Move `value` from `from` to `to`. A null `to` burns instead.
    pub(crate) fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        value: Amount,
    ) -> Result<(), LedgerError> {
        if to.is_null() {
            return self.burn_from(from, value, "");
        }

        // Phase 1: debit
        let from_balance = self.storage.get_balance(from)?;
        let new_from = from_balance
            .checked_sub(value)
            .ok_or(LedgerError::InsufficientFunds)?;
        self.storage.set_balance(from, new_from)?;

        // Phase 2: credit, reading after the debit so a self transfer is a no-op
        let to_balance = self.storage.get_balance(to)?;
        let new_to = to_balance
            .checked_add(value)
            .ok_or(LedgerError::Overflow)?;
        self.storage.set_balance(to, new_to)?;
        if !new_to.is_zero() {
            self.register_holder(to)?;
        }

        self.emit(LedgerEvent::Transfer {
            from: *from,
            to: *to,
            value,
        });
        Ok(())
    }

    /// Destroy `value` of `burner`'s balance.
    pub(crate) fn burn_from(
        &mut self,
        burner: &Address,
        value: Amount,
        note: &str,
    ) -> Result<(), LedgerError> {
        let balance = self.storage.get_balance(burner)?;
        let new_balance = balance
            .checked_sub(value)
            .ok_or(LedgerError::InsufficientFunds)?;
        let supply = self.storage.get_total_supply()?;
        let new_supply = supply
            .checked_sub(value)
            .ok_or(LedgerError::Overflow)?;

        self.storage.set_balance(burner, new_balance)?;
        self.storage.set_total_supply(new_supply)?;

        self.emit(LedgerEvent::Burn {
            burner: *burner,
            value,
            note: note.to_owned(),
        });
        self.emit(LedgerEvent::Transfer {
            from: *burner,
            to: Address::null(),
            value,
        });
        Ok(())
    }

    /// Add `value` to `to` without touching the total supply. Mint paths
    /// adjust the supply once for the whole amount.
    pub(crate) fn credit(&mut self, to: &Address, value: Amount) -> Result<(), LedgerError> {
        if value.is_zero() {
            return Ok(());
        }
        if to.is_null() {
            return Err(LedgerError::invalid("cannot credit the null address"));
        }

        let balance = self.storage.get_balance(to)?;
        let new_balance = balance.checked_add(value).ok_or(LedgerError::Overflow)?;
        self.storage.set_balance(to, new_balance)?;
        self.register_holder(to)?;

        self.emit(LedgerEvent::Mint { to: *to, value });
        self.emit(LedgerEvent::Transfer {
            from: Address::null(),
            to: *to,
            value,
        });
        Ok(())
    }

    pub(crate) fn increase_supply(&mut self, value: Amount) -> Result<(), LedgerError> {
        let supply = self.storage.get_total_supply()?;
        let new_supply = supply.checked_add(value).ok_or(LedgerError::Overflow)?;
        self.storage.set_total_supply(new_supply)
    }

    pub(crate) fn approve_as(
        &mut self,
        owner: &Address,
        spender: &Address,
        value: Amount,
    ) -> Result<(), LedgerError> {
        self.storage.set_allowance(owner, spender, value)?;
        self.emit(LedgerEvent::Approval {
            owner: *owner,
            spender: *spender,
            value,
        });
        Ok(())
    }

    pub(crate) fn increase_approval_as(
        &mut self,
        owner: &Address,
        spender: &Address,
        added: Amount,
    ) -> Result<(), LedgerError> {
        let current = self.storage.get_allowance(owner, spender)?;
        let value = current.checked_add(added).ok_or(LedgerError::Overflow)?;
        self.approve_as(owner, spender, value)
    }

    /// Floors at zero rather than failing.
    pub(crate) fn decrease_approval_as(
        &mut self,
        owner: &Address,
        spender: &Address,
        subtracted: Amount,
    ) -> Result<(), LedgerError> {
        let current = self.storage.get_allowance(owner, spender)?;
        self.approve_as(owner, spender, current.saturating_sub(subtracted))
    }

    /// `spender` moves `value` out of `from` against its allowance.
    pub(crate) fn transfer_from_as(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        value: Amount,
    ) -> Result<(), LedgerError> {
        let allowance = self.storage.get_allowance(from, spender)?;
        let new_allowance = allowance
            .checked_sub(value)
            .ok_or(LedgerError::InsufficientAllowance)?;
        if value > self.storage.get_balance(from)? {
            return Err(LedgerError::InsufficientFunds);
        }

        self.storage.set_allowance(from, spender, new_allowance)?;
        self.move_balance(from, to, value)
    }
}

impl Token {
    /// Send `value` of the caller's balance to `to`. Sending to the null
    /// address burns it.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        value: Amount,
    ) -> Result<(), LedgerError> {
        self.execute("transfer", caller, |ctx| {
            ctx.require_not_paused()?;
            ctx.move_balance(caller, to, value)
        })
    }

    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        value: Amount,
    ) -> Result<(), LedgerError> {
        self.execute("transfer_from", caller, |ctx| {
            ctx.require_not_paused()?;
            ctx.transfer_from_as(caller, from, to, value)
        })
    }

    pub fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        value: Amount,
    ) -> Result<(), LedgerError> {
        self.execute("approve", caller, |ctx| {
            ctx.require_not_paused()?;
            ctx.approve_as(caller, spender, value)
        })
    }

    pub fn increase_approval(
        &mut self,
        caller: &Address,
        spender: &Address,
        added: Amount,
    ) -> Result<(), LedgerError> {
        self.execute("increase_approval", caller, |ctx| {
            ctx.require_not_paused()?;
            ctx.increase_approval_as(caller, spender, added)
        })
    }

    pub fn decrease_approval(
        &mut self,
        caller: &Address,
        spender: &Address,
        subtracted: Amount,
    ) -> Result<(), LedgerError> {
        self.execute("decrease_approval", caller, |ctx| {
            ctx.require_not_paused()?;
            ctx.decrease_approval_as(caller, spender, subtracted)
        })
    }

    /// Burn `value` of the caller's own balance.
    pub fn burn(&mut self, caller: &Address, value: Amount, note: &str) -> Result<(), LedgerError> {
        self.execute("burn", caller, |ctx| {
            ctx.require_not_paused()?;
            ctx.burn_from(caller, value, note)
        })
    }

    /// Pay a holder pool out to many recipients at once. Only reached
    /// through [`Deputation::distribute`](crate::Deputation::distribute).
    ///
    /// Either every transfer happens or none does. The total is checked
    /// against the pool's balance before anything moves.
    pub(crate) fn transfer_batch(
        &mut self,
        caller: &Address,
        recipients: &[Address],
        amounts: &[Amount],
    ) -> Result<(), LedgerError> {
        self.execute("transfer_batch", caller, |ctx| {
            ctx.require_not_paused()?;
            if recipients.len() != amounts.len() {
                return Err(LedgerError::LengthMismatch {
                    holders: recipients.len(),
                    amounts: amounts.len(),
                });
            }
            let total = amount::checked_sum(amounts).ok_or(LedgerError::InsufficientPoolBalance)?;
            if total > ctx.storage.get_balance(caller)? {
                return Err(LedgerError::InsufficientPoolBalance);
            }

            for (to, value) in recipients.iter().zip(amounts) {
                ctx.move_balance(caller, to, *value)?;
            }
            Ok(())
        })
    }

    /// Owner only. Sweep this token contract's entire balance on `foreign` to
    /// `to`. Returns the amount moved.
    pub fn reclaim_token(
        &self,
        caller: &Address,
        foreign: &mut Token,
        to: &Address,
    ) -> Result<Amount, LedgerError> {
        self.storage.get_access()?.require_owner(caller)?;
        let balance = foreign.balance_of(&self.address);
        foreign.transfer(&self.address, to, balance)?;
        info!(
            "Token {} reclaimed {} of {} to {}",
            self.address, balance, foreign.address, to
        );
        Ok(balance)
    }

    /// Owner only. Swap the balance store and return the previous one.
    pub fn set_balance_sheet(
        &mut self,
        caller: &Address,
        sheet: BalanceSheet,
    ) -> Result<BalanceSheet, LedgerError> {
        self.storage.get_access()?.require_owner(caller)?;
        let previous = self.storage.replace_sheet(sheet);
        info!("Token {} balance sheet replaced by {}", self.address, caller);
        Ok(previous)
    }
}
