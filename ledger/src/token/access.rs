use super::Token;
use log::info;
use maskin_common::{crypto::Address, error::LedgerError, event::LedgerEvent};

impl Token {
    pub fn add_admin(&mut self, caller: &Address, addr: &Address) -> Result<(), LedgerError> {
        self.add_admins(caller, std::slice::from_ref(addr))
    }

    /// Owner only. Adding an existing admin is a no-op.
    pub fn add_admins(&mut self, caller: &Address, addrs: &[Address]) -> Result<(), LedgerError> {
        let added = self.execute("add_admins", caller, |ctx| {
            ctx.update_access(|access| access.add_admins(caller, addrs))
        })?;
        info!("Token {}: {} new admin(s)", self.address, added);
        Ok(())
    }

    /// Owner only. Removing a non-member is a no-op.
    pub fn remove_admins(
        &mut self,
        caller: &Address,
        addrs: &[Address],
    ) -> Result<(), LedgerError> {
        let removed = self.execute("remove_admins", caller, |ctx| {
            ctx.update_access(|access| access.remove_admins(caller, addrs))
        })?;
        info!("Token {}: {} admin(s) removed", self.address, removed);
        Ok(())
    }

    pub fn add_operator(&mut self, caller: &Address, addr: &Address) -> Result<(), LedgerError> {
        self.add_operators(caller, std::slice::from_ref(addr))
    }

    pub fn add_operators(
        &mut self,
        caller: &Address,
        addrs: &[Address],
    ) -> Result<(), LedgerError> {
        let added = self.execute("add_operators", caller, |ctx| {
            ctx.update_access(|access| access.add_operators(caller, addrs))
        })?;
        info!("Token {}: {} new operator(s)", self.address, added);
        Ok(())
    }

    pub fn remove_operators(
        &mut self,
        caller: &Address,
        addrs: &[Address],
    ) -> Result<(), LedgerError> {
        let removed = self.execute("remove_operators", caller, |ctx| {
            ctx.update_access(|access| access.remove_operators(caller, addrs))
        })?;
        info!("Token {}: {} operator(s) removed", self.address, removed);
        Ok(())
    }

    /// Owner only. Stages `new_owner`; nothing changes until it claims.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: &Address,
    ) -> Result<(), LedgerError> {
        self.execute("transfer_ownership", caller, |ctx| {
            let contract = ctx.contract;
            ctx.update_access(|access| access.transfer_ownership(caller, new_owner, &contract))
        })?;
        info!(
            "Token {}: ownership offered to {}",
            self.address, new_owner
        );
        Ok(())
    }

    /// Pending owner only.
    pub fn claim_ownership(&mut self, caller: &Address) -> Result<(), LedgerError> {
        self.execute("claim_ownership", caller, |ctx| {
            let previous = ctx.update_access(|access| access.claim_ownership(caller))?;
            ctx.emit(LedgerEvent::OwnershipTransferred {
                previous_owner: previous,
                new_owner: *caller,
            });
            Ok(())
        })?;
        info!("Token {}: ownership claimed by {}", self.address, caller);
        Ok(())
    }
}
