//! Owner, admin and operator roles.
//!
//! Role sets are plain membership sets; capability checks are predicates.
//! Ownership moves in two steps: the owner names a pending owner, the pending
//! owner claims.

use crate::crypto::Address;
use crate::error::LedgerError;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRegistry {
    owner: Address,
    pending_owner: Option<Address>,
    admins: IndexSet<Address>,
    operators: IndexSet<Address>,
}

impl AccessRegistry {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            pending_owner: None,
            admins: IndexSet::new(),
            operators: IndexSet::new(),
        }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn pending_owner(&self) -> Option<&Address> {
        self.pending_owner.as_ref()
    }

    pub fn admins(&self) -> impl Iterator<Item = &Address> {
        self.admins.iter()
    }

    pub fn operators(&self) -> impl Iterator<Item = &Address> {
        self.operators.iter()
    }

    pub fn is_owner(&self, addr: &Address) -> bool {
        self.owner == *addr
    }

    pub fn is_admin(&self, addr: &Address) -> bool {
        self.admins.contains(addr)
    }

    pub fn is_operator(&self, addr: &Address) -> bool {
        self.operators.contains(addr)
    }

    pub fn require_owner(&self, caller: &Address) -> Result<(), LedgerError> {
        if !self.is_owner(caller) {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    pub fn require_admin(&self, caller: &Address) -> Result<(), LedgerError> {
        if !self.is_admin(caller) {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    pub fn require_operator(&self, caller: &Address) -> Result<(), LedgerError> {
        if !self.is_operator(caller) {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    pub fn require_owner_or_admin(&self, caller: &Address) -> Result<(), LedgerError> {
        if !self.is_owner(caller) && !self.is_admin(caller) {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    /// Owner only. Existing members are skipped; returns how many were new.
    pub fn add_admins(&mut self, caller: &Address, addrs: &[Address]) -> Result<usize, LedgerError> {
        self.require_owner(caller)?;
        Ok(addrs.iter().filter(|addr| self.admins.insert(**addr)).count())
    }

    /// Owner only. Non-members are skipped; returns how many were removed.
    pub fn remove_admins(
        &mut self,
        caller: &Address,
        addrs: &[Address],
    ) -> Result<usize, LedgerError> {
        self.require_owner(caller)?;
        Ok(addrs
            .iter()
            .filter(|addr| self.admins.shift_remove(*addr))
            .count())
    }

    pub fn add_operators(
        &mut self,
        caller: &Address,
        addrs: &[Address],
    ) -> Result<usize, LedgerError> {
        self.require_owner(caller)?;
        Ok(addrs
            .iter()
            .filter(|addr| self.operators.insert(**addr))
            .count())
    }

    pub fn remove_operators(
        &mut self,
        caller: &Address,
        addrs: &[Address],
    ) -> Result<usize, LedgerError> {
        self.require_owner(caller)?;
        Ok(addrs
            .iter()
            .filter(|addr| self.operators.shift_remove(*addr))
            .count())
    }

    /// Stage `new_owner` as pending owner.
    ///
    /// `contract` is the address of the contract holding this registry; a
    /// contract cannot own itself.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: &Address,
        contract: &Address,
    ) -> Result<(), LedgerError> {
        self.require_owner(caller)?;
        if new_owner == contract {
            return Err(LedgerError::invalid("contract cannot own itself"));
        }
        if *new_owner == self.owner {
            return Err(LedgerError::invalid("new owner is already the owner"));
        }
        self.pending_owner = Some(*new_owner);
        Ok(())
    }

    /// Pending owner only. Returns the previous owner.
    pub fn claim_ownership(&mut self, caller: &Address) -> Result<Address, LedgerError> {
        match self.pending_owner {
            Some(pending) if pending == *caller => {
                let previous = self.owner;
                self.owner = pending;
                self.pending_owner = None;
                Ok(previous)
            }
            _ => Err(LedgerError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(i: u64) -> Address {
        Address::from_index(i)
    }

    #[test]
    fn test_add_admin_is_idempotent() -> Result<(), LedgerError> {
        let mut registry = AccessRegistry::new(addr(1));
        assert_eq!(registry.add_admins(&addr(1), &[addr(2)])?, 1);
        assert_eq!(registry.add_admins(&addr(1), &[addr(2), addr(2)])?, 0);
        assert!(registry.is_admin(&addr(2)));
        assert_eq!(registry.admins().count(), 1);
        Ok(())
    }

    #[test]
    fn test_remove_non_member_is_noop() -> Result<(), LedgerError> {
        let mut registry = AccessRegistry::new(addr(1));
        registry.add_operators(&addr(1), &[addr(3)])?;
        assert_eq!(registry.remove_operators(&addr(1), &[addr(4)])?, 0);
        assert_eq!(registry.remove_operators(&addr(1), &[addr(3)])?, 1);
        assert!(!registry.is_operator(&addr(3)));
        Ok(())
    }

    #[test]
    fn test_only_owner_manages_roles() {
        let mut registry = AccessRegistry::new(addr(1));
        assert_eq!(
            registry.add_admins(&addr(2), &[addr(2)]),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(
            registry.remove_admins(&addr(2), &[addr(1)]),
            Err(LedgerError::Unauthorized)
        );
        assert!(!registry.is_admin(&addr(2)));
    }

    #[test]
    fn test_two_step_ownership() -> Result<(), LedgerError> {
        let contract = addr(100);
        let mut registry = AccessRegistry::new(addr(1));

        assert!(registry
            .transfer_ownership(&addr(1), &contract, &contract)
            .is_err());
        assert!(registry
            .transfer_ownership(&addr(1), &addr(1), &contract)
            .is_err());
        assert_eq!(
            registry.transfer_ownership(&addr(2), &addr(2), &contract),
            Err(LedgerError::Unauthorized)
        );

        registry.transfer_ownership(&addr(1), &addr(2), &contract)?;
        assert_eq!(registry.pending_owner(), Some(&addr(2)));
        assert!(registry.is_owner(&addr(1)));

        assert_eq!(
            registry.claim_ownership(&addr(3)),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(registry.claim_ownership(&addr(2))?, addr(1));
        assert!(registry.is_owner(&addr(2)));
        assert_eq!(registry.pending_owner(), None);
        Ok(())
    }
}
