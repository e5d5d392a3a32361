//! Holder pool and batched distribution.
//!
//! The deputation's own address receives the holder share of every mint.
//! `distribute` pays that balance out to holders. Holder lists can be far too
//! long for one call, so callers page through them in slices; each call is
//! self-contained and the deputation keeps no cursor.

use crate::shared::{lock, SharedToken};
use log::{debug, info, log_enabled, trace, Level};
use maskin_common::{
    access::AccessRegistry,
    amount::Amount,
    config::{DeputationConfig, DistributionMode},
    crypto::Address,
    error::LedgerError,
    event::{EmittedEvent, LedgerEvent},
};

pub struct Deputation {
    address: Address,
    access: AccessRegistry,
    mode: DistributionMode,
    token: Option<SharedToken>,
    events: Vec<EmittedEvent>,
}

impl Deputation {
    pub fn new(config: &DeputationConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        Ok(Self {
            address: config.address(),
            access: AccessRegistry::new(config.owner),
            mode: config.mode,
            token: None,
            events: Vec::new(),
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn mode(&self) -> DistributionMode {
        self.mode
    }

    pub fn access(&self) -> &AccessRegistry {
        &self.access
    }

    pub fn token(&self) -> Option<&SharedToken> {
        self.token.as_ref()
    }

    pub fn events(&self) -> &[EmittedEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<EmittedEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: LedgerEvent) {
        if log_enabled!(Level::Debug) {
            debug!("Deputation {} emitted {:?}", self.address, event);
        }
        self.events.push(EmittedEvent {
            contract: self.address,
            event,
        });
    }

    // ===== Roles =====

    pub fn add_admins(&mut self, caller: &Address, addrs: &[Address]) -> Result<(), LedgerError> {
        let added = self.access.add_admins(caller, addrs)?;
        info!("Deputation {}: {} new admin(s)", self.address, added);
        Ok(())
    }

    pub fn remove_admins(&mut self, caller: &Address, addrs: &[Address]) -> Result<(), LedgerError> {
        let removed = self.access.remove_admins(caller, addrs)?;
        info!("Deputation {}: {} admin(s) removed", self.address, removed);
        Ok(())
    }

    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: &Address,
    ) -> Result<(), LedgerError> {
        self.access
            .transfer_ownership(caller, new_owner, &self.address)?;
        info!(
            "Deputation {}: ownership offered to {}",
            self.address, new_owner
        );
        Ok(())
    }

    pub fn claim_ownership(&mut self, caller: &Address) -> Result<(), LedgerError> {
        let previous = self.access.claim_ownership(caller)?;
        self.emit(LedgerEvent::OwnershipTransferred {
            previous_owner: previous,
            new_owner: *caller,
        });
        info!("Deputation {}: ownership claimed by {}", self.address, caller);
        Ok(())
    }

    // ===== Ledger =====

    /// Owner only. Point the deputation at a token ledger, replacing any
    /// previous one.
    pub fn set_token(&mut self, caller: &Address, token: SharedToken) -> Result<(), LedgerError> {
        self.access.require_owner(caller)?;
        let token_address = *lock(&token)?.address();
        self.token = Some(token);
        self.emit(LedgerEvent::SetToken {
            token: token_address,
        });
        info!("Deputation {}: token set to {}", self.address, token_address);
        Ok(())
    }

    /// Current balance of the pool on the configured ledger.
    pub fn pool_balance(&self) -> Result<Amount, LedgerError> {
        let token = self.token.as_ref().ok_or(LedgerError::LedgerNotConfigured)?;
        Ok(lock(token)?.balance_of(&self.address))
    }

    /// Pay `amounts[i]` from the pool to `holders[i]`, in order.
    ///
    /// Everything is validated before anything moves: the caller's role (in
    /// governed mode), the ledger reference, equal lengths, the pause flag
    /// and that the pool covers the sum. The whole batch runs under one
    /// ledger lock and commits atomically.
    pub fn distribute(
        &mut self,
        caller: &Address,
        holders: &[Address],
        amounts: &[Amount],
    ) -> Result<(), LedgerError> {
        if let Err(e) = self.try_distribute(caller, holders, amounts) {
            trace!("Deputation {}: distribute by {} rejected: {}", self.address, caller, e);
            return Err(e);
        }

        debug!(
            "Deputation {}: distributed to {} holder(s)",
            self.address,
            holders.len()
        );
        self.emit(LedgerEvent::FundsDistributed {
            holders: holders.to_vec(),
            amounts: amounts.to_vec(),
        });
        Ok(())
    }

    fn try_distribute(
        &self,
        caller: &Address,
        holders: &[Address],
        amounts: &[Amount],
    ) -> Result<(), LedgerError> {
        if self.mode == DistributionMode::Governed {
            self.access.require_admin(caller)?;
        }
        let token = self.token.as_ref().ok_or(LedgerError::LedgerNotConfigured)?;
        if holders.len() != amounts.len() {
            return Err(LedgerError::LengthMismatch {
                holders: holders.len(),
                amounts: amounts.len(),
            });
        }

        let mut ledger = lock(token)?;
        ledger.transfer_batch(&self.address, holders, amounts)
    }
}
