use super::{Context, Token};
use crate::storage::LedgerProvider;
use maskin_common::{crypto::Address, error::LedgerError};

impl Context<'_> {
    /// Append `account` to the holder registry unless it is already there.
    ///
    /// Only called once `account` holds a positive balance. The null address
    /// is never a holder.
    pub(crate) fn register_holder(&mut self, account: &Address) -> Result<(), LedgerError> {
        if account.is_null() || self.storage.is_holder(account)? {
            return Ok(());
        }
        self.storage.add_holder(account)
    }
}

impl Token {
    /// Number of distinct addresses that ever held a positive balance.
    /// Owner or admin only.
    pub fn holder_count(&self, caller: &Address) -> Result<u64, LedgerError> {
        self.storage.get_access()?.require_owner_or_admin(caller)?;
        self.storage.get_holder_count()
    }

    /// Holder at `index`, in order of first credit. Owner or admin only.
    pub fn holder(&self, caller: &Address, index: u64) -> Result<Address, LedgerError> {
        self.storage.get_access()?.require_owner_or_admin(caller)?;
        match self.storage.get_holder(index)? {
            Some(holder) => Ok(holder),
            None => Err(LedgerError::IndexOutOfRange {
                index,
                count: self.storage.get_holder_count()?,
            }),
        }
    }

    pub fn is_holder(&self, account: &Address) -> Result<bool, LedgerError> {
        self.storage.is_holder(account)
    }
}
