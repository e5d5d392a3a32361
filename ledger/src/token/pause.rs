use super::{Context, Token};
use crate::storage::LedgerProvider;
use log::info;
use maskin_common::{crypto::Address, error::LedgerError, event::LedgerEvent};

impl Context<'_> {
    /// Value-moving operations call this first.
    pub(crate) fn require_not_paused(&self) -> Result<(), LedgerError> {
        if self.storage.is_paused()? {
            return Err(LedgerError::ContractPaused);
        }
        Ok(())
    }

    fn set_paused(&mut self, caller: &Address, paused: bool) -> Result<(), LedgerError> {
        self.storage.get_access()?.require_owner(caller)?;
        if self.storage.is_paused()? == paused {
            return Err(LedgerError::InvalidStateTransition);
        }
        self.storage.set_paused(paused)?;
        self.emit(if paused {
            LedgerEvent::Pause
        } else {
            LedgerEvent::Unpause
        });
        Ok(())
    }
}

impl Token {
    /// Owner only. Freezes transfers, approvals and burns.
    pub fn pause(&mut self, caller: &Address) -> Result<(), LedgerError> {
        self.execute("pause", caller, |ctx| ctx.set_paused(caller, true))?;
        info!("Token {} paused by {}", self.address, caller);
        Ok(())
    }

    /// Owner only.
    pub fn unpause(&mut self, caller: &Address) -> Result<(), LedgerError> {
        self.execute("unpause", caller, |ctx| ctx.set_paused(caller, false))?;
        info!("Token {} unpaused by {}", self.address, caller);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::*;
    use maskin_common::{error::LedgerError, event::LedgerEvent};

    #[test]
    fn test_pause_transitions() {
        let mut token = token();
        assert_eq!(token.unpause(&addr(OWNER)), Err(LedgerError::InvalidStateTransition));
        assert_eq!(token.pause(&addr(ADMIN)), Err(LedgerError::Unauthorized));

        token.pause(&addr(OWNER)).unwrap();
        assert_eq!(token.is_paused(), Ok(true));
        assert_eq!(token.pause(&addr(OWNER)), Err(LedgerError::InvalidStateTransition));

        token.unpause(&addr(OWNER)).unwrap();
        assert_eq!(token.is_paused(), Ok(false));

        let names: Vec<_> = token
            .events()
            .iter()
            .filter(|e| matches!(e.event, LedgerEvent::Pause | LedgerEvent::Unpause))
            .map(|e| e.event.clone())
            .collect();
        assert_eq!(names, vec![LedgerEvent::Pause, LedgerEvent::Unpause]);
    }
}
