use super::{Context, Token};
use crate::storage::LedgerProvider;
use log::info;
use maskin_common::{
    amount::Amount, crypto::Address, error::LedgerError, event::LedgerEvent, mint::MintRequest,
    rates::PaidRates,
};

impl Context<'_> {
    /// Mint `value` split three ways: writer share to `writer`, system share
    /// to the wallet, holder share to the deputation pool. Total supply grows
    /// by `value` once.
    pub(crate) fn mint_split(&mut self, writer: &Address, value: Amount) -> Result<(), LedgerError> {
        let settings = self.storage.get_settings()?;
        let split = settings.rates.split(value);

        self.credit(writer, split.writer)?;
        self.credit(&settings.wallet, split.system)?;
        self.credit(&settings.deputation, split.holders)?;
        self.increase_supply(value)
    }
}

impl Token {
    /// Owner only, once. Credit the genesis allocation to the owner,
    /// bypassing the revenue split.
    pub fn pre_mint(&mut self, caller: &Address) -> Result<(), LedgerError> {
        let minted = self.execute("pre_mint", caller, |ctx| {
            let owner = *ctx.storage.get_access()?.owner();
            if owner != *caller {
                return Err(LedgerError::Unauthorized);
            }
            let mut settings = ctx.storage.get_settings()?;
            if settings.pre_minted {
                return Err(LedgerError::AlreadyMinted);
            }
            settings.pre_minted = true;
            let value = settings.initial_supply;
            ctx.storage.set_settings(settings)?;

            ctx.credit(&owner, value)?;
            ctx.increase_supply(value)?;
            Ok(value)
        })?;
        info!("Token {}: initial supply {} minted", self.address, minted);
        Ok(())
    }

    /// Admin only. Mint directly, without a request, using the same split
    /// as a confirmed request.
    pub fn mint(&mut self, caller: &Address, to: &Address, value: Amount) -> Result<(), LedgerError> {
        self.execute("mint", caller, |ctx| {
            ctx.storage.get_access()?.require_admin(caller)?;
            if to.is_null() {
                return Err(LedgerError::invalid("cannot mint to the null address"));
            }
            ctx.mint_split(to, value)
        })
    }

    /// Operator only. Record a request to mint `amount` for `beneficiary`
    /// and return its id.
    pub fn submit_mint_request(
        &mut self,
        caller: &Address,
        beneficiary: &Address,
        amount: Amount,
    ) -> Result<u64, LedgerError> {
        self.execute("submit_mint_request", caller, |ctx| {
            ctx.storage.get_access()?.require_operator(caller)?;
            if beneficiary.is_null() {
                return Err(LedgerError::invalid("beneficiary must not be the null address"));
            }
            if amount.is_zero() {
                return Err(LedgerError::invalid("mint amount must be positive"));
            }

            let id = ctx
                .storage
                .add_mint_request(MintRequest::new(*beneficiary, amount))?;
            ctx.emit(LedgerEvent::MintSubmission {
                mint_request_id: id,
                sender: *beneficiary,
                amount,
            });
            Ok(id)
        })
    }

    /// Admin only. Execute request `id` exactly once.
    pub fn confirm_mint_request(&mut self, caller: &Address, id: u64) -> Result<(), LedgerError> {
        self.execute("confirm_mint_request", caller, |ctx| {
            ctx.storage.get_access()?.require_admin(caller)?;
            let mut request = ctx
                .storage
                .get_mint_request(id)?
                .ok_or(LedgerError::NotFound(id))?;
            if request.is_executed {
                return Err(LedgerError::AlreadyExecuted(id));
            }

            request.is_executed = true;
            let (beneficiary, value) = (request.beneficiary, request.amount);
            ctx.storage.set_mint_request(id, request)?;

            ctx.mint_split(&beneficiary, value)?;
            ctx.emit(LedgerEvent::ConfirmMintRequest {
                mint_request_id: id,
                addr: beneficiary,
                value,
            });
            Ok(())
        })
    }

    /// Admin only.
    pub fn change_paid_rates(
        &mut self,
        caller: &Address,
        system_paid_rate: u8,
        writer_paid_rate: u8,
    ) -> Result<(), LedgerError> {
        self.execute("change_paid_rates", caller, |ctx| {
            ctx.storage.get_access()?.require_admin(caller)?;
            let mut settings = ctx.storage.get_settings()?;
            settings.rates = PaidRates::new(system_paid_rate, writer_paid_rate)?;
            ctx.storage.set_settings(settings)?;
            ctx.emit(LedgerEvent::ChangePaidRates {
                system_paid_rate,
                writer_paid_rate,
            });
            Ok(())
        })?;
        info!(
            "Token {}: paid rates now system {} writer {}",
            self.address, system_paid_rate, writer_paid_rate
        );
        Ok(())
    }

    /// Admin only. Replace the system wallet.
    pub fn change_wallet(&mut self, caller: &Address, wallet: &Address) -> Result<(), LedgerError> {
        self.execute("change_wallet", caller, |ctx| {
            ctx.storage.get_access()?.require_admin(caller)?;
            if wallet.is_null() {
                return Err(LedgerError::invalid("wallet must not be the null address"));
            }
            let mut settings = ctx.storage.get_settings()?;
            settings.wallet = *wallet;
            ctx.storage.set_settings(settings)?;
            ctx.emit(LedgerEvent::ChangeWallet { wallet: *wallet });
            Ok(())
        })?;
        info!("Token {}: system wallet now {}", self.address, wallet);
        Ok(())
    }

    /// Admin only. Replace the holder pool.
    pub fn change_deputation(
        &mut self,
        caller: &Address,
        deputation: &Address,
    ) -> Result<(), LedgerError> {
        self.execute("change_deputation", caller, |ctx| {
            ctx.storage.get_access()?.require_admin(caller)?;
            if deputation.is_null() {
                return Err(LedgerError::invalid(
                    "deputation must not be the null address",
                ));
            }
            let mut settings = ctx.storage.get_settings()?;
            settings.deputation = *deputation;
            ctx.storage.set_settings(settings)?;
            ctx.emit(LedgerEvent::ChangeDeputation {
                deputation: *deputation,
            });
            Ok(())
        })?;
        info!("Token {}: deputation now {}", self.address, deputation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::*;
    use maskin_common::{amount::U256, error::LedgerError, event::LedgerEvent};

    #[test]
    fn test_pre_mint_once() {
        let mut token = token();
        assert_eq!(token.pre_mint(&addr(ADMIN)), Err(LedgerError::Unauthorized));
        token.pre_mint(&addr(OWNER)).unwrap();
        assert_eq!(token.balance_of(&addr(OWNER)), amount(1_000_000));
        assert_eq!(token.total_supply(), amount(1_000_000));
        assert_eq!(token.pre_mint(&addr(OWNER)), Err(LedgerError::AlreadyMinted));
        assert_eq!(token.total_supply(), amount(1_000_000));
    }

    #[test]
    fn test_submit_validation() {
        let mut token = token();
        assert_eq!(
            token.submit_mint_request(&addr(ADMIN), &addr(10), amount(5)),
            Err(LedgerError::Unauthorized)
        );
        assert!(matches!(
            token.submit_mint_request(&addr(OPERATOR), &Default::default(), amount(5)),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            token.submit_mint_request(&addr(OPERATOR), &addr(10), U256::zero()),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert_eq!(token.mint_request_count(), Ok(0));
    }

    #[test]
    fn test_request_ids_are_sequential() {
        let mut token = token();
        assert_eq!(token.submit_mint_request(&addr(OPERATOR), &addr(10), amount(5)), Ok(0));
        assert_eq!(token.submit_mint_request(&addr(OPERATOR), &addr(11), amount(6)), Ok(1));
        assert_eq!(token.mint_request_count(), Ok(2));

        let request = token.get_mint_request(1).unwrap();
        assert_eq!(request.beneficiary, addr(11));
        assert_eq!(request.amount, amount(6));
        assert!(!request.is_executed);
        assert_eq!(token.get_mint_request(2), Err(LedgerError::NotFound(2)));
    }

    #[test]
    fn test_confirm_splits_and_executes_once() {
        let mut token = token();
        let id = token
            .submit_mint_request(&addr(OPERATOR), &addr(10), amount(10_000))
            .unwrap();
        assert_eq!(
            token.confirm_mint_request(&addr(OPERATOR), id),
            Err(LedgerError::Unauthorized)
        );
        token.confirm_mint_request(&addr(ADMIN), id).unwrap();

        assert_eq!(token.balance_of(&addr(10)), amount(7_000));
        assert_eq!(token.balance_of(&addr(WALLET)), amount(1_000));
        assert_eq!(token.balance_of(&addr(POOL)), amount(2_000));
        assert_eq!(token.total_supply(), amount(10_000));
        assert!(token.get_mint_request(id).unwrap().is_executed);

        assert_eq!(
            token.confirm_mint_request(&addr(ADMIN), id),
            Err(LedgerError::AlreadyExecuted(id))
        );
        assert_eq!(token.balance_of(&addr(10)), amount(7_000));
        assert_eq!(token.total_supply(), amount(10_000));
        assert_eq!(
            token.confirm_mint_request(&addr(ADMIN), 9),
            Err(LedgerError::NotFound(9))
        );
    }

    #[test]
    fn test_confirm_event_order() {
        let mut token = token();
        token
            .submit_mint_request(&addr(OPERATOR), &addr(10), amount(100))
            .unwrap();
        token.drain_events();
        token.confirm_mint_request(&addr(ADMIN), 0).unwrap();

        let events: Vec<_> = token.events().iter().map(|e| e.event.clone()).collect();
        assert_eq!(events.len(), 7);
        assert_eq!(
            events[0],
            LedgerEvent::Mint {
                to: addr(10),
                value: amount(70)
            }
        );
        assert_eq!(
            events[6],
            LedgerEvent::ConfirmMintRequest {
                mint_request_id: 0,
                addr: addr(10),
                value: amount(100)
            }
        );
    }

    #[test]
    fn test_direct_mint_is_admin_only_and_splits() {
        let mut token = token();
        assert_eq!(
            token.mint(&addr(OPERATOR), &addr(10), amount(100)),
            Err(LedgerError::Unauthorized)
        );
        token.mint(&addr(ADMIN), &addr(10), amount(100)).unwrap();
        assert_eq!(token.balance_of(&addr(10)), amount(70));
        assert_eq!(token.balance_of(&addr(WALLET)), amount(10));
        assert_eq!(token.balance_of(&addr(POOL)), amount(20));
    }

    #[test]
    fn test_mint_allowed_while_paused() {
        let mut token = token();
        token.pause(&addr(OWNER)).unwrap();
        token.mint(&addr(ADMIN), &addr(10), amount(100)).unwrap();
        token
            .submit_mint_request(&addr(OPERATOR), &addr(10), amount(100))
            .unwrap();
        token.confirm_mint_request(&addr(ADMIN), 0).unwrap();
        token.pre_mint(&addr(OWNER)).unwrap();
        assert_eq!(token.balance_of(&addr(10)), amount(140));
    }

    #[test]
    fn test_change_paid_rates() {
        let mut token = token();
        assert!(token.change_paid_rates(&addr(ADMIN), 100, 0).is_err());
        assert!(token.change_paid_rates(&addr(ADMIN), 30, 70).is_err());
        assert_eq!(
            token.change_paid_rates(&addr(OWNER), 5, 5),
            Err(LedgerError::Unauthorized)
        );

        token.change_paid_rates(&addr(ADMIN), 20, 50).unwrap();
        let rates = token.paid_rates().unwrap();
        assert_eq!((rates.system(), rates.writer(), rates.holders()), (20, 50, 30));

        token.mint(&addr(ADMIN), &addr(10), amount(1_000)).unwrap();
        assert_eq!(token.balance_of(&addr(10)), amount(500));
        assert_eq!(token.balance_of(&addr(WALLET)), amount(200));
        assert_eq!(token.balance_of(&addr(POOL)), amount(300));
    }

    #[test]
    fn test_change_wallet_and_deputation() {
        let mut token = token();
        assert!(token.change_wallet(&addr(ADMIN), &Default::default()).is_err());
        assert!(token.change_deputation(&addr(ADMIN), &Default::default()).is_err());
        assert_eq!(
            token.change_wallet(&addr(OPERATOR), &addr(70)),
            Err(LedgerError::Unauthorized)
        );

        token.change_wallet(&addr(ADMIN), &addr(70)).unwrap();
        token.change_deputation(&addr(ADMIN), &addr(71)).unwrap();
        token.mint(&addr(ADMIN), &addr(10), amount(100)).unwrap();
        assert_eq!(token.balance_of(&addr(70)), amount(10));
        assert_eq!(token.balance_of(&addr(71)), amount(20));
        assert_eq!(token.balance_of(&addr(POOL)), U256::zero());
    }

    #[test]
    fn test_zero_shares_are_skipped() {
        let mut token = token();
        // 5 * 10 / 100 = 0 for the wallet
        token.mint(&addr(ADMIN), &addr(10), amount(5)).unwrap();
        assert_eq!(token.balance_of(&addr(WALLET)), U256::zero());
        assert_eq!(token.is_holder(&addr(WALLET)), Ok(false));
        assert_eq!(token.balance_of(&addr(10)), amount(3));
        assert_eq!(token.balance_of(&addr(POOL)), amount(2));
        assert_eq!(token.total_supply(), amount(5));
    }
}
