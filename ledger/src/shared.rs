use crate::token::Token;
use maskin_common::error::LedgerError;
use std::sync::{Arc, Mutex, MutexGuard};

/// A token ledger behind its single mutual-exclusion boundary.
///
/// Every operation on a shared ledger holds the lock for its whole duration,
/// so callers on different threads are applied one at a time.
pub type SharedToken = Arc<Mutex<Token>>;

pub fn shared(token: Token) -> SharedToken {
    Arc::new(Mutex::new(token))
}

pub fn lock(token: &SharedToken) -> Result<MutexGuard<'_, Token>, LedgerError> {
    token.lock().map_err(|_| LedgerError::LockPoisoned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskin_common::{amount::U256, config::TokenConfig, crypto::Address};
    use std::thread;

    #[test]
    fn test_concurrent_transfers_are_serialized() {
        let owner = Address::from_index(1);
        let mut config = TokenConfig::new(owner, Address::from_index(2));
        config.initial_supply = U256::from(8_000u64);
        let token = shared(Token::new(&config).unwrap());
        lock(&token).unwrap().pre_mint(&owner).unwrap();

        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let token = Arc::clone(&token);
                thread::spawn(move || {
                    for _ in 0..100 {
                        lock(&token)
                            .unwrap()
                            .transfer(&owner, &Address::from_index(100 + i), U256::from(10u64))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let token = lock(&token).unwrap();
        assert_eq!(token.balance_of(&owner), U256::zero());
        for i in 0..8u64 {
            assert_eq!(token.balance_of(&Address::from_index(100 + i)), U256::from(1_000u64));
        }
        assert_eq!(token.sheet().sum_of_balances(), Some(token.total_supply()));
    }
}
