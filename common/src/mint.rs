use crate::amount::{self, Amount};
use crate::crypto::Address;
use serde::{Deserialize, Serialize};

/// A proposed issuance waiting for an admin to confirm it.
///
/// Created unexecuted; `is_executed` flips to true exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    pub beneficiary: Address,
    #[serde(with = "amount::decimal")]
    pub amount: Amount,
    pub is_executed: bool,
}

impl MintRequest {
    pub fn new(beneficiary: Address, amount: Amount) -> Self {
        Self {
            beneficiary,
            amount,
            is_executed: false,
        }
    }
}
