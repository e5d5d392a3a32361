use crate::amount::{self, Amount};
use crate::crypto::Address;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Domain events emitted by committed operations.
///
/// Events of a rejected operation are never observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display)]
#[serde(tag = "event", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LedgerEvent {
    SetToken {
        token: Address,
    },
    FundsDistributed {
        holders: Vec<Address>,
        #[serde(with = "amount::decimal_vec")]
        amounts: Vec<Amount>,
    },
    MintSubmission {
        mint_request_id: u64,
        sender: Address,
        #[serde(with = "amount::decimal")]
        amount: Amount,
    },
    ConfirmMintRequest {
        mint_request_id: u64,
        addr: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
    },
    ChangePaidRates {
        system_paid_rate: u8,
        writer_paid_rate: u8,
    },
    ChangeWallet {
        wallet: Address,
    },
    ChangeDeputation {
        deputation: Address,
    },
    DelegatedFromSet {
        addr: Address,
    },
    Mint {
        to: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
    },
    Transfer {
        from: Address,
        to: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
    },
    Approval {
        owner: Address,
        spender: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
    },
    Burn {
        burner: Address,
        #[serde(with = "amount::decimal")]
        value: Amount,
        note: String,
    },
    Pause,
    Unpause,
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

/// An event together with the contract that emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedEvent {
    pub contract: Address,
    #[serde(flatten)]
    pub event: LedgerEvent,
}
