//! Revenue split between writer, system wallet and holder pool.

use crate::amount::{Amount, U256};
use crate::config::RATE_DENOMINATOR;
use crate::error::LedgerError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SYSTEM_PAID_RATE: u8 = 10;
pub const DEFAULT_WRITER_PAID_RATE: u8 = 70;

/// System and writer percentages. The holder percentage is whatever is left
/// and is never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPaidRates")]
pub struct PaidRates {
    system: u8,
    writer: u8,
}

// Unvalidated wire form, only ever turned into `PaidRates` through `new`
#[derive(Deserialize)]
struct RawPaidRates {
    system: u8,
    writer: u8,
}

impl TryFrom<RawPaidRates> for PaidRates {
    type Error = LedgerError;

    fn try_from(raw: RawPaidRates) -> Result<Self, Self::Error> {
        PaidRates::new(raw.system, raw.writer)
    }
}

impl Default for PaidRates {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM_PAID_RATE,
            writer: DEFAULT_WRITER_PAID_RATE,
        }
    }
}

impl PaidRates {
    /// Both rates must be below 100 and leave a strictly positive holder rate.
    pub fn new(system: u8, writer: u8) -> Result<Self, LedgerError> {
        let denominator = RATE_DENOMINATOR as u16;
        if system as u16 >= denominator || writer as u16 >= denominator {
            return Err(LedgerError::invalid("paid rate must be below 100"));
        }
        if system as u16 + writer as u16 >= denominator {
            return Err(LedgerError::invalid(
                "system and writer rates must leave a positive holder rate",
            ));
        }
        Ok(Self { system, writer })
    }

    pub fn system(&self) -> u8 {
        self.system
    }

    pub fn writer(&self) -> u8 {
        self.writer
    }

    pub fn holders(&self) -> u8 {
        // Cannot underflow, `new` keeps system + writer < 100
        (RATE_DENOMINATOR as u8) - self.system - self.writer
    }

    /// Split `amount` three ways.
    ///
    /// System and writer shares truncate; the holder share takes the whole
    /// rounding remainder so the parts always add back up to `amount`.
    pub fn split(&self, amount: Amount) -> Split {
        let denominator = U256::from(RATE_DENOMINATOR);
        let system = share_of(amount, self.system, denominator);
        let writer = share_of(amount, self.writer, denominator);
        // system + writer <= amount * 99 / 100 so this never underflows
        let holders = amount - system - writer;
        Split {
            writer,
            system,
            holders,
        }
    }
}

// amount * rate / denominator without overflowing the intermediate product
fn share_of(amount: Amount, rate: u8, denominator: U256) -> Amount {
    let rate = U256::from(rate);
    match amount.checked_mul(rate) {
        Some(product) => product / denominator,
        None => {
            let whole = amount / denominator;
            let rest = amount % denominator;
            whole * rate + rest * rate / denominator
        }
    }
}

/// Result of [`PaidRates::split`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub writer: Amount,
    pub system: Amount,
    pub holders: Amount,
}
