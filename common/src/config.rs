use crate::amount::{self, Amount, U256};
use crate::crypto::Address;
use crate::error::LedgerError;
use crate::rates::{PaidRates, DEFAULT_SYSTEM_PAID_RATE, DEFAULT_WRITER_PAID_RATE};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Token decimals
pub const DECIMALS: u8 = 18;
// Rates are whole percentages
pub const RATE_DENOMINATOR: u64 = 100;
// Whole tokens minted to the owner by the genesis allocation
pub const INITIAL_SUPPLY_TOKENS: u64 = 500_000_000;

// Labels used to derive contract addresses from a deployer
pub const TOKEN_ADDRESS_LABEL: &str = "token";
pub const DEPUTATION_ADDRESS_LABEL: &str = "deputation";

lazy_static! {
    // 10^18 base units per token
    pub static ref COIN_VALUE: Amount = U256::exp10(DECIMALS as usize);
    pub static ref INITIAL_SUPPLY: Amount = U256::from(INITIAL_SUPPLY_TOKENS) * *COIN_VALUE;
}

fn default_system_paid_rate() -> u8 {
    DEFAULT_SYSTEM_PAID_RATE
}

fn default_writer_paid_rate() -> u8 {
    DEFAULT_WRITER_PAID_RATE
}

fn default_initial_supply() -> Amount {
    *INITIAL_SUPPLY
}

/// Construction parameters of a token ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Address of the token contract itself, derived from `owner` if absent
    #[serde(default)]
    pub address: Option<Address>,
    pub owner: Address,
    /// Receives the system share of every mint
    pub system_wallet: Address,
    /// Holder pool, derived from `owner` if absent
    #[serde(default)]
    pub deputation: Option<Address>,
    #[serde(default = "default_system_paid_rate")]
    pub system_paid_rate: u8,
    #[serde(default = "default_writer_paid_rate")]
    pub writer_paid_rate: u8,
    #[serde(default = "default_initial_supply", with = "amount::decimal")]
    pub initial_supply: Amount,
}

impl TokenConfig {
    pub fn new(owner: Address, system_wallet: Address) -> Self {
        Self {
            address: None,
            owner,
            system_wallet,
            deputation: None,
            system_paid_rate: DEFAULT_SYSTEM_PAID_RATE,
            writer_paid_rate: DEFAULT_WRITER_PAID_RATE,
            initial_supply: *INITIAL_SUPPLY,
        }
    }

    pub fn token_address(&self) -> Address {
        self.address
            .unwrap_or_else(|| Address::derive(&self.owner, TOKEN_ADDRESS_LABEL))
    }

    pub fn deputation_address(&self) -> Address {
        self.deputation
            .unwrap_or_else(|| Address::derive(&self.owner, DEPUTATION_ADDRESS_LABEL))
    }

    pub fn rates(&self) -> Result<PaidRates, LedgerError> {
        PaidRates::new(self.system_paid_rate, self.writer_paid_rate)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.owner.is_null() {
            return Err(LedgerError::invalid("owner must not be the null address"));
        }
        if self.system_wallet.is_null() {
            return Err(LedgerError::invalid(
                "system wallet must not be the null address",
            ));
        }
        if self.deputation_address().is_null() {
            return Err(LedgerError::invalid(
                "deputation must not be the null address",
            ));
        }
        if self.token_address().is_null() {
            return Err(LedgerError::invalid(
                "token address must not be the null address",
            ));
        }
        self.rates()?;
        Ok(())
    }
}

/// Who may call `distribute` on a deputation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionMode {
    /// Admins of the deputation only
    #[default]
    Governed,
    /// Anyone
    Open,
}

/// Construction parameters of a deputation (distribution engine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeputationConfig {
    #[serde(default)]
    pub address: Option<Address>,
    pub owner: Address,
    #[serde(default)]
    pub mode: DistributionMode,
}

impl DeputationConfig {
    pub fn new(owner: Address) -> Self {
        Self {
            address: None,
            owner,
            mode: DistributionMode::Governed,
        }
    }

    pub fn address(&self) -> Address {
        self.address
            .unwrap_or_else(|| Address::derive(&self.owner, DEPUTATION_ADDRESS_LABEL))
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.owner.is_null() {
            return Err(LedgerError::invalid("owner must not be the null address"));
        }
        if self.address().is_null() {
            return Err(LedgerError::invalid(
                "deputation must not be the null address",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(*COIN_VALUE, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(
            *INITIAL_SUPPLY,
            U256::from(500_000_000u64) * U256::from(1_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn test_token_config_defaults_from_json() -> Result<(), Box<dyn std::error::Error>> {
        let owner = Address::from_index(1);
        let wallet = Address::from_index(2);
        let json = format!(r#"{{"owner":"{owner}","system_wallet":"{wallet}"}}"#);
        let config: TokenConfig = serde_json::from_str(&json)?;
        assert_eq!(config.system_paid_rate, 10);
        assert_eq!(config.writer_paid_rate, 70);
        assert_eq!(config.initial_supply, *INITIAL_SUPPLY);
        assert_eq!(
            config.deputation_address(),
            Address::derive(&owner, DEPUTATION_ADDRESS_LABEL)
        );
        config.validate()?;
        Ok(())
    }

    #[test]
    fn test_token_config_rejects_bad_values() {
        let mut config = TokenConfig::new(Address::from_index(1), Address::null());
        assert!(config.validate().is_err());

        config.system_wallet = Address::from_index(2);
        config.system_paid_rate = 30;
        config.writer_paid_rate = 70;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deputation_addresses_agree() {
        let deployer = Address::from_index(9);
        let token = TokenConfig::new(deployer, Address::from_index(2));
        let deputation = DeputationConfig::new(deployer);
        assert_eq!(token.deputation_address(), deputation.address());
    }

    #[test]
    fn test_distribution_mode_serde() -> Result<(), Box<dyn std::error::Error>> {
        let mode: DistributionMode = serde_json::from_str("\"open\"")?;
        assert_eq!(mode, DistributionMode::Open);
        assert_eq!(serde_json::to_string(&DistributionMode::Governed)?, "\"governed\"");
        Ok(())
    }
}
