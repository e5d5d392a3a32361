//! Token amounts.
//!
//! Amounts are 256-bit unsigned integers. The state machine only ever does
//! checked arithmetic on them; the one place where wraparound is observable
//! is [`parse_wrapping`], which decodes caller input modulo 2^256.

use crate::config::COIN_VALUE;
use crate::error::LedgerError;
pub use primitive_types::U256;

pub type Amount = U256;

/// Decode an unsigned decimal string of any width, modulo 2^256.
///
/// `2^256` decodes to 0 and `2^256 + 5` to 5, the same value a caller would
/// end up with after the host platform truncated the argument to 256 bits.
pub fn parse_wrapping(value: &str) -> Result<Amount, LedgerError> {
    let digits = value.trim();
    if digits.is_empty() {
        return Err(LedgerError::InvalidArgument("empty amount".into()));
    }

    let ten = U256::from(10u8);
    let mut result = U256::zero();
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let digit = c
            .to_digit(10)
            .ok_or_else(|| LedgerError::InvalidArgument(format!("invalid digit '{c}' in amount")))?;
        let (shifted, _) = result.overflowing_mul(ten);
        let (next, _) = shifted.overflowing_add(U256::from(digit));
        result = next;
    }
    Ok(result)
}

/// `count` whole tokens in base units.
pub fn tokens(count: u64) -> Amount {
    U256::from(count) * *COIN_VALUE
}

/// Sum a slice of amounts, `None` on overflow.
pub fn checked_sum(amounts: &[Amount]) -> Option<Amount> {
    amounts
        .iter()
        .try_fold(U256::zero(), |acc, amount| acc.checked_add(*amount))
}

/// Serde adapter writing amounts as decimal strings and reading them back
/// through [`parse_wrapping`].
pub mod decimal {
    use super::{parse_wrapping, Amount};
    use serde::de::Error as SerdeError;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Amount, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_wrapping(&raw).map_err(SerdeError::custom)
    }
}

/// Same as [`decimal`] for a list of amounts.
pub mod decimal_vec {
    use super::{parse_wrapping, Amount};
    use serde::de::Error as SerdeError;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(values: &[Amount], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Amount>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|value| parse_wrapping(value).map_err(SerdeError::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2^256 - 1
    const MAX: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639935";
    // 2^256
    const OVER: &str =
        "115792089237316195423570985008687907853269984665640564039457584007913129639936";

    #[test]
    fn test_parse_small_values() -> Result<(), LedgerError> {
        assert_eq!(parse_wrapping("0")?, U256::zero());
        assert_eq!(parse_wrapping("10000")?, U256::from(10_000u64));
        assert_eq!(parse_wrapping("1_000")?, U256::from(1_000u64));
        Ok(())
    }

    #[test]
    fn test_parse_max_and_wrap() -> Result<(), LedgerError> {
        assert_eq!(parse_wrapping(MAX)?, U256::MAX);
        assert_eq!(parse_wrapping(OVER)?, U256::zero());
        Ok(())
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_wrapping("").is_err());
        assert!(parse_wrapping("12a").is_err());
        assert!(parse_wrapping("-1").is_err());
    }

    #[test]
    fn test_tokens_and_checked_sum() {
        assert_eq!(tokens(1), *COIN_VALUE);
        assert_eq!(
            checked_sum(&[U256::from(1u8), U256::from(2u8)]),
            Some(U256::from(3u8))
        );
        assert_eq!(checked_sum(&[U256::MAX, U256::one()]), None);
        assert_eq!(checked_sum(&[]), Some(U256::zero()));
    }
}
