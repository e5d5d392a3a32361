use super::{hash_parts, HASH_SIZE};
use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use std::{
    convert::TryInto,
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

pub const ADDRESS_SIZE: usize = HASH_SIZE;

const DERIVE_DOMAIN: &[u8] = b"MASKIN_CONTRACT_ADDRESS:";

/// Opaque account identifier.
///
/// Compared by equality only. The all-zero value is the null address: it
/// means "no address" and doubles as the burn target.
#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Hash, Debug, Default)]
pub struct Address([u8; ADDRESS_SIZE]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Address(bytes)
    }

    pub const fn null() -> Self {
        Address::new([0; ADDRESS_SIZE])
    }

    pub fn is_null(&self) -> bool {
        self.0 == [0; ADDRESS_SIZE]
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; ADDRESS_SIZE] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Deterministic contract address
    ///
    /// Formula: address = blake3(domain || deployer || label)
    ///
    /// Lets a deployment script know the token and deputation addresses
    /// before either contract exists, so each can be configured with the
    /// other's address.
    pub fn derive(deployer: &Address, label: &str) -> Self {
        Address(hash_parts(&[
            DERIVE_DOMAIN,
            deployer.as_bytes(),
            label.as_bytes(),
        ]))
    }

    /// Test and tooling helper: an address whose last 8 bytes hold `index`.
    pub fn from_index(index: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes[ADDRESS_SIZE - 8..].copy_from_slice(&index.to_be_bytes());
        Address(bytes)
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|_| "Invalid hex string")?;
        let bytes: [u8; ADDRESS_SIZE] = bytes.try_into().map_err(|_| "Invalid address length")?;
        Ok(Address::new(bytes))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", &self.to_hex())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'a> Deserialize<'a> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let hex = String::deserialize(deserializer)?;
        Address::from_str(&hex).map_err(SerdeError::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_address() {
        assert!(Address::null().is_null());
        assert!(Address::default().is_null());
        assert!(!Address::from_index(1).is_null());
    }

    #[test]
    fn test_hex_roundtrip_with_prefix() -> Result<(), Box<dyn std::error::Error>> {
        let address = Address::from_index(42);
        let parsed: Address = format!("0x{}", address).parse()?;
        assert_eq!(parsed, address);
        Ok(())
    }

    #[test]
    fn test_reject_short_hex() {
        assert!("abcd".parse::<Address>().is_err());
        assert!("zz".parse::<Address>().is_err());
    }

    #[test]
    fn test_derive_is_deterministic_and_label_sensitive() {
        let deployer = Address::from_index(7);
        let token = Address::derive(&deployer, "token");
        assert_eq!(token, Address::derive(&deployer, "token"));
        assert_ne!(token, Address::derive(&deployer, "deputation"));
        assert_ne!(token, Address::derive(&Address::from_index(8), "token"));
        assert!(!token.is_null());
    }

    #[test]
    fn test_serde_as_hex_string() -> Result<(), Box<dyn std::error::Error>> {
        let address = Address::from_index(3);
        let json = serde_json::to_string(&address)?;
        assert_eq!(json, format!("\"{}\"", address.to_hex()));
        let back: Address = serde_json::from_str(&json)?;
        assert_eq!(back, address);
        Ok(())
    }
}
