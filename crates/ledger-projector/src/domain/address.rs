//! # Address Codec
//!
//! Re-encodes bech32 addresses from the source chain's prefix to the target
//! network's prefix. The payload is carried over untouched, only the
//! human-readable part and the checksum change.

use bech32::{FromBase32, ToBase32, Variant};

use super::config::AddressPrefixes;
use super::errors::{AddressError, ProjectorError};

/// Re-encode `address` under `target_prefix`.
///
/// The source prefix is read from the address itself. The checksum variant
/// (bech32 or bech32m) of the source is kept.
pub fn convert(target_prefix: &str, address: &str) -> Result<String, AddressError> {
    let (_, data, variant) = bech32::decode(address).map_err(AddressError::Decode)?;
    bech32::encode(target_prefix, data, variant).map_err(|source| AddressError::Encode {
        prefix: target_prefix.to_string(),
        source,
    })
}

/// Encode raw payload bytes as a bech32 address under `prefix`.
pub fn encode(prefix: &str, payload: &[u8]) -> Result<String, AddressError> {
    bech32::encode(prefix, payload.to_base32(), Variant::Bech32).map_err(|source| {
        AddressError::Encode {
            prefix: prefix.to_string(),
            source,
        }
    })
}

/// Split an address into its prefix and raw payload bytes.
pub fn decode(address: &str) -> Result<(String, Vec<u8>), AddressError> {
    let (prefix, data, _) = bech32::decode(address).map_err(AddressError::Decode)?;
    let payload = Vec::<u8>::from_base32(&data).map_err(AddressError::Decode)?;
    Ok((prefix, payload))
}

/// Converts addresses to the target prefix of each address class.
///
/// Projectors route every address field through one of these methods before
/// building a record.
#[derive(Debug, Clone)]
pub struct AddressConverter {
    prefixes: AddressPrefixes,
}

impl AddressConverter {
    pub fn new(prefixes: AddressPrefixes) -> Self {
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &AddressPrefixes {
        &self.prefixes
    }

    pub fn to_account(&self, address: &str) -> Result<String, ProjectorError> {
        Self::convert_to(&self.prefixes.account, address)
    }

    pub fn to_validator_operator(&self, address: &str) -> Result<String, ProjectorError> {
        Self::convert_to(&self.prefixes.validator_operator, address)
    }

    pub fn to_validator_consensus(&self, address: &str) -> Result<String, ProjectorError> {
        Self::convert_to(&self.prefixes.validator_consensus, address)
    }

    /// Consensus address for a public key hash.
    pub fn consensus_from_payload(&self, payload: &[u8]) -> Result<String, ProjectorError> {
        encode(&self.prefixes.validator_consensus, payload).map_err(|source| {
            ProjectorError::AddressConversion {
                prefix: self.prefixes.validator_consensus.clone(),
                address: hex::encode_upper(payload),
                source,
            }
        })
    }

    fn convert_to(prefix: &str, address: &str) -> Result<String, ProjectorError> {
        convert(prefix, address).map_err(|source| ProjectorError::AddressConversion {
            prefix: prefix.to_string(),
            address: address.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const PAYLOAD: [u8; 20] = [0x11; 20];

    fn corrupt_checksum(address: &str) -> String {
        let mut chars: Vec<char> = address.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'q' { 'p' } else { 'q' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_convert_keeps_payload() {
        let source = encode("cosmos", &PAYLOAD).unwrap();
        let converted = convert("like", &source).unwrap();

        assert!(converted.starts_with("like1"));
        assert_eq!(converted, encode("like", &PAYLOAD).unwrap());

        let (prefix, payload) = decode(&converted).unwrap();
        assert_eq!(prefix, "like");
        assert_eq!(payload, PAYLOAD.to_vec());
    }

    #[test]
    fn test_convert_to_same_prefix_is_identity() {
        let source = encode("like", &PAYLOAD).unwrap();
        assert_eq!(convert("like", &source).unwrap(), source);
    }

    #[test]
    fn test_convert_keeps_bech32m_variant() {
        let source = bech32::encode("cosmos", PAYLOAD.to_base32(), Variant::Bech32m).unwrap();
        let converted = convert("like", &source).unwrap();

        let (_, _, variant) = bech32::decode(&converted).unwrap();
        assert_eq!(variant, Variant::Bech32m);
    }

    #[test]
    fn test_convert_rejects_bad_checksum() {
        let source = encode("cosmos", &PAYLOAD).unwrap();
        let result = convert("like", &corrupt_checksum(&source));
        assert!(matches!(result, Err(AddressError::Decode(_))));
    }

    #[test]
    fn test_convert_rejects_non_bech32() {
        assert!(convert("like", "0x11111111111111111111").is_err());
        assert!(convert("like", "").is_err());
    }

    #[test]
    fn test_converter_wraps_errors_with_context() {
        let converter = AddressConverter::new(AddressPrefixes::default());
        let err = converter.to_account("not-an-address").unwrap_err();

        match err {
            ProjectorError::AddressConversion {
                prefix, address, ..
            } => {
                assert_eq!(prefix, "like");
                assert_eq!(address, "not-an-address");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_converter_uses_class_prefixes() {
        let converter = AddressConverter::new(AddressPrefixes::default());
        let source = encode("cosmosvaloper", &PAYLOAD).unwrap();

        assert!(converter.to_account(&source).unwrap().starts_with("like1"));
        assert!(converter
            .to_validator_operator(&source)
            .unwrap()
            .starts_with("likevaloper1"));
        assert!(converter
            .to_validator_consensus(&source)
            .unwrap()
            .starts_with("likevalcons1"));
        assert_eq!(
            converter.consensus_from_payload(&PAYLOAD).unwrap(),
            encode("likevalcons", &PAYLOAD).unwrap()
        );
    }

    fn prefix_strategy() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "cosmos",
            "cosmosvaloper",
            "cosmosvalcons",
            "like",
            "likevaloper",
            "likevalcons",
            "osmo",
        ])
    }

    proptest! {
        #[test]
        fn prop_round_trip_between_prefixes(
            payload in prop::collection::vec(any::<u8>(), 20..=32),
            a in prefix_strategy(),
            b in prefix_strategy(),
        ) {
            let original = encode(a, &payload).unwrap();
            let via_a = convert(a, &original).unwrap();
            let via_b = convert(b, &via_a).unwrap();

            prop_assert_eq!(via_b, encode(b, &payload).unwrap());
        }
    }
}
