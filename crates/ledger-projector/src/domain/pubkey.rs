//! # Consensus Public Keys
//!
//! Validators declare their consensus key as a packed `Any`. Two key types
//! are understood: ed25519 (Tendermint's default) and compressed secp256k1.

use std::fmt;

use prost::Message;
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use shared_types::Any;

use super::errors::DecodeError;

pub mod type_urls {
    pub const ED25519: &str = "/cosmos.crypto.ed25519.PubKey";
    pub const SECP256K1: &str = "/cosmos.crypto.secp256k1.PubKey";
}

pub const ED25519_KEY_LEN: usize = 32;
pub const SECP256K1_KEY_LEN: usize = 33;

/// Length of a consensus address payload.
pub const ADDRESS_LEN: usize = 20;

#[derive(Clone, PartialEq, ::prost::Message)]
struct ProtoPubKey {
    #[prost(bytes = "vec", tag = "1")]
    key: Vec<u8>,
}

/// A decoded consensus public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsensusPubKey {
    Ed25519([u8; ED25519_KEY_LEN]),
    Secp256k1([u8; SECP256K1_KEY_LEN]),
}

impl ConsensusPubKey {
    pub fn decode(any: &Any) -> Result<Self, DecodeError> {
        match any.type_url.as_str() {
            type_urls::ED25519 => {
                let key = unpack_key(any, type_urls::ED25519, ED25519_KEY_LEN)?;
                let mut bytes = [0u8; ED25519_KEY_LEN];
                bytes.copy_from_slice(&key);
                Ok(Self::Ed25519(bytes))
            }
            type_urls::SECP256K1 => {
                let key = unpack_key(any, type_urls::SECP256K1, SECP256K1_KEY_LEN)?;
                let mut bytes = [0u8; SECP256K1_KEY_LEN];
                bytes.copy_from_slice(&key);
                Ok(Self::Secp256k1(bytes))
            }
            other => Err(DecodeError::UnsupportedType {
                type_url: other.to_string(),
            }),
        }
    }

    pub fn to_any(&self) -> Any {
        let (type_url, key) = match self {
            Self::Ed25519(key) => (type_urls::ED25519, key.to_vec()),
            Self::Secp256k1(key) => (type_urls::SECP256K1, key.to_vec()),
        };
        Any::new(type_url, ProtoPubKey { key }.encode_to_vec())
    }

    /// Consensus address payload of the key.
    ///
    /// ed25519: first 20 bytes of SHA-256. secp256k1: RIPEMD-160 of SHA-256.
    pub fn address(&self) -> [u8; ADDRESS_LEN] {
        let mut out = [0u8; ADDRESS_LEN];
        match self {
            Self::Ed25519(key) => {
                let digest = Sha256::digest(key);
                out.copy_from_slice(&digest[..ADDRESS_LEN]);
            }
            Self::Secp256k1(key) => {
                let digest = Ripemd160::digest(Sha256::digest(key));
                out.copy_from_slice(&digest);
            }
        }
        out
    }
}

impl fmt::Display for ConsensusPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519(key) => write!(f, "PubKeyEd25519{{{}}}", hex::encode_upper(key)),
            Self::Secp256k1(key) => write!(f, "PubKeySecp256k1{{{}}}", hex::encode_upper(key)),
        }
    }
}

fn unpack_key(
    any: &Any,
    type_url: &'static str,
    expected: usize,
) -> Result<Vec<u8>, DecodeError> {
    let msg = ProtoPubKey::decode(any.value.as_slice()).map_err(|source| {
        DecodeError::Malformed {
            type_url: type_url.to_string(),
            source,
        }
    })?;
    if msg.key.len() != expected {
        return Err(DecodeError::InvalidKeyLength {
            type_url,
            expected,
            actual: msg.key.len(),
        });
    }
    Ok(msg.key)
}
