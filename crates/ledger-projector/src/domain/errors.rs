//! # Domain Errors
//!
//! Error types for the projection layer.
//!
//! Every failure is wrapped with the context it happened in (what was looked
//! up or decoded, at which height or id) and returned to the caller. Nothing
//! is retried or recovered here; [`ProjectorError::kind`] only classifies.

use std::fmt;
use std::num::ParseIntError;

use shared_types::{EventLogError, Height};
use thiserror::Error;

use crate::ports::{AccessorError, AvatarError, SinkError};

/// Address re-encoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The address is not valid bech32 / bech32m.
    #[error("invalid bech32 address: {0}")]
    Decode(#[source] bech32::Error),

    /// The payload could not be encoded under the target prefix.
    #[error("cannot encode under prefix {prefix:?}: {source}")]
    Encode {
        prefix: String,
        #[source]
        source: bech32::Error,
    },
}

/// Failures unpacking polymorphic `Any` payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The type URL is outside the supported family.
    #[error("unsupported type {type_url}")]
    UnsupportedType { type_url: String },

    /// The protobuf bytes do not decode as the announced type.
    #[error("malformed {type_url} payload: {source}")]
    Malformed {
        type_url: String,
        #[source]
        source: prost::DecodeError,
    },

    /// A public key of the wrong size.
    #[error("invalid {type_url} key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        type_url: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A coin amount that is not an unsigned integer.
    #[error("invalid amount {amount:?} in {type_url} payload")]
    InvalidAmount { type_url: String, amount: String },
}

/// Coarse classification of a [`ProjectorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Expected event or attribute absent, or no corroborating record.
    Lookup,
    /// Malformed payload or address.
    Decode,
    /// Accessor, store or identity service failure.
    External,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lookup => f.write_str("lookup"),
            Self::Decode => f.write_str("decode"),
            Self::External => f.write_str("external"),
        }
    }
}

/// Error returned by every projector and dispatcher operation.
#[derive(Debug, Error)]
pub enum ProjectorError {
    #[error("error while searching for {event_type} event in message {index} of tx {tx_hash}: {source}")]
    EventLookup {
        tx_hash: String,
        index: usize,
        event_type: &'static str,
        #[source]
        source: EventLogError,
    },

    #[error("error while searching for {key} attribute of {event_type} event: {source}")]
    AttributeLookup {
        event_type: &'static str,
        key: &'static str,
        #[source]
        source: EventLogError,
    },

    #[error("error while parsing proposal id {raw:?}: {source}")]
    InvalidProposalId {
        raw: String,
        #[source]
        source: ParseIntError,
    },

    #[error("error while getting proposal {proposal_id} at height {height}: {source}")]
    ProposalQuery {
        proposal_id: u64,
        height: Height,
        #[source]
        source: AccessorError,
    },

    #[error("chain returned proposal {returned} when asked for proposal {requested} at height {height}")]
    ProposalMismatch {
        requested: u64,
        returned: u64,
        height: Height,
    },

    #[error("error while getting deposits of proposal {proposal_id} at height {height}: {source}")]
    DepositsQuery {
        proposal_id: u64,
        height: Height,
        #[source]
        source: AccessorError,
    },

    #[error("no deposit from {depositor} on proposal {proposal_id} at height {height}")]
    DepositNotFound {
        proposal_id: u64,
        depositor: String,
        height: Height,
    },

    #[error("error while getting validator {operator} at height {height}: {source}")]
    ValidatorQuery {
        operator: String,
        height: Height,
        #[source]
        source: AccessorError,
    },

    #[error("error while getting balances of {count} accounts at height {height}: {source}")]
    BalancesQuery {
        count: usize,
        height: Height,
        #[source]
        source: AccessorError,
    },

    #[error("no balances returned for {count} accounts at height {height}")]
    BalancesNotFound { count: usize, height: Height },

    #[error("error while unpacking content of proposal {proposal_id}: {source}")]
    ContentDecode {
        proposal_id: u64,
        #[source]
        source: DecodeError,
    },

    #[error("error while unpacking pub key of validator {operator}: {source}")]
    PubKeyDecode {
        operator: String,
        #[source]
        source: DecodeError,
    },

    #[error("error while converting {address} to {prefix} prefix: {source}")]
    AddressConversion {
        prefix: String,
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("error while getting avatar URL for identity {identity:?}: {source}")]
    AvatarLookup {
        identity: String,
        #[source]
        source: AvatarError,
    },

    #[error("error while saving {entity}: {source}")]
    Store {
        entity: &'static str,
        #[source]
        source: SinkError,
    },
}

impl ProjectorError {
    /// Which of the three failure families this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EventLookup { .. }
            | Self::AttributeLookup { .. }
            | Self::ProposalMismatch { .. }
            | Self::DepositNotFound { .. }
            | Self::BalancesNotFound { .. } => ErrorKind::Lookup,

            Self::InvalidProposalId { .. }
            | Self::ContentDecode { .. }
            | Self::PubKeyDecode { .. }
            | Self::AddressConversion { .. } => ErrorKind::Decode,

            Self::ProposalQuery { source, .. }
            | Self::DepositsQuery { source, .. }
            | Self::ValidatorQuery { source, .. }
            | Self::BalancesQuery { source, .. } => match source {
                AccessorError::NotFound { .. } => ErrorKind::Lookup,
                _ => ErrorKind::External,
            },

            Self::AvatarLookup { .. } | Self::Store { .. } => ErrorKind::External,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_context() {
        let err = ProjectorError::DepositNotFound {
            proposal_id: 7,
            depositor: "cosmos1depositor".to_string(),
            height: 120,
        };
        let message = err.to_string();
        assert!(message.contains("7"));
        assert!(message.contains("cosmos1depositor"));
        assert!(message.contains("120"));
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_query_kind_follows_accessor_error() {
        let missing = ProjectorError::ProposalQuery {
            proposal_id: 1,
            height: 5,
            source: AccessorError::NotFound {
                what: "proposal 1".to_string(),
                height: 5,
            },
        };
        assert_eq!(missing.kind(), ErrorKind::Lookup);

        let unavailable = ProjectorError::ProposalQuery {
            proposal_id: 1,
            height: 5,
            source: AccessorError::Unavailable("connection refused".to_string()),
        };
        assert_eq!(unavailable.kind(), ErrorKind::External);
    }

    #[test]
    fn test_invalid_proposal_id_is_decode() {
        let source = "abc".parse::<u64>().unwrap_err();
        let err = ProjectorError::InvalidProposalId {
            raw: "abc".to_string(),
            source,
        };
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(ErrorKind::Decode.to_string(), "decode");
    }
}
