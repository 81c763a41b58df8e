//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the projection layer consumes: height-pinned chain state,
//! the idempotent state sink, and the identity service used for avatars.
//!
//! All calls are synchronous round trips. Retries belong to the host.

use shared_types::{ChainBalance, ChainDeposit, ChainProposal, ChainValidator, Coin, Coins, Height};
use thiserror::Error;

use crate::domain::{
    AccountBalance, Deposit, Proposal, Validator, ValidatorCommission, ValidatorDescription, Vote,
};

/// Point-in-time read access to chain state.
///
/// Every query is pinned to a height so results do not depend on how far
/// the chain has progressed since.
pub trait ChainStateAccessor: Send + Sync {
    /// Balances of the given native addresses.
    fn get_balances(
        &self,
        addresses: &[String],
        height: Height,
    ) -> Result<Vec<ChainBalance>, AccessorError>;

    /// Total supply of one denomination.
    fn get_supply(&self, height: Height, denom: &str) -> Result<Coin, AccessorError>;

    /// Balance of a single native address.
    fn get_account_balance(&self, address: &str, height: Height) -> Result<Coins, AccessorError>;

    /// The full proposal, including status and timestamps.
    fn proposal(&self, height: Height, proposal_id: u64) -> Result<ChainProposal, AccessorError>;

    /// Cumulative deposits made on a proposal, one entry per depositor.
    fn proposal_deposits(
        &self,
        height: Height,
        proposal_id: u64,
    ) -> Result<Vec<ChainDeposit>, AccessorError>;

    /// A validator by native operator address.
    fn validator(
        &self,
        height: Height,
        operator_address: &str,
    ) -> Result<ChainValidator, AccessorError>;
}

/// Idempotent persistence of projected records.
///
/// Every method is an upsert keyed by the record's natural identity, so
/// replaying a message writes the same rows again instead of duplicating
/// them. The three validator tables may be written in any order and any
/// subset.
pub trait StateSink: Send + Sync {
    fn save_proposals(&self, proposals: Vec<Proposal>) -> Result<(), SinkError>;

    fn save_deposits(&self, deposits: Vec<Deposit>) -> Result<(), SinkError>;

    fn save_vote(&self, vote: Vote) -> Result<(), SinkError>;

    fn save_validator_data(&self, validator: Validator) -> Result<(), SinkError>;

    fn save_validator_description(
        &self,
        description: ValidatorDescription,
    ) -> Result<(), SinkError>;

    fn save_validator_commission(&self, commission: ValidatorCommission)
        -> Result<(), SinkError>;

    fn save_account_balances(&self, balances: Vec<AccountBalance>) -> Result<(), SinkError>;
}

/// Resolves a validator's declared identity to an avatar URL.
pub trait AvatarResolver: Send + Sync {
    /// Avatar URL for `identity`, or an empty string when the identity has
    /// no picture.
    fn avatar_url(&self, identity: &str) -> Result<String, AvatarError>;
}

/// Chain state query errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessorError {
    /// The height or id is unknown.
    #[error("{what} not found at height {height}")]
    NotFound { what: String, height: Height },

    /// The backing node could not answer.
    #[error("chain state unavailable: {0}")]
    Unavailable(String),
}

/// Store write errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Identity service errors.
#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("identity service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("identity service returned status {code}: {desc}")]
    Status { code: i64, desc: String },

    #[error("failed to parse identity service response: {0}")]
    Parse(String),

    #[error("resolver lock poisoned")]
    LockPoisoned,
}
