//! # Domain Entities
//!
//! The records this layer writes to the store. All of them are plain values
//! with no back-references; the projectors build them, the sink owns
//! persistence and merge semantics.
//!
//! ## Invariants
//!
//! - Every address field holds the target network's encoding.
//! - A record is only built after the defining message has been matched to
//!   an event or a height-pinned query.
//! - No field is derived from the wall clock or randomness, so replaying a
//!   message yields byte-identical records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{Coins, Dec, Description, Height, VoteOption};

use super::content::ProposalContent;

/// Schema-version marker written on every deposit row.
///
/// Always 1 today. Whether this ever grows into a real versioning scheme is
/// undecided, so nothing branches on it.
pub const DEPOSIT_SCHEMA_VERSION: u32 = 1;

/// Schema-version marker written on every vote row.
pub const VOTE_SCHEMA_VERSION: u32 = 1;

// =============================================================================
// GOVERNANCE
// =============================================================================

/// A governance proposal as of its submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub proposal_id: u64,
    pub proposal_route: String,
    pub proposal_type: String,
    pub content: ProposalContent,
    pub status: String,
    pub submit_time: DateTime<Utc>,
    pub deposit_end_time: DateTime<Utc>,
    pub voting_start_time: DateTime<Utc>,
    pub voting_end_time: DateTime<Utc>,
    pub proposer: String,
}

/// A depositor's cumulative deposit on a proposal, observed at `height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub proposal_id: u64,
    pub depositor: String,
    pub amount: Coins,
    pub version: u32,
    pub height: Height,
}

impl Deposit {
    pub fn new(proposal_id: u64, depositor: String, amount: Coins, height: Height) -> Self {
        Self {
            proposal_id,
            depositor,
            amount,
            version: DEPOSIT_SCHEMA_VERSION,
            height,
        }
    }
}

/// A voter's choice on a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub proposal_id: u64,
    pub voter: String,
    pub option: VoteOption,
    pub version: u32,
    pub height: Height,
}

impl Vote {
    pub fn new(proposal_id: u64, voter: String, option: VoteOption, height: Height) -> Self {
        Self {
            proposal_id,
            voter,
            option,
            version: VOTE_SCHEMA_VERSION,
            height,
        }
    }
}

// =============================================================================
// STAKING
// =============================================================================

/// Identity and commission bounds of a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub consensus_address: String,
    pub operator_address: String,
    /// Display form of the consensus public key, e.g. `PubKeyEd25519{...}`.
    pub consensus_pubkey: String,
    pub self_delegate_address: String,
    pub max_change_rate: Dec,
    pub max_rate: Dec,
    pub height: Height,
}

/// Descriptive data of a validator with its resolved avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDescription {
    pub operator_address: String,
    pub description: Description,
    /// Empty when the identity has no picture.
    pub avatar_url: String,
    pub height: Height,
}

/// Current commission of a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorCommission {
    pub operator_address: String,
    pub commission: Dec,
    pub min_self_delegation: u128,
    pub height: Height,
}

// =============================================================================
// BANK
// =============================================================================

/// The balance of one account at `height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub address: String,
    pub balance: Coins,
    pub height: Height,
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Coin;

    #[test]
    fn test_constructors_stamp_schema_version() {
        let deposit = Deposit::new(1, "like1depositor".to_string(), vec![Coin::new(10, "nanolike")], 5);
        assert_eq!(deposit.version, DEPOSIT_SCHEMA_VERSION);
        assert_eq!(deposit.version, 1);

        let vote = Vote::new(1, "like1voter".to_string(), VoteOption::No, 5);
        assert_eq!(vote.version, VOTE_SCHEMA_VERSION);
        assert_eq!(vote.height, 5);
    }
}
