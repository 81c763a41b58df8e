//! # Core Chain Entities
//!
//! Value types shared by decoded messages and chain queries.
//!
//! ## Clusters
//!
//! - **Amounts**: `Coin`, `Dec`
//! - **Polymorphic payloads**: `Any`
//! - **Governance**: `VoteOption`, `ProposalStatus`
//! - **Staking**: `Description`, `CommissionRates`
//! - **Query responses**: `ChainProposal`, `ChainDeposit`, `ChainValidator`, `ChainBalance`

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DecimalError;

/// Block height.
pub type Height = u64;

// =============================================================================
// CLUSTER A: AMOUNTS
// =============================================================================

/// A single denomination amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A list of coins, one entry per denomination.
pub type Coins = Vec<Coin>;

/// Number of fractional digits carried by [`Dec`].
pub const DEC_PRECISION: u32 = 18;

const DEC_ONE: u128 = 10u128.pow(DEC_PRECISION);

/// Non-negative fixed point decimal with 18 fractional digits.
///
/// Parsed from and displayed as the chain's decimal strings, e.g.
/// `"0.100000000000000000"`. Commission rates use this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dec(u128);

impl Dec {
    pub const ZERO: Dec = Dec(0);
    pub const ONE: Dec = Dec(DEC_ONE);

    /// Build from the raw integer scaled by `10^18`.
    pub const fn from_atomics(atomics: u128) -> Self {
        Dec(atomics)
    }

    /// Build from a whole percentage, `Dec::percent(5) == 0.05`.
    pub const fn percent(percent: u64) -> Self {
        Dec(percent as u128 * (DEC_ONE / 100))
    }

    /// The raw integer scaled by `10^18`.
    pub const fn atomics(&self) -> u128 {
        self.0
    }
}

impl FromStr for Dec {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (int_part, frac_part) = match s.split_once('.') {
            Some((int_part, frac_part)) if !frac_part.is_empty() => (int_part, frac_part),
            Some(_) => return Err(DecimalError::Invalid(s.to_string())),
            None => (s, ""),
        };

        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !is_digits(int_part) || !is_digits(frac_part) {
            return Err(DecimalError::Invalid(s.to_string()));
        }
        if frac_part.len() > DEC_PRECISION as usize {
            return Err(DecimalError::TooPrecise {
                value: s.to_string(),
                max: DEC_PRECISION,
            });
        }

        let whole: u128 = int_part
            .parse()
            .map_err(|_| DecimalError::Overflow(s.to_string()))?;
        let fraction: u128 = if frac_part.is_empty() {
            0
        } else {
            format!("{:0<width$}", frac_part, width = DEC_PRECISION as usize)
                .parse()
                .map_err(|_| DecimalError::Overflow(s.to_string()))?
        };

        whole
            .checked_mul(DEC_ONE)
            .and_then(|scaled| scaled.checked_add(fraction))
            .map(Dec)
            .ok_or_else(|| DecimalError::Overflow(s.to_string()))
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:0width$}",
            self.0 / DEC_ONE,
            self.0 % DEC_ONE,
            width = DEC_PRECISION as usize
        )
    }
}

impl TryFrom<String> for Dec {
    type Error = DecimalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Dec> for String {
    fn from(value: Dec) -> Self {
        value.to_string()
    }
}

// =============================================================================
// CLUSTER B: POLYMORPHIC PAYLOADS
// =============================================================================

/// A protobuf message packed together with its type URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Any {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl Any {
    pub fn new(type_url: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }
}

// =============================================================================
// CLUSTER C: GOVERNANCE
// =============================================================================

/// The choice recorded by a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteOption {
    Yes,
    Abstain,
    No,
    NoWithVeto,
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Yes => "Yes",
            Self::Abstain => "Abstain",
            Self::No => "No",
            Self::NoWithVeto => "NoWithVeto",
        };
        f.write_str(name)
    }
}

/// Lifecycle status of a proposal as reported by the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    Unspecified,
    DepositPeriod,
    VotingPeriod,
    Passed,
    Rejected,
    Failed,
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unspecified => "Unspecified",
            Self::DepositPeriod => "DepositPeriod",
            Self::VotingPeriod => "VotingPeriod",
            Self::Passed => "Passed",
            Self::Rejected => "Rejected",
            Self::Failed => "Failed",
        };
        f.write_str(name)
    }
}

// =============================================================================
// CLUSTER D: STAKING
// =============================================================================

/// Free-form validator description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Description {
    pub moniker: String,
    /// Key suffix used to look the validator up on an identity service.
    pub identity: String,
    pub website: String,
    pub security_contact: String,
    pub details: String,
}

/// Commission parameters declared at validator creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommissionRates {
    pub rate: Dec,
    pub max_rate: Dec,
    pub max_change_rate: Dec,
}

// =============================================================================
// CLUSTER E: HEIGHT-PINNED QUERY RESPONSES
// =============================================================================

/// A proposal as stored on chain at some height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProposal {
    pub proposal_id: u64,
    pub content: Any,
    pub status: ProposalStatus,
    pub submit_time: DateTime<Utc>,
    pub deposit_end_time: DateTime<Utc>,
    pub total_deposit: Coins,
    pub voting_start_time: DateTime<Utc>,
    pub voting_end_time: DateTime<Utc>,
}

/// The cumulative deposit of one depositor on one proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDeposit {
    pub proposal_id: u64,
    /// Native chain encoding.
    pub depositor: String,
    pub amount: Coins,
}

/// A validator as stored on chain at some height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainValidator {
    /// Native chain encoding.
    pub operator_address: String,
    pub consensus_pubkey: Any,
    pub description: Description,
    pub commission: CommissionRates,
    pub min_self_delegation: u128,
}

/// The balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainBalance {
    /// Native chain encoding.
    pub address: String,
    pub balance: Coins,
}
