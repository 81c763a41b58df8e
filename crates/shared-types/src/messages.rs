//! # Decoded Messages
//!
//! The message kinds the projector understands, decoded upstream from raw
//! transactions. Addresses are in the chain's native encoding.
//!
//! `Msg` is a closed set: every tracked kind is a variant, anything else
//! arrives as `Msg::Unknown` carrying only its type URL.

use serde::{Deserialize, Serialize};

use crate::entities::*;

/// Common capability of every decoded message kind.
pub trait MessageKind {
    /// Protobuf type URL identifying the message kind.
    const TYPE_URL: &'static str;
}

// =============================================================================
// GOVERNANCE
// =============================================================================

/// Submits a new proposal with an initial deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitProposal {
    pub content: Any,
    pub initial_deposit: Coins,
    pub proposer: String,
}

impl MessageKind for MsgSubmitProposal {
    const TYPE_URL: &'static str = "/cosmos.gov.v1beta1.MsgSubmitProposal";
}

/// Adds funds to a proposal's deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeposit {
    pub proposal_id: u64,
    pub depositor: String,
    /// Incremental amount of this message only.
    pub amount: Coins,
}

impl MessageKind for MsgDeposit {
    const TYPE_URL: &'static str = "/cosmos.gov.v1beta1.MsgDeposit";
}

/// Casts a vote on a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVote {
    pub proposal_id: u64,
    pub voter: String,
    pub option: VoteOption,
}

impl MessageKind for MsgVote {
    const TYPE_URL: &'static str = "/cosmos.gov.v1beta1.MsgVote";
}

// =============================================================================
// STAKING
// =============================================================================

/// Creates a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateValidator {
    pub description: Description,
    pub commission: CommissionRates,
    pub min_self_delegation: u128,
    pub delegator_address: String,
    pub validator_address: String,
    /// Consensus public key, packed.
    pub pubkey: Any,
    pub value: Coin,
}

impl MessageKind for MsgCreateValidator {
    const TYPE_URL: &'static str = "/cosmos.staking.v1beta1.MsgCreateValidator";
}

/// Edits a validator. Description fields may hold the chain's
/// "do not modify" placeholder, so the message alone is not the new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgEditValidator {
    pub description: Description,
    pub validator_address: String,
    pub commission_rate: Option<Dec>,
    pub min_self_delegation: Option<u128>,
}

impl MessageKind for MsgEditValidator {
    const TYPE_URL: &'static str = "/cosmos.staking.v1beta1.MsgEditValidator";
}

// =============================================================================
// BANK
// =============================================================================

/// Transfers coins between two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: Coins,
}

impl MessageKind for MsgSend {
    const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgSend";
}

/// One side of a multi-send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSendLeg {
    pub address: String,
    pub coins: Coins,
}

/// Transfers coins from several inputs to several outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgMultiSend {
    pub inputs: Vec<MultiSendLeg>,
    pub outputs: Vec<MultiSendLeg>,
}

impl MessageKind for MsgMultiSend {
    const TYPE_URL: &'static str = "/cosmos.bank.v1beta1.MsgMultiSend";
}

// =============================================================================
// CLOSED MESSAGE SET
// =============================================================================

/// A decoded message of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    SubmitProposal(MsgSubmitProposal),
    Deposit(MsgDeposit),
    Vote(MsgVote),
    CreateValidator(MsgCreateValidator),
    EditValidator(MsgEditValidator),
    Send(MsgSend),
    MultiSend(MsgMultiSend),
    /// A kind this layer does not track.
    Unknown { type_url: String },
}

impl Msg {
    /// Type URL of the wrapped message.
    pub fn type_url(&self) -> &str {
        match self {
            Self::SubmitProposal(_) => MsgSubmitProposal::TYPE_URL,
            Self::Deposit(_) => MsgDeposit::TYPE_URL,
            Self::Vote(_) => MsgVote::TYPE_URL,
            Self::CreateValidator(_) => MsgCreateValidator::TYPE_URL,
            Self::EditValidator(_) => MsgEditValidator::TYPE_URL,
            Self::Send(_) => MsgSend::TYPE_URL,
            Self::MultiSend(_) => MsgMultiSend::TYPE_URL,
            Self::Unknown { type_url } => type_url,
        }
    }
}

macro_rules! impl_from_msg {
    ($($kind:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$kind> for Msg {
                fn from(msg: $kind) -> Self {
                    Msg::$variant(msg)
                }
            }
        )*
    };
}

impl_from_msg! {
    MsgSubmitProposal => SubmitProposal,
    MsgDeposit => Deposit,
    MsgVote => Vote,
    MsgCreateValidator => CreateValidator,
    MsgEditValidator => EditValidator,
    MsgSend => Send,
    MsgMultiSend => MultiSend,
}
