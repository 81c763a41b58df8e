//! Test fixtures shared by unit tests, integration tests and benchmarks.
//!
//! Addresses are derived from a single byte so that the native form
//! (`cosmos...`) and the expected target form (`like...`) of the same account
//! can be built independently.
//!
//! ```rust
//! use ledger_projector::test_utils::{native_account, target_account};
//! use ledger_projector::domain::address::convert;
//!
//! assert_eq!(convert("like", &native_account(1)).unwrap(), target_account(1));
//! ```

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use shared_types::{
    Attribute, ChainDeposit, ChainProposal, ChainValidator, Coin, CommissionRates, Dec,
    Description, Height, MessageLog, MsgCreateValidator, ProposalStatus, StringEvent, Tx,
};

use crate::adapters::{InMemoryChainState, InMemoryStateSink, StaticAvatarResolver};
use crate::dispatch::MessageDispatcher;
use crate::domain::address::encode;
use crate::domain::{AddressConverter, ConsensusPubKey, ProjectorConfig, ProposalContent};
use crate::projectors::{
    BankProjector, GovernanceProjector, StakingProjector, ATTRIBUTE_PROPOSAL_ID,
    EVENT_SUBMIT_PROPOSAL,
};

pub const NATIVE_ACCOUNT_PREFIX: &str = "cosmos";
pub const NATIVE_OPERATOR_PREFIX: &str = "cosmosvaloper";

fn address(prefix: &str, n: u8) -> String {
    match encode(prefix, &[n; 20]) {
        Ok(address) => address,
        Err(e) => panic!("fixture prefix {prefix:?} is invalid: {e}"),
    }
}

pub fn native_account(n: u8) -> String {
    address(NATIVE_ACCOUNT_PREFIX, n)
}

pub fn target_account(n: u8) -> String {
    address("like", n)
}

pub fn native_operator(n: u8) -> String {
    address(NATIVE_OPERATOR_PREFIX, n)
}

pub fn target_operator(n: u8) -> String {
    address("likevaloper", n)
}

/// A transaction whose message logs are given as `(msg_index, events)`.
pub fn tx_with_events(height: Height, logs: Vec<(usize, Vec<StringEvent>)>) -> Tx {
    let logs = logs
        .into_iter()
        .map(|(msg_index, events)| MessageLog { msg_index, events })
        .collect();
    Tx::new(format!("TX{height:08}"), height, logs)
}

pub fn submit_proposal_event(proposal_id: &str) -> StringEvent {
    StringEvent::new(
        EVENT_SUBMIT_PROPOSAL,
        vec![
            Attribute::new(ATTRIBUTE_PROPOSAL_ID, proposal_id),
            Attribute::new("proposal_type", "Text"),
        ],
    )
}

pub fn transfer_event() -> StringEvent {
    StringEvent::new("transfer", vec![Attribute::new("amount", "1nanolike")])
}

pub fn edit_validator_event() -> StringEvent {
    StringEvent::new("edit_validator", vec![])
}

pub fn text_content(title: &str) -> ProposalContent {
    ProposalContent::Text {
        title: title.to_string(),
        description: format!("{title} description"),
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    match Utc.timestamp_opt(secs, 0).single() {
        Some(time) => time,
        None => panic!("fixture timestamp {secs} out of range"),
    }
}

/// A proposal in its voting period with fixed timestamps.
pub fn chain_proposal(proposal_id: u64, content: ProposalContent) -> ChainProposal {
    ChainProposal {
        proposal_id,
        content: content.to_any(),
        status: ProposalStatus::VotingPeriod,
        submit_time: at(1_600_000_000),
        deposit_end_time: at(1_601_209_600),
        total_deposit: vec![Coin::new(1000, "nanolike")],
        voting_start_time: at(1_600_000_000),
        voting_end_time: at(1_601_209_600),
    }
}

pub fn chain_deposit(proposal_id: u64, depositor: String, amount: u128) -> ChainDeposit {
    ChainDeposit {
        proposal_id,
        depositor,
        amount: vec![Coin::new(amount, "nanolike")],
    }
}

pub fn commission() -> CommissionRates {
    CommissionRates {
        rate: Dec::percent(10),
        max_rate: Dec::percent(20),
        max_change_rate: Dec::percent(1),
    }
}

pub fn description(n: u8, identity: &str) -> Description {
    Description {
        moniker: format!("validator-{n}"),
        identity: identity.to_string(),
        ..Description::default()
    }
}

/// Validator `n` with ed25519 key `[n; 32]`.
pub fn create_validator_msg(n: u8, identity: &str) -> MsgCreateValidator {
    MsgCreateValidator {
        description: description(n, identity),
        commission: commission(),
        min_self_delegation: 1,
        delegator_address: native_account(n),
        validator_address: native_operator(n),
        pubkey: ConsensusPubKey::Ed25519([n; 32]).to_any(),
        value: Coin::new(1_000_000, "nanolike"),
    }
}

pub fn chain_validator(n: u8) -> ChainValidator {
    ChainValidator {
        operator_address: native_operator(n),
        consensus_pubkey: ConsensusPubKey::Ed25519([n; 32]).to_any(),
        description: description(n, ""),
        commission: commission(),
        min_self_delegation: 1,
    }
}

/// In-memory ports wired to projectors under the default target prefixes.
pub struct Harness {
    pub config: ProjectorConfig,
    pub chain: Arc<InMemoryChainState>,
    pub sink: Arc<InMemoryStateSink>,
    pub avatars: Arc<StaticAvatarResolver>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            config: ProjectorConfig::default(),
            chain: Arc::new(InMemoryChainState::new()),
            sink: Arc::new(InMemoryStateSink::new()),
            avatars: Arc::new(StaticAvatarResolver::new()),
        }
    }

    pub fn addresses(&self) -> AddressConverter {
        AddressConverter::new(self.config.prefixes.clone())
    }

    pub fn governance(&self) -> GovernanceProjector {
        GovernanceProjector::new(self.chain.clone(), self.sink.clone(), self.addresses())
    }

    pub fn staking(&self) -> StakingProjector {
        StakingProjector::new(
            self.chain.clone(),
            self.sink.clone(),
            self.avatars.clone(),
            self.addresses(),
        )
    }

    pub fn bank(&self) -> BankProjector {
        BankProjector::new(self.chain.clone(), self.sink.clone(), self.addresses())
    }

    pub fn dispatcher(&self) -> MessageDispatcher {
        match MessageDispatcher::new(
            &self.config,
            self.chain.clone(),
            self.sink.clone(),
            self.avatars.clone(),
        ) {
            Ok(dispatcher) => dispatcher,
            Err(e) => panic!("harness config is invalid: {e}"),
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
