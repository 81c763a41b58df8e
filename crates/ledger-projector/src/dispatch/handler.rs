//! # Message Dispatcher
//!
//! Routes each decoded message to the projector operation for its kind.
//!
//! | Message | Operation |
//! |---------|-----------|
//! | `SubmitProposal` | `GovernanceProjector::handle_msg_submit_proposal` |
//! | `Deposit` | `GovernanceProjector::handle_msg_deposit` |
//! | `Vote` | `GovernanceProjector::handle_msg_vote` |
//! | `CreateValidator` | `StakingProjector::store_validator_from_msg_create_validator` |
//! | `EditValidator` | `StakingProjector::handle_msg_edit_validator` |
//! | `Send` | `BankProjector::handle_msg_send` |
//! | `MultiSend` | `BankProjector::handle_msg_multi_send` |
//! | `Unknown` | nothing |
//!
//! Transactions without an event log are skipped entirely: they failed or
//! were only partially indexed, so nothing they carry can be corroborated.

use std::sync::Arc;

use shared_types::{Msg, Tx};
use tracing::{debug, debug_span, trace};

use crate::domain::{AddressConverter, ConfigError, ProjectorConfig, ProjectorError};
use crate::ports::{AvatarResolver, ChainStateAccessor, ProjectionApi, StateSink};
use crate::projectors::{BankProjector, GovernanceProjector, StakingProjector};

pub struct MessageDispatcher {
    governance: GovernanceProjector,
    staking: StakingProjector,
    bank: BankProjector,
}

impl MessageDispatcher {
    /// Build a dispatcher over the given ports.
    ///
    /// Fails if `config` does not validate.
    pub fn new(
        config: &ProjectorConfig,
        accessor: Arc<dyn ChainStateAccessor>,
        sink: Arc<dyn StateSink>,
        avatars: Arc<dyn AvatarResolver>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let addresses = AddressConverter::new(config.prefixes.clone());

        Ok(Self {
            governance: GovernanceProjector::new(
                Arc::clone(&accessor),
                Arc::clone(&sink),
                addresses.clone(),
            ),
            staking: StakingProjector::new(
                Arc::clone(&accessor),
                Arc::clone(&sink),
                avatars,
                addresses.clone(),
            ),
            bank: BankProjector::new(accessor, sink, addresses),
        })
    }

    /// Project message `index` of `tx`.
    ///
    /// Errors are returned unchanged; retrying is up to the caller.
    pub fn dispatch(&self, index: usize, msg: &Msg, tx: &Tx) -> Result<(), ProjectorError> {
        let span = debug_span!(
            "dispatch",
            msg_index = index,
            tx_hash = %tx.hash,
            height = tx.height,
            type_url = msg.type_url()
        );
        let _enter = span.enter();

        if !tx.has_logs() {
            debug!("transaction has no event log, skipping");
            return Ok(());
        }

        match msg {
            Msg::SubmitProposal(m) => self.governance.handle_msg_submit_proposal(tx, index, m),
            Msg::Deposit(m) => self.governance.handle_msg_deposit(tx, m),
            Msg::Vote(m) => self.governance.handle_msg_vote(tx, m),
            Msg::CreateValidator(m) => self
                .staking
                .store_validator_from_msg_create_validator(tx.height, m),
            Msg::EditValidator(m) => self.staking.handle_msg_edit_validator(tx, m),
            Msg::Send(m) => self.bank.handle_msg_send(tx, m),
            Msg::MultiSend(m) => self.bank.handle_msg_multi_send(tx, m),
            Msg::Unknown { .. } => {
                trace!("untracked message kind");
                Ok(())
            }
        }
    }

    /// Project every message of `tx` in order, stopping at the first error.
    pub fn dispatch_tx(&self, msgs: &[Msg], tx: &Tx) -> Result<(), ProjectorError> {
        msgs.iter()
            .enumerate()
            .try_for_each(|(index, msg)| self.dispatch(index, msg, tx))
    }

    pub fn governance(&self) -> &GovernanceProjector {
        &self.governance
    }

    /// Also used directly for genesis validators, which arrive outside any
    /// transaction.
    pub fn staking(&self) -> &StakingProjector {
        &self.staking
    }

    pub fn bank(&self) -> &BankProjector {
        &self.bank
    }
}

impl ProjectionApi for MessageDispatcher {
    fn handle_msg(&self, index: usize, msg: &Msg, tx: &Tx) -> Result<(), ProjectorError> {
        self.dispatch(index, msg, tx)
    }
}
