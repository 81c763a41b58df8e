//! # Governance Projector
//!
//! Proposals, deposits and votes.
//!
//! - Submission: the proposal id only exists in the `submit_proposal` event,
//!   and status and timestamps only exist in chain state, so both are
//!   consulted before anything is written.
//! - Deposit: the message carries the increment; the stored amount is the
//!   depositor's cumulative total as reported by chain state.
//! - Vote: self-sufficient, built from the message alone.

use std::sync::Arc;

use shared_types::{MsgDeposit, MsgSubmitProposal, MsgVote, Tx};
use tracing::info;

use super::store_error;
use crate::domain::{AddressConverter, Deposit, Proposal, ProjectorError, ProposalContent, Vote};
use crate::ports::{ChainStateAccessor, StateSink};

/// Event emitted by the gov module on proposal submission.
pub const EVENT_SUBMIT_PROPOSAL: &str = "submit_proposal";

/// Attribute of [`EVENT_SUBMIT_PROPOSAL`] holding the assigned id.
pub const ATTRIBUTE_PROPOSAL_ID: &str = "proposal_id";

pub struct GovernanceProjector {
    accessor: Arc<dyn ChainStateAccessor>,
    sink: Arc<dyn StateSink>,
    addresses: AddressConverter,
}

impl GovernanceProjector {
    pub fn new(
        accessor: Arc<dyn ChainStateAccessor>,
        sink: Arc<dyn StateSink>,
        addresses: AddressConverter,
    ) -> Self {
        Self {
            accessor,
            sink,
            addresses,
        }
    }

    /// Store the proposal created by message `index` of `tx`, together with
    /// the proposer's initial deposit.
    pub fn handle_msg_submit_proposal(
        &self,
        tx: &Tx,
        index: usize,
        msg: &MsgSubmitProposal,
    ) -> Result<(), ProjectorError> {
        let proposal_id = Self::proposal_id_from_events(tx, index)?;

        let chain_proposal = self
            .accessor
            .proposal(tx.height, proposal_id)
            .map_err(|source| ProjectorError::ProposalQuery {
                proposal_id,
                height: tx.height,
                source,
            })?;
        if chain_proposal.proposal_id != proposal_id {
            return Err(ProjectorError::ProposalMismatch {
                requested: proposal_id,
                returned: chain_proposal.proposal_id,
                height: tx.height,
            });
        }

        let content = ProposalContent::decode(&chain_proposal.content)
            .map_err(|source| ProjectorError::ContentDecode {
                proposal_id,
                source,
            })?
            .map_addresses(|recipient| self.addresses.to_account(recipient))?;

        let proposer = self.addresses.to_account(&msg.proposer)?;

        let proposal = Proposal {
            proposal_id,
            proposal_route: content.route().to_string(),
            proposal_type: content.proposal_type().to_string(),
            content,
            status: chain_proposal.status.to_string(),
            submit_time: chain_proposal.submit_time,
            deposit_end_time: chain_proposal.deposit_end_time,
            voting_start_time: chain_proposal.voting_start_time,
            voting_end_time: chain_proposal.voting_end_time,
            proposer: proposer.clone(),
        };
        let initial_deposit = Deposit::new(
            proposal_id,
            proposer,
            msg.initial_deposit.clone(),
            tx.height,
        );

        self.sink
            .save_proposals(vec![proposal])
            .map_err(store_error("proposal"))?;
        self.sink
            .save_deposits(vec![initial_deposit])
            .map_err(store_error("initial deposit"))?;

        info!(
            proposal_id,
            height = tx.height,
            tx_hash = %tx.hash,
            "proposal submitted"
        );
        Ok(())
    }

    /// Store the depositor's cumulative deposit after `msg`.
    pub fn handle_msg_deposit(&self, tx: &Tx, msg: &MsgDeposit) -> Result<(), ProjectorError> {
        let depositor = self.addresses.to_account(&msg.depositor)?;

        let deposits = self
            .accessor
            .proposal_deposits(tx.height, msg.proposal_id)
            .map_err(|source| ProjectorError::DepositsQuery {
                proposal_id: msg.proposal_id,
                height: tx.height,
                source,
            })?;

        // Chain state reports native addresses, so match before re-encoding.
        let amount = deposits
            .into_iter()
            .find(|deposit| {
                deposit.proposal_id == msg.proposal_id && deposit.depositor == msg.depositor
            })
            .map(|deposit| deposit.amount)
            .ok_or_else(|| ProjectorError::DepositNotFound {
                proposal_id: msg.proposal_id,
                depositor: msg.depositor.clone(),
                height: tx.height,
            })?;

        let deposit = Deposit::new(msg.proposal_id, depositor, amount, tx.height);
        self.sink
            .save_deposits(vec![deposit])
            .map_err(store_error("deposit"))?;

        info!(
            proposal_id = msg.proposal_id,
            depositor = %msg.depositor,
            height = tx.height,
            "proposal deposit stored"
        );
        Ok(())
    }

    pub fn handle_msg_vote(&self, tx: &Tx, msg: &MsgVote) -> Result<(), ProjectorError> {
        let voter = self.addresses.to_account(&msg.voter)?;

        let vote = Vote::new(msg.proposal_id, voter, msg.option, tx.height);
        self.sink.save_vote(vote).map_err(store_error("vote"))?;

        info!(
            proposal_id = msg.proposal_id,
            voter = %msg.voter,
            option = %msg.option,
            height = tx.height,
            "proposal vote stored"
        );
        Ok(())
    }

    fn proposal_id_from_events(tx: &Tx, index: usize) -> Result<u64, ProjectorError> {
        let event = tx
            .find_event_by_type(index, EVENT_SUBMIT_PROPOSAL)
            .map_err(|source| ProjectorError::EventLookup {
                tx_hash: tx.hash.clone(),
                index,
                event_type: EVENT_SUBMIT_PROPOSAL,
                source,
            })?;

        let raw = event
            .find_attribute_by_key(ATTRIBUTE_PROPOSAL_ID)
            .map_err(|source| ProjectorError::AttributeLookup {
                event_type: EVENT_SUBMIT_PROPOSAL,
                key: ATTRIBUTE_PROPOSAL_ID,
                source,
            })?;

        raw.parse().map_err(|source| ProjectorError::InvalidProposalId {
            raw: raw.to_string(),
            source,
        })
    }
}
