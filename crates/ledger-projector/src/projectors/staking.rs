//! # Staking Projector
//!
//! A validator is stored as three records: identity (`Validator`),
//! description with avatar, and commission. They are written in that order
//! and a failure stops the sequence; already written records are left for
//! the idempotent retry to overwrite.

use std::sync::Arc;

use shared_types::{Height, Msg, MsgCreateValidator, MsgEditValidator, Tx};
use tracing::{debug, info};

use super::store_error;
use crate::domain::{
    AddressConverter, ConsensusPubKey, ProjectorError, Validator, ValidatorCommission,
    ValidatorDescription,
};
use crate::ports::{AvatarResolver, ChainStateAccessor, StateSink};

pub struct StakingProjector {
    accessor: Arc<dyn ChainStateAccessor>,
    sink: Arc<dyn StateSink>,
    avatars: Arc<dyn AvatarResolver>,
    addresses: AddressConverter,
}

impl StakingProjector {
    pub fn new(
        accessor: Arc<dyn ChainStateAccessor>,
        sink: Arc<dyn StateSink>,
        avatars: Arc<dyn AvatarResolver>,
        addresses: AddressConverter,
    ) -> Self {
        Self {
            accessor,
            sink,
            avatars,
            addresses,
        }
    }

    /// Store the validator declared by `msg` as of `height`.
    pub fn store_validator_from_msg_create_validator(
        &self,
        height: Height,
        msg: &MsgCreateValidator,
    ) -> Result<(), ProjectorError> {
        let pubkey = ConsensusPubKey::decode(&msg.pubkey).map_err(|source| {
            ProjectorError::PubKeyDecode {
                operator: msg.validator_address.clone(),
                source,
            }
        })?;

        let avatar_url = self.resolve_avatar(&msg.description.identity)?;

        let consensus_address = self.addresses.consensus_from_payload(&pubkey.address())?;
        let operator_address = self
            .addresses
            .to_validator_operator(&msg.validator_address)?;
        let self_delegate_address = self.addresses.to_account(&msg.delegator_address)?;

        self.sink
            .save_validator_data(Validator {
                consensus_address: consensus_address.clone(),
                operator_address: operator_address.clone(),
                consensus_pubkey: pubkey.to_string(),
                self_delegate_address,
                max_change_rate: msg.commission.max_change_rate,
                max_rate: msg.commission.max_rate,
                height,
            })
            .map_err(store_error("validator"))?;

        self.sink
            .save_validator_description(ValidatorDescription {
                operator_address: operator_address.clone(),
                description: msg.description.clone(),
                avatar_url,
                height,
            })
            .map_err(store_error("validator description"))?;

        self.sink
            .save_validator_commission(ValidatorCommission {
                operator_address: operator_address.clone(),
                commission: msg.commission.rate,
                min_self_delegation: msg.min_self_delegation,
                height,
            })
            .map_err(store_error("validator commission"))?;

        info!(
            operator = %operator_address,
            consensus = %consensus_address,
            height,
            "validator stored"
        );
        Ok(())
    }

    /// Store every validator created by the genesis transactions.
    ///
    /// Messages other than validator creation are skipped. Stops at the first
    /// failure.
    pub fn store_validators_from_gentxs(
        &self,
        height: Height,
        msgs: &[Msg],
    ) -> Result<usize, ProjectorError> {
        let mut stored = 0;
        for msg in msgs {
            match msg {
                Msg::CreateValidator(create) => {
                    self.store_validator_from_msg_create_validator(height, create)?;
                    stored += 1;
                }
                other => debug!(type_url = other.type_url(), "skipping genesis message"),
            }
        }

        info!(count = stored, height, "genesis validators stored");
        Ok(stored)
    }

    /// Refresh description and commission of the validator edited by `msg`.
    ///
    /// Edit messages may carry "do not modify" placeholders, so the new
    /// values are read from chain state at the transaction height.
    pub fn handle_msg_edit_validator(
        &self,
        tx: &Tx,
        msg: &MsgEditValidator,
    ) -> Result<(), ProjectorError> {
        let validator = self
            .accessor
            .validator(tx.height, &msg.validator_address)
            .map_err(|source| ProjectorError::ValidatorQuery {
                operator: msg.validator_address.clone(),
                height: tx.height,
                source,
            })?;

        let avatar_url = self.resolve_avatar(&validator.description.identity)?;
        let operator_address = self
            .addresses
            .to_validator_operator(&validator.operator_address)?;

        self.sink
            .save_validator_description(ValidatorDescription {
                operator_address: operator_address.clone(),
                description: validator.description,
                avatar_url,
                height: tx.height,
            })
            .map_err(store_error("validator description"))?;

        self.sink
            .save_validator_commission(ValidatorCommission {
                operator_address: operator_address.clone(),
                commission: validator.commission.rate,
                min_self_delegation: validator.min_self_delegation,
                height: tx.height,
            })
            .map_err(store_error("validator commission"))?;

        info!(
            operator = %operator_address,
            height = tx.height,
            "validator edit stored"
        );
        Ok(())
    }

    fn resolve_avatar(&self, identity: &str) -> Result<String, ProjectorError> {
        self.avatars
            .avatar_url(identity)
            .map_err(|source| ProjectorError::AvatarLookup {
                identity: identity.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Table;
    use crate::domain::ErrorKind;
    use crate::test_utils::*;
    use shared_types::{Any, Dec, MsgVote, VoteOption};

    #[test]
    fn test_create_validator_stores_three_records() {
        let harness = Harness::new();
        let msg = create_validator_msg(5, "");

        harness
            .staking()
            .store_validator_from_msg_create_validator(200, &msg)
            .unwrap();

        let operator = target_operator(5);
        let validator = harness.sink.validator(&operator).unwrap().unwrap();
        assert!(validator.consensus_address.starts_with("likevalcons1"));
        assert!(validator.consensus_pubkey.starts_with("PubKeyEd25519{"));
        assert_eq!(validator.self_delegate_address, target_account(5));
        assert_eq!(validator.max_rate, Dec::percent(20));
        assert_eq!(validator.height, 200);

        let description = harness.sink.validator_description(&operator).unwrap().unwrap();
        assert_eq!(description.avatar_url, "");
        assert_eq!(description.description.moniker, "validator-5");

        let commission = harness.sink.validator_commission(&operator).unwrap().unwrap();
        assert_eq!(commission.commission, Dec::percent(10));
        assert_eq!(commission.min_self_delegation, 1);
    }

    #[test]
    fn test_create_validator_resolves_avatar() {
        let harness = Harness::new();
        harness
            .avatars
            .insert("0123456789ABCDEF", "https://s3.amazonaws.com/keybase/avatar.jpg")
            .unwrap();
        let msg = create_validator_msg(5, "0123456789ABCDEF");

        harness
            .staking()
            .store_validator_from_msg_create_validator(200, &msg)
            .unwrap();

        let description = harness
            .sink
            .validator_description(&target_operator(5))
            .unwrap()
            .unwrap();
        assert_eq!(
            description.avatar_url,
            "https://s3.amazonaws.com/keybase/avatar.jpg"
        );
    }

    #[test]
    fn test_unsupported_pubkey_writes_nothing() {
        let harness = Harness::new();
        let mut msg = create_validator_msg(5, "");
        msg.pubkey = Any::new("/cosmos.crypto.multisig.LegacyAminoPubKey", vec![]);

        let err = harness
            .staking()
            .store_validator_from_msg_create_validator(200, &msg)
            .unwrap_err();

        assert!(matches!(err, ProjectorError::PubKeyDecode { .. }));
        assert_eq!(harness.sink.record_count().unwrap(), 0);
        assert_eq!(harness.avatars.lookup_count(), 0);
    }

    #[test]
    fn test_failed_write_stops_later_writes() {
        let harness = Harness::new();
        harness.sink.fail_writes_to(Table::ValidatorDescriptions).unwrap();
        let msg = create_validator_msg(5, "");

        let err = harness
            .staking()
            .store_validator_from_msg_create_validator(200, &msg)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::External);
        let operator = target_operator(5);
        assert!(harness.sink.validator(&operator).unwrap().is_some());
        assert!(harness.sink.validator_description(&operator).unwrap().is_none());
        assert!(harness.sink.validator_commission(&operator).unwrap().is_none());
    }

    #[test]
    fn test_gentxs_skip_other_messages() {
        let harness = Harness::new();
        let msgs = vec![
            Msg::from(create_validator_msg(5, "")),
            Msg::from(MsgVote {
                proposal_id: 1,
                voter: native_account(1),
                option: VoteOption::Abstain,
            }),
            Msg::from(create_validator_msg(6, "")),
        ];

        let stored = harness
            .staking()
            .store_validators_from_gentxs(0, &msgs)
            .unwrap();

        assert_eq!(stored, 2);
        assert!(harness.sink.validator(&target_operator(5)).unwrap().is_some());
        assert!(harness.sink.validator(&target_operator(6)).unwrap().is_some());
        assert!(harness.sink.votes().unwrap().is_empty());
    }

    #[test]
    fn test_edit_validator_reads_chain_state() {
        let harness = Harness::new();
        let mut on_chain = chain_validator(5);
        on_chain.description.moniker = "renamed".to_string();
        on_chain.commission.rate = Dec::percent(15);
        harness.chain.insert_validator(250, on_chain).unwrap();

        let tx = tx_with_events(300, vec![(0, vec![edit_validator_event()])]);
        let msg = MsgEditValidator {
            description: Default::default(),
            validator_address: native_operator(5),
            commission_rate: None,
            min_self_delegation: None,
        };

        harness.staking().handle_msg_edit_validator(&tx, &msg).unwrap();

        let operator = target_operator(5);
        let description = harness.sink.validator_description(&operator).unwrap().unwrap();
        assert_eq!(description.description.moniker, "renamed");
        assert_eq!(description.height, 300);
        let commission = harness.sink.validator_commission(&operator).unwrap().unwrap();
        assert_eq!(commission.commission, Dec::percent(15));
        assert!(harness.sink.validator(&operator).unwrap().is_none());
    }

    #[test]
    fn test_edit_unknown_validator_is_lookup_error() {
        let harness = Harness::new();
        let tx = tx_with_events(300, vec![(0, vec![edit_validator_event()])]);
        let msg = MsgEditValidator {
            description: Default::default(),
            validator_address: native_operator(9),
            commission_rate: None,
            min_self_delegation: None,
        };

        let err = harness
            .staking()
            .handle_msg_edit_validator(&tx, &msg)
            .unwrap_err();

        assert!(matches!(err, ProjectorError::ValidatorQuery { .. }));
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(harness.sink.record_count().unwrap(), 0);
    }
}
