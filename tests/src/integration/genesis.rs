//! # Genesis Validators
//!
//! Validators created by genesis transactions, then edited on chain.

#[cfg(test)]
mod tests {
    use ledger_projector::test_utils::*;
    use ledger_projector::ProjectorError;
    use shared_types::{Any, Dec, Msg, MsgEditValidator, StringEvent};

    #[test]
    fn test_gentx_validators_then_edit() {
        let harness = Harness::new();
        let dispatcher = harness.dispatcher();
        let gentxs: Vec<Msg> = (1..=3).map(|n| Msg::from(create_validator_msg(n, ""))).collect();

        let stored = dispatcher
            .staking()
            .store_validators_from_gentxs(0, &gentxs)
            .unwrap();
        assert_eq!(stored, 3);

        // Block 50: validator 2 sets a keybase identity and raises commission
        let identity = "5A1B2C3D4E5F6A7B";
        harness
            .avatars
            .insert(identity, "https://s3.amazonaws.com/keybase_processed_uploads/v2.jpg")
            .unwrap();
        let mut edited = chain_validator(2);
        edited.description.identity = identity.to_string();
        edited.commission.rate = Dec::percent(12);
        harness.chain.insert_validator(50, edited).unwrap();

        let tx = tx_with_events(50, vec![(0, vec![StringEvent::new("edit_validator", vec![])])]);
        let msg = Msg::from(MsgEditValidator {
            description: Default::default(),
            validator_address: native_operator(2),
            commission_rate: Some(Dec::percent(12)),
            min_self_delegation: None,
        });
        dispatcher.dispatch(0, &msg, &tx).unwrap();

        let operator = target_operator(2);
        let description = harness.sink.validator_description(&operator).unwrap().unwrap();
        assert_eq!(
            description.avatar_url,
            "https://s3.amazonaws.com/keybase_processed_uploads/v2.jpg"
        );
        assert_eq!(description.height, 50);

        let commission = harness.sink.validator_commission(&operator).unwrap().unwrap();
        assert_eq!(commission.commission, Dec::percent(12));

        // Identity row is untouched by the edit
        assert_eq!(harness.sink.validator(&operator).unwrap().unwrap().height, 0);
        // Other genesis validators keep their genesis commission
        assert_eq!(
            harness
                .sink
                .validator_commission(&target_operator(1))
                .unwrap()
                .unwrap()
                .commission,
            Dec::percent(10)
        );
    }

    #[test]
    fn test_gentxs_stop_at_first_failure() {
        let harness = Harness::new();
        let mut broken = create_validator_msg(2, "");
        broken.pubkey = Any::new("/cosmos.crypto.ed25519.PubKey", vec![0x0A, 0x02, 0x01, 0x02]);
        let gentxs = vec![
            Msg::from(create_validator_msg(1, "")),
            Msg::from(broken),
            Msg::from(create_validator_msg(3, "")),
        ];

        let err = harness
            .staking()
            .store_validators_from_gentxs(0, &gentxs)
            .unwrap_err();

        assert!(matches!(err, ProjectorError::PubKeyDecode { .. }));
        assert!(harness.sink.validator(&target_operator(1)).unwrap().is_some());
        assert!(harness.sink.validator(&target_operator(3)).unwrap().is_none());
    }
}
