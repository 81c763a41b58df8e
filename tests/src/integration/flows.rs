//! # Transaction Flows
//!
//! A proposal followed through several blocks, transactions carrying more
//! than one message, and blocks mixing failed and successful transactions.

#[cfg(test)]
mod tests {
    use ledger_projector::test_utils::*;
    use ledger_projector::{ProjectorError, ProposalContent};
    use ledger_projector::domain::UpgradePlan;
    use shared_types::{
        Coin, Msg, MsgDeposit, MsgSubmitProposal, MsgVote, StringEvent, Tx, VoteOption,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn submit(proposer: u8, content: &ProposalContent, deposit: u128) -> Msg {
        Msg::from(MsgSubmitProposal {
            content: content.to_any(),
            initial_deposit: vec![Coin::new(deposit, "nanolike")],
            proposer: native_account(proposer),
        })
    }

    fn deposit(proposal_id: u64, depositor: u8, amount: u128) -> Msg {
        Msg::from(MsgDeposit {
            proposal_id,
            depositor: native_account(depositor),
            amount: vec![Coin::new(amount, "nanolike")],
        })
    }

    fn vote(proposal_id: u64, voter: u8, option: VoteOption) -> Msg {
        Msg::from(MsgVote {
            proposal_id,
            voter: native_account(voter),
            option,
        })
    }

    fn event(kind: &str) -> StringEvent {
        StringEvent::new(kind, vec![])
    }

    // =============================================================================
    // PROPOSAL LIFECYCLE
    // =============================================================================

    #[test]
    fn test_proposal_lifecycle_across_blocks() {
        let harness = Harness::new();
        let dispatcher = harness.dispatcher();
        let content = text_content("Lower min deposit");

        // Block 100: submission
        harness.chain.insert_proposal(100, chain_proposal(42, content.clone())).unwrap();
        let tx = tx_with_events(100, vec![(0, vec![submit_proposal_event("42")])]);
        dispatcher.dispatch(0, &submit(1, &content, 1000), &tx).unwrap();

        // Blocks 110 and 115: two deposits from the same account
        harness.chain.insert_deposits(
            110,
            42,
            vec![
                chain_deposit(42, native_account(1), 1000),
                chain_deposit(42, native_account(2), 400),
            ],
        ).unwrap();
        harness.chain.insert_deposits(
            115,
            42,
            vec![
                chain_deposit(42, native_account(1), 1000),
                chain_deposit(42, native_account(2), 900),
            ],
        ).unwrap();
        let tx = tx_with_events(110, vec![(0, vec![event("proposal_deposit")])]);
        dispatcher.dispatch(0, &deposit(42, 2, 400), &tx).unwrap();
        let tx = tx_with_events(115, vec![(0, vec![event("proposal_deposit")])]);
        dispatcher.dispatch(0, &deposit(42, 2, 500), &tx).unwrap();

        // Blocks 120 and 125: votes, one of them changed
        let tx = tx_with_events(120, vec![(0, vec![]), (1, vec![])]);
        dispatcher
            .dispatch_tx(&[vote(42, 1, VoteOption::Yes), vote(42, 2, VoteOption::No)], &tx)
            .unwrap();
        let tx = tx_with_events(125, vec![(0, vec![event("proposal_vote")])]);
        dispatcher
            .dispatch(0, &vote(42, 2, VoteOption::Abstain), &tx)
            .unwrap();

        let deposits = harness.sink.deposits().unwrap();
        assert_eq!(deposits.len(), 3);
        let latest = deposits
            .iter()
            .filter(|d| d.depositor == target_account(2))
            .max_by_key(|d| d.height)
            .unwrap();
        assert_eq!(latest.amount, vec![Coin::new(900, "nanolike")]);
        assert_eq!(latest.height, 115);

        let votes = harness.sink.votes().unwrap();
        assert_eq!(votes.len(), 2);
        assert_eq!(
            harness.sink.vote(42, &target_account(2)).unwrap().unwrap().option,
            VoteOption::Abstain
        );
        assert_eq!(
            harness.sink.vote(42, &target_account(1)).unwrap().unwrap().option,
            VoteOption::Yes
        );
    }

    #[test]
    fn test_software_upgrade_proposal() {
        let harness = Harness::new();
        let content = ProposalContent::SoftwareUpgrade {
            title: "v2".to_string(),
            description: "Upgrade to v2".to_string(),
            plan: UpgradePlan {
                name: "v2".to_string(),
                height: 500_000,
                info: "{\"binaries\":{}}".to_string(),
            },
        };
        harness.chain.insert_proposal(300, chain_proposal(9, content.clone())).unwrap();
        let tx = tx_with_events(300, vec![(0, vec![submit_proposal_event("9")])]);

        harness
            .dispatcher()
            .dispatch(0, &submit(3, &content, 10), &tx)
            .unwrap();

        let proposal = harness.sink.proposal(9).unwrap().unwrap();
        assert_eq!(proposal.proposal_route, "upgrade");
        assert_eq!(proposal.proposal_type, "SoftwareUpgrade");
        assert_eq!(proposal.content, content);
    }

    // =============================================================================
    // MULTI-MESSAGE TRANSACTIONS
    // =============================================================================

    #[test]
    fn test_submit_and_vote_in_one_tx() {
        let harness = Harness::new();
        let content = text_content("Signal");
        harness.chain.insert_proposal(200, chain_proposal(5, content.clone())).unwrap();
        let tx = tx_with_events(
            200,
            vec![
                (0, vec![submit_proposal_event("5")]),
                (1, vec![event("proposal_vote")]),
            ],
        );

        harness
            .dispatcher()
            .dispatch_tx(&[submit(1, &content, 1), vote(5, 1, VoteOption::Yes)], &tx)
            .unwrap();

        assert!(harness.sink.proposal(5).unwrap().is_some());
        assert!(harness.sink.vote(5, &target_account(1)).unwrap().is_some());
        assert_eq!(harness.chain.query_count(), 1);
    }

    #[test]
    fn test_error_names_failing_message() {
        let harness = Harness::new();
        let content = text_content("Signal");
        let tx = tx_with_events(
            200,
            vec![(0, vec![event("proposal_vote")]), (1, vec![event("message")])],
        );

        let err = harness
            .dispatcher()
            .dispatch_tx(&[vote(5, 1, VoteOption::Yes), submit(1, &content, 1)], &tx)
            .unwrap_err();

        match err {
            ProjectorError::EventLookup { index, tx_hash, .. } => {
                assert_eq!(index, 1);
                assert_eq!(tx_hash, tx.hash);
            }
            other => panic!("unexpected error: {other}"),
        }
        // the vote before the failure is kept
        assert_eq!(harness.sink.votes().unwrap().len(), 1);
    }

    // =============================================================================
    // BLOCKS
    // =============================================================================

    #[test]
    fn test_block_with_failed_tx() {
        let harness = Harness::new();
        let dispatcher = harness.dispatcher();
        let block: Vec<(Tx, Msg)> = vec![
            (
                tx_with_events(400, vec![(0, vec![event("proposal_vote")])]),
                vote(1, 1, VoteOption::Yes),
            ),
            (Tx::new("OUTOFGAS", 400, vec![]), vote(1, 2, VoteOption::No)),
            (
                tx_with_events(400, vec![(0, vec![event("proposal_vote")])]),
                vote(1, 3, VoteOption::NoWithVeto),
            ),
        ];

        for (tx, msg) in &block {
            dispatcher.dispatch(0, msg, tx).unwrap();
        }

        assert_eq!(harness.sink.votes().unwrap().len(), 2);
        assert!(harness.sink.vote(1, &target_account(2)).unwrap().is_none());
    }
}
