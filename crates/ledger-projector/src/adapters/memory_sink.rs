//! # In-Memory State Sink
//!
//! `StateSink` backed by ordered maps, one per table. Every save is an
//! upsert on the record's natural key:
//!
//! | Table | Key |
//! |-------|-----|
//! | proposals | proposal id |
//! | deposits | (proposal id, depositor, height) |
//! | votes | (proposal id, voter) |
//! | validators, descriptions, commissions | operator address |
//! | account balances | (address, height) |

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use shared_types::Height;

use crate::domain::{
    AccountBalance, Deposit, Proposal, Validator, ValidatorCommission, ValidatorDescription, Vote,
};
use crate::ports::{SinkError, StateSink};

/// Store tables, used to inject write failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Table {
    Proposals,
    Deposits,
    Votes,
    Validators,
    ValidatorDescriptions,
    ValidatorCommissions,
    AccountBalances,
}

#[derive(Default)]
struct Tables {
    proposals: BTreeMap<u64, Proposal>,
    deposits: BTreeMap<(u64, String, Height), Deposit>,
    votes: BTreeMap<(u64, String), Vote>,
    validators: BTreeMap<String, Validator>,
    descriptions: BTreeMap<String, ValidatorDescription>,
    commissions: BTreeMap<String, ValidatorCommission>,
    balances: BTreeMap<(String, Height), AccountBalance>,
}

impl Tables {
    fn record_count(&self) -> usize {
        self.proposals.len()
            + self.deposits.len()
            + self.votes.len()
            + self.validators.len()
            + self.descriptions.len()
            + self.commissions.len()
            + self.balances.len()
    }
}

/// In-memory implementation of StateSink for testing and embedding.
#[derive(Default)]
pub struct InMemoryStateSink {
    tables: RwLock<Tables>,
    failing: RwLock<BTreeSet<Table>>,
}

impl InMemoryStateSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later write to `table` fail with `SinkError::WriteFailed`.
    pub fn fail_writes_to(&self, table: Table) -> Result<(), SinkError> {
        self.failing
            .write()
            .map_err(|_| SinkError::LockPoisoned)?
            .insert(table);
        Ok(())
    }

    /// Accept writes to every table again.
    pub fn clear_failures(&self) -> Result<(), SinkError> {
        self.failing
            .write()
            .map_err(|_| SinkError::LockPoisoned)?
            .clear();
        Ok(())
    }

    pub fn proposal(&self, proposal_id: u64) -> Result<Option<Proposal>, SinkError> {
        self.read(|t| t.proposals.get(&proposal_id).cloned())
    }

    pub fn proposals(&self) -> Result<Vec<Proposal>, SinkError> {
        self.read(|t| t.proposals.values().cloned().collect())
    }

    pub fn deposits(&self) -> Result<Vec<Deposit>, SinkError> {
        self.read(|t| t.deposits.values().cloned().collect())
    }

    pub fn vote(&self, proposal_id: u64, voter: &str) -> Result<Option<Vote>, SinkError> {
        self.read(|t| t.votes.get(&(proposal_id, voter.to_string())).cloned())
    }

    pub fn votes(&self) -> Result<Vec<Vote>, SinkError> {
        self.read(|t| t.votes.values().cloned().collect())
    }

    pub fn validator(&self, operator_address: &str) -> Result<Option<Validator>, SinkError> {
        self.read(|t| t.validators.get(operator_address).cloned())
    }

    pub fn validator_description(
        &self,
        operator_address: &str,
    ) -> Result<Option<ValidatorDescription>, SinkError> {
        self.read(|t| t.descriptions.get(operator_address).cloned())
    }

    pub fn validator_commission(
        &self,
        operator_address: &str,
    ) -> Result<Option<ValidatorCommission>, SinkError> {
        self.read(|t| t.commissions.get(operator_address).cloned())
    }

    pub fn account_balance(
        &self,
        address: &str,
        height: Height,
    ) -> Result<Option<AccountBalance>, SinkError> {
        self.read(|t| t.balances.get(&(address.to_string(), height)).cloned())
    }

    pub fn account_balances(&self) -> Result<Vec<AccountBalance>, SinkError> {
        self.read(|t| t.balances.values().cloned().collect())
    }

    /// Number of rows across all tables.
    pub fn record_count(&self) -> Result<usize, SinkError> {
        self.read(Tables::record_count)
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, SinkError> {
        let tables = self.tables.read().map_err(|_| SinkError::LockPoisoned)?;
        Ok(f(&tables))
    }

    fn write(&self, table: Table, f: impl FnOnce(&mut Tables)) -> Result<(), SinkError> {
        let failing = self.failing.read().map_err(|_| SinkError::LockPoisoned)?;
        if failing.contains(&table) {
            return Err(SinkError::WriteFailed(format!("{table:?} unavailable")));
        }
        drop(failing);

        let mut tables = self.tables.write().map_err(|_| SinkError::LockPoisoned)?;
        f(&mut tables);
        Ok(())
    }
}

impl StateSink for InMemoryStateSink {
    fn save_proposals(&self, proposals: Vec<Proposal>) -> Result<(), SinkError> {
        self.write(Table::Proposals, |t| {
            for proposal in proposals {
                t.proposals.insert(proposal.proposal_id, proposal);
            }
        })
    }

    fn save_deposits(&self, deposits: Vec<Deposit>) -> Result<(), SinkError> {
        self.write(Table::Deposits, |t| {
            for deposit in deposits {
                let key = (deposit.proposal_id, deposit.depositor.clone(), deposit.height);
                t.deposits.insert(key, deposit);
            }
        })
    }

    fn save_vote(&self, vote: Vote) -> Result<(), SinkError> {
        self.write(Table::Votes, |t| {
            t.votes
                .insert((vote.proposal_id, vote.voter.clone()), vote);
        })
    }

    fn save_validator_data(&self, validator: Validator) -> Result<(), SinkError> {
        self.write(Table::Validators, |t| {
            t.validators
                .insert(validator.operator_address.clone(), validator);
        })
    }

    fn save_validator_description(
        &self,
        description: ValidatorDescription,
    ) -> Result<(), SinkError> {
        self.write(Table::ValidatorDescriptions, |t| {
            t.descriptions
                .insert(description.operator_address.clone(), description);
        })
    }

    fn save_validator_commission(
        &self,
        commission: ValidatorCommission,
    ) -> Result<(), SinkError> {
        self.write(Table::ValidatorCommissions, |t| {
            t.commissions
                .insert(commission.operator_address.clone(), commission);
        })
    }

    fn save_account_balances(&self, balances: Vec<AccountBalance>) -> Result<(), SinkError> {
        self.write(Table::AccountBalances, |t| {
            for balance in balances {
                t.balances
                    .insert((balance.address.clone(), balance.height), balance);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::AssertUnwindSafe;
    use shared_types::{Coin, VoteOption};

    #[test]
    fn test_vote_upsert_keeps_latest_option() {
        let sink = InMemoryStateSink::new();
        sink.save_vote(Vote::new(1, "like1voter".to_string(), VoteOption::Yes, 10))
            .unwrap();
        sink.save_vote(Vote::new(1, "like1voter".to_string(), VoteOption::No, 12))
            .unwrap();

        assert_eq!(sink.votes().unwrap().len(), 1);
        assert_eq!(sink.vote(1, "like1voter").unwrap().unwrap().option, VoteOption::No);
    }

    #[test]
    fn test_deposits_keyed_by_height() {
        let sink = InMemoryStateSink::new();
        let amount = vec![Coin::new(5, "nanolike")];
        let deposit = |height| Deposit::new(1, "like1depositor".to_string(), amount.clone(), height);

        sink.save_deposits(vec![deposit(10)]).unwrap();
        sink.save_deposits(vec![deposit(10)]).unwrap();
        assert_eq!(sink.deposits().unwrap().len(), 1);

        sink.save_deposits(vec![deposit(11)]).unwrap();
        assert_eq!(sink.deposits().unwrap().len(), 2);
    }

    #[test]
    fn test_injected_failure_blocks_only_that_table() {
        let sink = InMemoryStateSink::new();
        sink.fail_writes_to(Table::Votes).unwrap();

        let result = sink.save_vote(Vote::new(1, "like1voter".to_string(), VoteOption::Yes, 10));
        assert!(matches!(result, Err(SinkError::WriteFailed(_))));

        sink.save_deposits(vec![Deposit::new(1, "like1depositor".to_string(), vec![], 10)])
            .unwrap();
        assert_eq!(sink.record_count().unwrap(), 1);

        sink.clear_failures().unwrap();
        sink.save_vote(Vote::new(1, "like1voter".to_string(), VoteOption::Yes, 10))
            .unwrap();
        assert_eq!(sink.record_count().unwrap(), 2);
    }

    #[test]
    fn test_poisoned_tables_fail_reads_and_writes() {
        let sink = InMemoryStateSink::new();
        let _ = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = sink.tables.write().unwrap();
            panic!("table writer panicked");
        }));

        assert_eq!(sink.record_count(), Err(SinkError::LockPoisoned));
        assert!(matches!(sink.proposal(1), Err(SinkError::LockPoisoned)));
        assert_eq!(
            sink.save_vote(Vote::new(1, "like1voter".to_string(), VoteOption::Yes, 10)),
            Err(SinkError::LockPoisoned)
        );
    }
}
