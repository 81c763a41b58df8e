//! # In-Memory Chain State
//!
//! `ChainStateAccessor` answering from recorded snapshots. Each record is
//! stored at the height it was observed; a query at height `h` sees the
//! latest snapshot at or before `h`, the same way a node answers a
//! height-pinned query.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use shared_types::{ChainBalance, ChainDeposit, ChainProposal, ChainValidator, Coin, Coins, Height};

use crate::ports::{AccessorError, ChainStateAccessor};

type History<V> = BTreeMap<Height, V>;

#[derive(Default)]
struct Snapshots {
    proposals: BTreeMap<u64, History<ChainProposal>>,
    deposits: BTreeMap<u64, History<Vec<ChainDeposit>>>,
    validators: BTreeMap<String, History<ChainValidator>>,
    balances: BTreeMap<String, History<Coins>>,
    supply: BTreeMap<String, History<Coin>>,
}

fn nearest<V: Clone>(history: Option<&History<V>>, height: Height) -> Option<V> {
    history?
        .range(..=height)
        .next_back()
        .map(|(_, value)| value.clone())
}

fn poisoned<E>(_: E) -> AccessorError {
    AccessorError::Unavailable("lock poisoned".to_string())
}

/// In-memory implementation of ChainStateAccessor for testing.
#[derive(Default)]
pub struct InMemoryChainState {
    snapshots: RwLock<Snapshots>,
    unavailable: RwLock<Option<String>>,
    queries: AtomicUsize,
}

impl InMemoryChainState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_proposal(
        &self,
        height: Height,
        proposal: ChainProposal,
    ) -> Result<(), AccessorError> {
        self.snapshots
            .write()
            .map_err(poisoned)?
            .proposals
            .entry(proposal.proposal_id)
            .or_default()
            .insert(height, proposal);
        Ok(())
    }

    /// Record the full deposit list of a proposal as of `height`.
    pub fn insert_deposits(
        &self,
        height: Height,
        proposal_id: u64,
        deposits: Vec<ChainDeposit>,
    ) -> Result<(), AccessorError> {
        self.snapshots
            .write()
            .map_err(poisoned)?
            .deposits
            .entry(proposal_id)
            .or_default()
            .insert(height, deposits);
        Ok(())
    }

    pub fn insert_validator(
        &self,
        height: Height,
        validator: ChainValidator,
    ) -> Result<(), AccessorError> {
        self.snapshots
            .write()
            .map_err(poisoned)?
            .validators
            .entry(validator.operator_address.clone())
            .or_default()
            .insert(height, validator);
        Ok(())
    }

    pub fn insert_balance(&self, height: Height, balance: ChainBalance) -> Result<(), AccessorError> {
        self.snapshots
            .write()
            .map_err(poisoned)?
            .balances
            .entry(balance.address)
            .or_default()
            .insert(height, balance.balance);
        Ok(())
    }

    pub fn insert_supply(&self, height: Height, supply: Coin) -> Result<(), AccessorError> {
        self.snapshots
            .write()
            .map_err(poisoned)?
            .supply
            .entry(supply.denom.clone())
            .or_default()
            .insert(height, supply);
        Ok(())
    }

    /// Fail every later query with `AccessorError::Unavailable(reason)`.
    pub fn set_unavailable(&self, reason: impl Into<String>) -> Result<(), AccessorError> {
        *self.unavailable.write().map_err(poisoned)? = Some(reason.into());
        Ok(())
    }

    pub fn set_available(&self) -> Result<(), AccessorError> {
        *self.unavailable.write().map_err(poisoned)? = None;
        Ok(())
    }

    /// Number of queries served so far, failed ones included.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn query<T>(&self, f: impl FnOnce(&Snapshots) -> Result<T, AccessorError>) -> Result<T, AccessorError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let unavailable = self
            .unavailable
            .read()
            .map_err(poisoned)?;
        if let Some(reason) = unavailable.as_ref() {
            return Err(AccessorError::Unavailable(reason.clone()));
        }

        let snapshots = self
            .snapshots
            .read()
            .map_err(poisoned)?;
        f(&snapshots)
    }
}

impl ChainStateAccessor for InMemoryChainState {
    fn get_balances(
        &self,
        addresses: &[String],
        height: Height,
    ) -> Result<Vec<ChainBalance>, AccessorError> {
        self.query(|s| {
            Ok(addresses
                .iter()
                .filter_map(|address| {
                    nearest(s.balances.get(address), height).map(|balance| ChainBalance {
                        address: address.clone(),
                        balance,
                    })
                })
                .collect())
        })
    }

    fn get_supply(&self, height: Height, denom: &str) -> Result<Coin, AccessorError> {
        self.query(|s| {
            nearest(s.supply.get(denom), height).ok_or_else(|| AccessorError::NotFound {
                what: format!("supply of {denom}"),
                height,
            })
        })
    }

    fn get_account_balance(&self, address: &str, height: Height) -> Result<Coins, AccessorError> {
        self.query(|s| {
            nearest(s.balances.get(address), height).ok_or_else(|| AccessorError::NotFound {
                what: format!("balance of {address}"),
                height,
            })
        })
    }

    fn proposal(&self, height: Height, proposal_id: u64) -> Result<ChainProposal, AccessorError> {
        self.query(|s| {
            nearest(s.proposals.get(&proposal_id), height).ok_or_else(|| {
                AccessorError::NotFound {
                    what: format!("proposal {proposal_id}"),
                    height,
                }
            })
        })
    }

    fn proposal_deposits(
        &self,
        height: Height,
        proposal_id: u64,
    ) -> Result<Vec<ChainDeposit>, AccessorError> {
        self.query(|s| Ok(nearest(s.deposits.get(&proposal_id), height).unwrap_or_default()))
    }

    fn validator(
        &self,
        height: Height,
        operator_address: &str,
    ) -> Result<ChainValidator, AccessorError> {
        self.query(|s| {
            nearest(s.validators.get(operator_address), height).ok_or_else(|| {
                AccessorError::NotFound {
                    what: format!("validator {operator_address}"),
                    height,
                }
            })
        })
    }
}
