//! # Bank Projector
//!
//! Transfers change balances without saying what the resulting balance is,
//! so every account touched by a transfer is re-read at the transaction
//! height.

use std::collections::BTreeSet;
use std::sync::Arc;

use shared_types::{Height, MsgMultiSend, MsgSend, Tx};
use tracing::{debug, info};

use super::store_error;
use crate::domain::{AccountBalance, AddressConverter, ProjectorError};
use crate::ports::{ChainStateAccessor, StateSink};

pub struct BankProjector {
    accessor: Arc<dyn ChainStateAccessor>,
    sink: Arc<dyn StateSink>,
    addresses: AddressConverter,
}

impl BankProjector {
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

    pub fn handle_msg_send(&self, tx: &Tx, msg: &MsgSend) -> Result<(), ProjectorError> {
        self.refresh_balances(
            tx.height,
            [msg.from_address.as_str(), msg.to_address.as_str()],
        )
    }

    pub fn handle_msg_multi_send(&self, tx: &Tx, msg: &MsgMultiSend) -> Result<(), ProjectorError> {
        let addresses = msg
            .inputs
            .iter()
            .chain(msg.outputs.iter())
            .map(|leg| leg.address.as_str());
        self.refresh_balances(tx.height, addresses)
    }

    fn refresh_balances<'a>(
        &self,
        height: Height,
        addresses: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ProjectorError> {
        let addresses: Vec<String> = addresses
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        if addresses.is_empty() {
            debug!(height, "transfer touches no accounts");
            return Ok(());
        }

        let balances = self
            .accessor
            .get_balances(&addresses, height)
            .map_err(|source| ProjectorError::BalancesQuery {
                count: addresses.len(),
                height,
                source,
            })?;
        if balances.is_empty() {
            return Err(ProjectorError::BalancesNotFound {
                count: addresses.len(),
                height,
            });
        }

        let records = balances
            .into_iter()
            .map(|balance| -> Result<AccountBalance, ProjectorError> {
                Ok(AccountBalance {
                    address: self.addresses.to_account(&balance.address)?,
                    balance: balance.balance,
                    height,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let count = records.len();

        self.sink
            .save_account_balances(records)
            .map_err(store_error("account balances"))?;

        info!(count, height, "account balances stored");
        Ok(())
    }
}
