//! # Domain Projectors
//!
//! One projector per chain module. Each turns a decoded message plus its
//! transaction context into fully populated records:
//!
//! - `governance`: proposals, deposits, votes
//! - `staking`: validators, their descriptions and commissions
//! - `bank`: account balances touched by transfers
//!
//! Projectors hold no state between calls. Every address goes through the
//! shared [`AddressConverter`](crate::domain::AddressConverter) before a
//! record is built, and every failure aborts the operation before any later
//! write.

mod bank;
mod governance;
mod staking;

pub use bank::BankProjector;
pub use governance::{GovernanceProjector, ATTRIBUTE_PROPOSAL_ID, EVENT_SUBMIT_PROPOSAL};
pub use staking::StakingProjector;

use crate::domain::ProjectorError;
use crate::ports::SinkError;

/// Wraps a sink failure with the entity being written.
fn store_error(entity: &'static str) -> impl FnOnce(SinkError) -> ProjectorError {
    move |source| ProjectorError::Store { entity, source }
}
