//! # Inbound Ports (Driving Ports)
//!
//! The API the indexing host drives for every message of every replayed
//! transaction.

use shared_types::{Msg, Tx};

use crate::domain::ProjectorError;

/// Entry point for message projection.
pub trait ProjectionApi {
    /// Project message `index` of `tx` into the store.
    ///
    /// ## Returns
    ///
    /// - `Ok(())`: the message was stored, or skipped because it is not
    ///   tracked or the transaction carries no event log
    /// - `Err(ProjectorError)`: the message could not be projected; the host
    ///   decides whether to retry, skip or halt
    fn handle_msg(&self, index: usize, msg: &Msg, tx: &Tx) -> Result<(), ProjectorError>;
}
