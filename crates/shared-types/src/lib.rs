//! # Shared Types Crate
//!
//! Chain wire types exchanged between the indexing host and the projector.
//!
//! ## Design Principles
//!
//! - **Native encoding**: addresses in messages and query responses are in
//!   the source chain's encoding; re-encoding is the projector's job.
//! - **Closed message set**: `Msg` enumerates every tracked kind, anything
//!   else is `Msg::Unknown`.
//! - **Exactly-one lookups**: event log queries never choose among several
//!   candidates.

pub mod entities;
pub mod errors;
pub mod messages;
pub mod tx;

pub use entities::*;
pub use errors::*;
pub use messages::*;
pub use tx::*;
