//! # Domain Layer
//!
//! Records written to the store, the address codec, and decoding of the
//! polymorphic payloads carried by messages and query responses.
//!
//! No I/O happens here. Chain state, persistence and the identity service
//! are reached through the traits in the `ports` module.

pub mod address;
pub mod config;
pub mod content;
pub mod entities;
pub mod errors;
pub mod pubkey;

pub use address::AddressConverter;
pub use config::*;
pub use content::{ParamChange, ProposalContent, UpgradePlan};
pub use entities::*;
pub use errors::*;
pub use pubkey::ConsensusPubKey;
