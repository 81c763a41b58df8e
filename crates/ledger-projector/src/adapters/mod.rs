//! # Adapters Layer
//!
//! Implementations of the outbound ports.
//!
//! - `InMemoryChainState`: height-pinned snapshots for tests and replays
//! - `InMemoryStateSink`: upserting tables with failure injection
//! - `KeybaseAvatarResolver`: the keybase user lookup API
//! - `StaticAvatarResolver`: fixed identity table

pub mod keybase;
pub mod memory_chain;
pub mod memory_sink;
pub mod static_avatar;

pub use keybase::KeybaseAvatarResolver;
pub use memory_chain::InMemoryChainState;
pub use memory_sink::{InMemoryStateSink, Table};
pub use static_avatar::StaticAvatarResolver;
