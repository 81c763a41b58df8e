//! # Ledger Projector
//!
//! Projects replayed chain messages into store rows. For every message of
//! every replayed transaction the indexing host calls
//! [`MessageDispatcher::dispatch`]; the dispatcher routes the message to the
//! projector for its module, which cross-references the event log and
//! height-pinned chain state, re-encodes every address to the target
//! network, and upserts the resulting records.
//!
//! ```text
//! Msg + Tx ──→ MessageDispatcher ──→ {Governance, Staking, Bank}Projector
//!                                          │           │            │
//!                                   AddressConverter  ChainState   AvatarResolver
//!                                          │
//!                                          ↓
//!                                      StateSink (idempotent upserts)
//! ```
//!
//! ## Guarantees
//!
//! | Guarantee | Enforcement |
//! |-----------|-------------|
//! | Target encoding | every address field goes through `AddressConverter` |
//! | No speculative records | records are built only after event or query corroboration |
//! | Replay safety | no wall clock or randomness; the sink upserts on natural keys |
//! | Failed transactions skipped | `dispatch` is a no-op for an empty event log |
//!
//! ## Hexagonal Architecture
//!
//! - **Domain Layer** (`domain/`): records, address codec, `Any` decoding,
//!   config, errors
//! - **Ports Layer** (`ports/`): `ProjectionApi` inbound; `ChainStateAccessor`,
//!   `StateSink`, `AvatarResolver` outbound
//! - **Projectors** (`projectors/`): governance, staking, bank
//! - **Dispatch Layer** (`dispatch/`): routing by message kind
//! - **Adapters Layer** (`adapters/`): in-memory chain state and sink,
//!   keybase avatar lookup
//!
//! Processing is synchronous and stateless between calls. Retries, batching
//! and parallelism across transactions belong to the host.

pub mod adapters;
pub mod dispatch;
pub mod domain;
pub mod ports;
pub mod projectors;
pub mod telemetry;
pub mod test_utils;

// Re-export main types for convenience
pub use domain::{
    AccountBalance, AddressConverter, AddressError, AddressPrefixes, AvatarConfig, ConfigError,
    ConsensusPubKey, DecodeError, Deposit, ErrorKind, LoggingConfig, ProjectorConfig,
    ProjectorError, Proposal, ProposalContent, Validator, ValidatorCommission,
    ValidatorDescription, Vote, DEPOSIT_SCHEMA_VERSION, VOTE_SCHEMA_VERSION,
};

pub use ports::{
    AccessorError, AvatarError, AvatarResolver, ChainStateAccessor, ProjectionApi, SinkError,
    StateSink,
};

pub use projectors::{BankProjector, GovernanceProjector, StakingProjector};

pub use dispatch::MessageDispatcher;

pub use adapters::{InMemoryChainState, InMemoryStateSink, KeybaseAvatarResolver, StaticAvatarResolver};

pub use telemetry::{init_logging, TelemetryError};
