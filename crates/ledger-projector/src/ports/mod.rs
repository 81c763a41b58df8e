//! # Ports Layer
//!
//! Hexagonal architecture ports (interfaces) for the projection layer.
//!
//! - **Driving Ports (Inbound)**: `ProjectionApi`, called by the indexing host
//! - **Driven Ports (Outbound)**: `ChainStateAccessor`, `StateSink`,
//!   `AvatarResolver`, implemented by adapters

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
