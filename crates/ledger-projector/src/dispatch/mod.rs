//! # Dispatch Layer
//!
//! Entry point driven by the indexing host: one call per message of every
//! replayed transaction.

pub mod handler;

pub use handler::MessageDispatcher;
