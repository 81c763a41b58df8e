//! # Integration Flows
//!
//! Whole transactions and blocks driven through `MessageDispatcher` against
//! the in-memory adapters.

mod flows;
mod genesis;
