//! # Ledger Projector Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/   # Multi-message flows through the dispatcher
//! │   ├── flows.rs       # Proposal lifecycle, blocks with failed txs
//! │   └── genesis.rs     # Genesis validators, later edits
//! └── benches/           # criterion benchmarks
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p projector-tests
//! cargo bench -p projector-tests
//! ```

pub mod integration;
