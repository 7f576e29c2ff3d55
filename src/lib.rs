//! # Naive PoW Chain - consensus core of a minimal proof-of-work ledger
//!
//! Block construction, hash-based mining, difficulty retargeting, and the
//! longest-valid-chain replacement rule. Peer transport, control surfaces and
//! persistence live outside this crate; they talk to it through
//! [`Blockchain`] and receive new tips through a [`BroadcastSink`].
//!
//! ## Layout
//! - `core/`: blocks, mining, difficulty, validation, the chain manager
//! - `config/`: consensus and mining parameters
//! - `error/`: error type and validation reason codes
//! - `utils/`: digest, clock and JSON helpers
//!
//! ## Where to start
//! 1. `core/blockchain.rs` for the operations exposed to the network layer
//! 2. `core/validation.rs` for what makes a block or chain acceptable
//! 3. `core/difficulty.rs` for the retarget rule

pub mod config;
pub mod core;
pub mod error;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use config::ChainConfig;
pub use core::{
    calculate_hash, decode_chain, find_block, hash_matches_difficulty, is_valid_block_structure,
    Block, Blockchain, BroadcastSink, ChainValidator, DifficultyAdjustment, NoopBroadcast,
    ProofOfWork,
};
pub use error::{BlockchainError, Result, ValidationCategory, ValidationError};
