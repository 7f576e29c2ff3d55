//! Core blockchain functionality
//!
//! This module contains the consensus components: blocks and their hash,
//! proof-of-work mining, difficulty retargeting, validation, and the chain
//! manager that owns the canonical chain.

pub mod block;
pub mod blockchain;
pub mod broadcast;
pub mod difficulty;
pub mod proof_of_work;
pub mod validation;

pub use block::{calculate_hash, decode_chain, hash_matches_difficulty, Block, HASH_BITS};
pub use blockchain::Blockchain;
pub use broadcast::{BroadcastSink, NoopBroadcast};
pub use difficulty::DifficultyAdjustment;
pub use proof_of_work::{find_block, ProofOfWork};
pub use validation::{is_valid_block_structure, ChainValidator};
