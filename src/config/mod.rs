//! Configuration management
//!
//! This module holds the consensus and mining parameters of a node. Defaults
//! match the parameters every peer on the network is expected to run with.

pub mod settings;

pub use settings::{
    ChainConfig, DEFAULT_BLOCK_GENERATION_INTERVAL, DEFAULT_DIFFICULTY_ADJUSTMENT_INTERVAL,
    DEFAULT_TIMESTAMP_TOLERANCE,
};
