//! Utility functions and helpers
//!
//! This module contains the digest and clock helpers used by the consensus
//! code, and the JSON codec used for the wire representation of blocks.

pub mod crypto;
pub mod serialization;

pub use crypto::{current_timestamp, hex_encode, leading_zero_bits, sha256_digest, sha256_hex};

pub use serialization::{from_json, from_json_value, to_json};
