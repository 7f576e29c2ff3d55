use crate::core::validation::is_valid_block_structure;
use crate::error::{Result, ValidationError};
use crate::utils::{from_json, from_json_value, leading_zero_bits, sha256_hex, to_json};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bit width of the block digest
pub const HASH_BITS: u32 = 256;

pub const GENESIS_TIMESTAMP: i64 = 1_465_154_705;
pub const GENESIS_DATA: &str = "genesis";

static GENESIS_BLOCK: Lazy<Block> = Lazy::new(|| {
    let hash = calculate_hash(0, "", GENESIS_TIMESTAMP, GENESIS_DATA, 0, 0);
    Block::new(0, hash, String::new(), GENESIS_TIMESTAMP, GENESIS_DATA.to_string(), 0, 0)
});

/// Digest over a block's fields.
///
/// The preimage is the fields concatenated in protocol order with no
/// separator; every node must build it identically.
pub fn calculate_hash(
    index: u64,
    previous_hash: &str,
    timestamp: i64,
    data: &str,
    difficulty: u32,
    nonce: u64,
) -> String {
    let preimage = format!("{index}{previous_hash}{timestamp}{data}{difficulty}{nonce}");
    sha256_hex(preimage.as_bytes())
}

/// Whether `hash` starts with at least `difficulty` zero bits
pub fn hash_matches_difficulty(hash: &str, difficulty: u32) -> bool {
    match leading_zero_bits(hash) {
        Some(zeros) => zeros >= difficulty,
        None => false,
    }
}

// Field order here is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    index: u64,
    hash: String,
    previous_hash: String,
    timestamp: i64,
    data: String,
    difficulty: u32,
    nonce: u64,
}

impl Block {
    /// Plain value construction; nothing is checked here.
    pub fn new(
        index: u64,
        hash: String,
        previous_hash: String,
        timestamp: i64,
        data: String,
        difficulty: u32,
        nonce: u64,
    ) -> Block {
        Block {
            index,
            hash,
            previous_hash,
            timestamp,
            data,
            difficulty,
            nonce,
        }
    }

    /// The fixed first block every node agrees on
    pub fn genesis() -> &'static Block {
        &GENESIS_BLOCK
    }

    pub fn is_genesis(&self) -> bool {
        self == Self::genesis()
    }

    /// Recompute the hash from this block's own fields
    pub fn calculate_hash(&self) -> String {
        calculate_hash(
            self.index,
            &self.previous_hash,
            self.timestamp,
            &self.data,
            self.difficulty,
            self.nonce,
        )
    }

    pub fn has_valid_proof_of_work(&self) -> bool {
        hash_matches_difficulty(&self.hash, self.difficulty)
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_hash(&self) -> &str {
        self.hash.as_str()
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_data(&self) -> &str {
        self.data.as_str()
    }

    pub fn get_difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn get_nonce(&self) -> u64 {
        self.nonce
    }

    pub fn to_json(&self) -> Result<String> {
        to_json(self)
    }

    pub fn from_json(json: &str) -> Result<Block> {
        let value: Value = from_json(json)?;
        Self::from_json_value(value)
    }

    /// Decode a block received from a peer, checking its shape first
    pub fn from_json_value(value: Value) -> Result<Block> {
        if !is_valid_block_structure(&value) {
            return Err(ValidationError::InvalidStructure(
                "block fields have unexpected types".to_string(),
            )
            .into());
        }
        from_json_value(value)
    }
}

/// Decode a full chain received from a peer
pub fn decode_chain(json: &str) -> Result<Vec<Block>> {
    let values: Vec<Value> = from_json(json)?;
    values.into_iter().map(Block::from_json_value).collect()
}
