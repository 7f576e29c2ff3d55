use crate::config::ChainConfig;
use crate::core::Block;
use crate::error::ValidationError;
use crate::utils::current_timestamp;
use log::warn;
use serde_json::Value;

/// Shape check for a block arriving from the wire.
///
/// Only field types are checked here, never their meaning.
pub fn is_valid_block_structure(value: &Value) -> bool {
    let Some(block) = value.as_object() else {
        return false;
    };
    let is_integer = |key: &str| block.get(key).is_some_and(|v| v.is_u64() || v.is_i64());
    let is_string = |key: &str| block.get(key).is_some_and(Value::is_string);

    block.get("index").is_some_and(Value::is_u64)
        && is_string("hash")
        && is_string("previousHash")
        && is_integer("timestamp")
        && is_string("data")
}

/// Checks a block against its predecessor and a chain against the genesis block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainValidator {
    enforce_timestamps: bool,
    enforce_proof_of_work: bool,
    timestamp_tolerance: i64,
}

impl Default for ChainValidator {
    fn default() -> Self {
        Self::from_config(&ChainConfig::default())
    }
}

impl ChainValidator {
    pub fn from_config(config: &ChainConfig) -> ChainValidator {
        ChainValidator {
            enforce_timestamps: config.enforce_timestamps,
            enforce_proof_of_work: config.enforce_proof_of_work,
            timestamp_tolerance: config.timestamp_tolerance,
        }
    }

    /// Index, linkage and hash checks, in that order, stopping at the first failure
    pub fn validate_new_block(
        &self,
        new_block: &Block,
        previous_block: &Block,
    ) -> Result<(), ValidationError> {
        let expected_index = previous_block.get_index().checked_add(1);
        if expected_index != Some(new_block.get_index()) {
            return Err(ValidationError::InvalidIndex {
                expected: expected_index.unwrap_or(u64::MAX),
                found: new_block.get_index(),
            });
        }

        if new_block.get_previous_hash() != previous_block.get_hash() {
            return Err(ValidationError::InvalidPreviousHash {
                expected: previous_block.get_hash().to_string(),
                found: new_block.get_previous_hash().to_string(),
            });
        }

        let computed = new_block.calculate_hash();
        if computed != new_block.get_hash() {
            return Err(ValidationError::InvalidHash {
                expected: computed,
                found: new_block.get_hash().to_string(),
            });
        }

        if self.enforce_proof_of_work && !new_block.has_valid_proof_of_work() {
            return Err(ValidationError::DifficultyNotMet {
                difficulty: new_block.get_difficulty(),
                hash: new_block.get_hash().to_string(),
            });
        }

        if self.enforce_timestamps {
            self.validate_timestamp(new_block, previous_block)?;
        }

        Ok(())
    }

    pub fn is_valid_new_block(&self, new_block: &Block, previous_block: &Block) -> bool {
        match self.validate_new_block(new_block, previous_block) {
            Ok(()) => true,
            Err(e) => {
                warn!("Rejected block {}: {e}", new_block.get_index());
                false
            }
        }
    }

    /// Timestamp window check against the wall clock
    pub fn validate_timestamp(
        &self,
        new_block: &Block,
        previous_block: &Block,
    ) -> Result<(), ValidationError> {
        // An unreadable clock cannot vouch for the block.
        let now = current_timestamp().map_err(|_| ValidationError::InvalidTimestamp {
            timestamp: new_block.get_timestamp(),
            previous: previous_block.get_timestamp(),
            now: 0,
        })?;
        self.validate_timestamp_at(new_block, previous_block, now)
    }

    /// Timestamp window check against an explicit `now`.
    ///
    /// Accepts when `previous.timestamp - tolerance < new.timestamp` and
    /// `new.timestamp - tolerance < now`.
    pub fn validate_timestamp_at(
        &self,
        new_block: &Block,
        previous_block: &Block,
        now: i64,
    ) -> Result<(), ValidationError> {
        let timestamp = new_block.get_timestamp();
        let previous = previous_block.get_timestamp();
        if previous - self.timestamp_tolerance < timestamp
            && timestamp - self.timestamp_tolerance < now
        {
            Ok(())
        } else {
            Err(ValidationError::InvalidTimestamp {
                timestamp,
                previous,
                now,
            })
        }
    }

    pub fn is_valid_timestamp(&self, new_block: &Block, previous_block: &Block) -> bool {
        match self.validate_timestamp(new_block, previous_block) {
            Ok(()) => true,
            Err(e) => {
                warn!("Rejected block {}: {e}", new_block.get_index());
                false
            }
        }
    }

    /// Genesis must equal the fixed genesis block, then every pair must link
    pub fn validate_chain(&self, chain: &[Block]) -> Result<(), ValidationError> {
        let first = chain.first().ok_or(ValidationError::EmptyChain)?;
        if !first.is_genesis() {
            return Err(ValidationError::InvalidGenesis);
        }

        for pair in chain.windows(2) {
            self.validate_new_block(&pair[1], &pair[0])?;
        }
        Ok(())
    }

    pub fn is_valid_chain(&self, chain: &[Block]) -> bool {
        match self.validate_chain(chain) {
            Ok(()) => true,
            Err(e) => {
                warn!("Rejected chain of length {}: {e}", chain.len());
                false
            }
        }
    }
}
