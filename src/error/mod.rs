//! Error handling for the blockchain
//!
//! This module provides the crate error type plus the structured reason codes
//! reported when a block or chain fails validation.

use std::fmt;

/// Result type alias for blockchain operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Error types for blockchain operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockchainError {
    /// Configuration errors
    Config(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// System clock errors
    Clock(String),
    /// Mining errors
    Mining(String),
    /// Mining was stopped through its cancellation flag
    MiningCancelled { last_nonce: u64 },
    /// Block or chain validation errors
    Validation(ValidationError),
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::Config(msg) => write!(f, "Configuration error: {msg}"),
            BlockchainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::Clock(msg) => write!(f, "Clock error: {msg}"),
            BlockchainError::Mining(msg) => write!(f, "Mining error: {msg}"),
            BlockchainError::MiningCancelled { last_nonce } => {
                write!(f, "Mining cancelled at nonce {last_nonce}")
            }
            BlockchainError::Validation(err) => write!(f, "Validation error: {err}"),
        }
    }
}

impl std::error::Error for BlockchainError {}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BlockchainError {
    fn from(err: serde_json::Error) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BlockchainError {
    fn from(err: toml::de::Error) -> Self {
        BlockchainError::Config(err.to_string())
    }
}

impl From<ValidationError> for BlockchainError {
    fn from(err: ValidationError) -> Self {
        BlockchainError::Validation(err)
    }
}

/// Broad class of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCategory {
    /// Wrong field shape, rejected before any semantic check
    Structural,
    /// Index or previous hash does not follow the predecessor
    Linkage,
    /// Hash mismatch or proof-of-work not satisfied
    Integrity,
    /// Timestamp outside the accepted window
    Timestamp,
    /// Candidate chain refused by the replacement rule
    ChainReplacement,
}

/// Reason a block or chain was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidStructure(String),
    InvalidIndex { expected: u64, found: u64 },
    InvalidPreviousHash { expected: String, found: String },
    InvalidHash { expected: String, found: String },
    DifficultyNotMet { difficulty: u32, hash: String },
    InvalidTimestamp { timestamp: i64, previous: i64, now: i64 },
    EmptyChain,
    InvalidGenesis,
    ChainNotLonger { candidate: usize, current: usize },
}

impl ValidationError {
    pub fn category(&self) -> ValidationCategory {
        match self {
            ValidationError::InvalidStructure(_) => ValidationCategory::Structural,
            ValidationError::InvalidIndex { .. } | ValidationError::InvalidPreviousHash { .. } => {
                ValidationCategory::Linkage
            }
            ValidationError::InvalidHash { .. } | ValidationError::DifficultyNotMet { .. } => {
                ValidationCategory::Integrity
            }
            ValidationError::InvalidTimestamp { .. } => ValidationCategory::Timestamp,
            ValidationError::EmptyChain
            | ValidationError::InvalidGenesis
            | ValidationError::ChainNotLonger { .. } => ValidationCategory::ChainReplacement,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidStructure(msg) => write!(f, "invalid structure: {msg}"),
            ValidationError::InvalidIndex { expected, found } => {
                write!(f, "invalid index: expected {expected}, found {found}")
            }
            ValidationError::InvalidPreviousHash { expected, found } => {
                write!(f, "invalid previous hash: expected {expected}, found {found}")
            }
            ValidationError::InvalidHash { expected, found } => {
                write!(f, "invalid hash: computed {expected}, block carries {found}")
            }
            ValidationError::DifficultyNotMet { difficulty, hash } => {
                write!(f, "hash {hash} does not satisfy difficulty {difficulty}")
            }
            ValidationError::InvalidTimestamp {
                timestamp,
                previous,
                now,
            } => write!(
                f,
                "invalid timestamp {timestamp} (previous {previous}, now {now})"
            ),
            ValidationError::EmptyChain => write!(f, "chain is empty"),
            ValidationError::InvalidGenesis => write!(f, "genesis block does not match"),
            ValidationError::ChainNotLonger { candidate, current } => write!(
                f,
                "candidate chain of length {candidate} is not longer than current length {current}"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_follow_taxonomy() {
        assert_eq!(
            ValidationError::InvalidStructure("index".to_string()).category(),
            ValidationCategory::Structural
        );
        assert_eq!(
            ValidationError::InvalidIndex {
                expected: 2,
                found: 3
            }
            .category(),
            ValidationCategory::Linkage
        );
        assert_eq!(
            ValidationError::DifficultyNotMet {
                difficulty: 3,
                hash: "ff".to_string()
            }
            .category(),
            ValidationCategory::Integrity
        );
        assert_eq!(
            ValidationError::ChainNotLonger {
                candidate: 2,
                current: 2
            }
            .category(),
            ValidationCategory::ChainReplacement
        );
    }

    #[test]
    fn test_validation_error_converts_into_blockchain_error() {
        let err: BlockchainError = ValidationError::InvalidGenesis.into();
        assert_eq!(err, BlockchainError::Validation(ValidationError::InvalidGenesis));
        assert_eq!(
            err.to_string(),
            "Validation error: genesis block does not match"
        );
    }
}
