use crate::error::{BlockchainError, Result};
use log::info;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Expected seconds between two blocks
pub const DEFAULT_BLOCK_GENERATION_INTERVAL: u64 = 10;
/// Number of blocks between two difficulty retargets
pub const DEFAULT_DIFFICULTY_ADJUSTMENT_INTERVAL: u64 = 10;
/// Allowed clock drift, in seconds, when checking block timestamps
pub const DEFAULT_TIMESTAMP_TOLERANCE: i64 = 60;

const BLOCK_GENERATION_INTERVAL_KEY: &str = "CHAIN_BLOCK_GENERATION_INTERVAL";
const DIFFICULTY_ADJUSTMENT_INTERVAL_KEY: &str = "CHAIN_DIFFICULTY_ADJUSTMENT_INTERVAL";
const TIMESTAMP_TOLERANCE_KEY: &str = "CHAIN_TIMESTAMP_TOLERANCE";
const ENFORCE_TIMESTAMPS_KEY: &str = "CHAIN_ENFORCE_TIMESTAMPS";
const ENFORCE_PROOF_OF_WORK_KEY: &str = "CHAIN_ENFORCE_PROOF_OF_WORK";
const MAX_NONCE_KEY: &str = "CHAIN_MAX_NONCE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub block_generation_interval: u64,
    pub difficulty_adjustment_interval: u64,
    pub timestamp_tolerance: i64,
    /// Run the timestamp window check as part of block validation
    pub enforce_timestamps: bool,
    /// Require every block hash to satisfy its declared difficulty
    pub enforce_proof_of_work: bool,
    /// Upper bound on the nonce search; `None` mines until success
    pub max_nonce: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig {
            block_generation_interval: DEFAULT_BLOCK_GENERATION_INTERVAL,
            difficulty_adjustment_interval: DEFAULT_DIFFICULTY_ADJUSTMENT_INTERVAL,
            timestamp_tolerance: DEFAULT_TIMESTAMP_TOLERANCE,
            enforce_timestamps: false,
            enforce_proof_of_work: true,
            max_nonce: None,
        }
    }
}

impl ChainConfig {
    pub fn from_toml_str(contents: &str) -> Result<ChainConfig> {
        let config: ChainConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<ChainConfig> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded chain configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `CHAIN_*` environment variables on top of this configuration
    pub fn with_env_overrides(mut self) -> Result<ChainConfig> {
        if let Some(value) = env_value(BLOCK_GENERATION_INTERVAL_KEY)? {
            self.block_generation_interval = value;
        }
        if let Some(value) = env_value(DIFFICULTY_ADJUSTMENT_INTERVAL_KEY)? {
            self.difficulty_adjustment_interval = value;
        }
        if let Some(value) = env_value(TIMESTAMP_TOLERANCE_KEY)? {
            self.timestamp_tolerance = value;
        }
        if let Some(value) = env_value(ENFORCE_TIMESTAMPS_KEY)? {
            self.enforce_timestamps = value;
        }
        if let Some(value) = env_value(ENFORCE_PROOF_OF_WORK_KEY)? {
            self.enforce_proof_of_work = value;
        }
        if let Some(value) = env_value(MAX_NONCE_KEY)? {
            self.max_nonce = Some(value);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_generation_interval == 0 {
            return Err(BlockchainError::Config(
                "block_generation_interval must be greater than zero".to_string(),
            ));
        }
        if self.difficulty_adjustment_interval == 0 {
            return Err(BlockchainError::Config(
                "difficulty_adjustment_interval must be greater than zero".to_string(),
            ));
        }
        if self.timestamp_tolerance < 0 {
            return Err(BlockchainError::Config(format!(
                "timestamp_tolerance must not be negative, got {}",
                self.timestamp_tolerance
            )));
        }
        Ok(())
    }
}

fn env_value<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| BlockchainError::Config(format!("Invalid value for {key}: {raw}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ChainConfig::default();
        assert_eq!(config.block_generation_interval, 10);
        assert_eq!(config.difficulty_adjustment_interval, 10);
        assert_eq!(config.timestamp_tolerance, 60);
        assert!(!config.enforce_timestamps);
        assert!(config.enforce_proof_of_work);
        assert_eq!(config.max_nonce, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ChainConfig::from_toml_str(
            "difficulty_adjustment_interval = 5\nenforce_timestamps = true\n",
        )
        .unwrap();
        assert_eq!(config.difficulty_adjustment_interval, 5);
        assert!(config.enforce_timestamps);
        assert_eq!(config.block_generation_interval, 10);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = ChainConfig::from_toml_str("block_generation_interval = 0\n");
        assert!(matches!(result, Err(BlockchainError::Config(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = ChainConfig::from_toml_str("timestamp_tolerance = \"soon\"\n");
        assert!(matches!(result, Err(BlockchainError::Config(_))));
    }

    // The only test touching CHAIN_* variables, so it cannot race another reader.
    #[test]
    fn test_env_overrides() {
        env::set_var(MAX_NONCE_KEY, "4096");
        env::set_var(ENFORCE_TIMESTAMPS_KEY, "true");
        env::set_var(ENFORCE_PROOF_OF_WORK_KEY, "false");
        let config = ChainConfig::default().with_env_overrides().unwrap();
        assert_eq!(config.max_nonce, Some(4096));
        assert!(config.enforce_timestamps);
        assert!(!config.enforce_proof_of_work);
        assert_eq!(config.block_generation_interval, 10);

        env::set_var(MAX_NONCE_KEY, "lots");
        let result = ChainConfig::default().with_env_overrides();
        assert!(matches!(result, Err(BlockchainError::Config(_))));

        env::set_var(MAX_NONCE_KEY, "4096");
        env::set_var(DIFFICULTY_ADJUSTMENT_INTERVAL_KEY, "0");
        let result = ChainConfig::default().with_env_overrides();
        assert!(matches!(result, Err(BlockchainError::Config(_))));

        for key in [
            MAX_NONCE_KEY,
            ENFORCE_TIMESTAMPS_KEY,
            ENFORCE_PROOF_OF_WORK_KEY,
            DIFFICULTY_ADJUSTMENT_INTERVAL_KEY,
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_nonce = 5000").unwrap();
        writeln!(file, "timestamp_tolerance = 30").unwrap();

        let config = ChainConfig::load(file.path()).unwrap();
        assert_eq!(config.max_nonce, Some(5000));
        assert_eq!(config.timestamp_tolerance, 30);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ChainConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(BlockchainError::Io(_))));
    }
}
