use crate::core::block::{calculate_hash, hash_matches_difficulty, Block, HASH_BITS};
use crate::error::{BlockchainError, Result};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};

/// Brute-force nonce search for one block template
pub struct ProofOfWork {
    index: u64,
    previous_hash: String,
    timestamp: i64,
    data: String,
    difficulty: u32,
}

impl ProofOfWork {
    pub fn new_proof_of_work(
        index: u64,
        previous_hash: &str,
        timestamp: i64,
        data: &str,
        difficulty: u32,
    ) -> Result<ProofOfWork> {
        if difficulty >= HASH_BITS {
            return Err(BlockchainError::Config(format!(
                "Difficulty {difficulty} must be below the {HASH_BITS}-bit digest width"
            )));
        }
        Ok(ProofOfWork {
            index,
            previous_hash: previous_hash.to_string(),
            timestamp,
            data: data.to_string(),
            difficulty,
        })
    }

    /// Validate proof-of-work for a block
    pub fn validate(block: &Block) -> bool {
        block.has_valid_proof_of_work()
    }

    /// Search from nonce 0 upward until the difficulty is met.
    pub fn run(&self) -> Result<Block> {
        self.search(u64::MAX, None)
    }

    /// Like `run`, but gives up once `max_nonce` has been tried.
    pub fn run_bounded(&self, max_nonce: u64) -> Result<Block> {
        self.search(max_nonce, None)
    }

    /// Like `run`, but stops as soon as `cancel` is set.
    pub fn run_cancellable(&self, cancel: &AtomicBool) -> Result<Block> {
        self.search(u64::MAX, Some(cancel))
    }

    pub(crate) fn search(&self, max_nonce: u64, cancel: Option<&AtomicBool>) -> Result<Block> {
        debug!(
            "Mining block {} with difficulty {}",
            self.index, self.difficulty
        );
        let mut nonce: u64 = 0;
        loop {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    return Err(BlockchainError::MiningCancelled { last_nonce: nonce });
                }
            }

            let hash = self.hash_with_nonce(nonce);
            if hash_matches_difficulty(&hash, self.difficulty) {
                info!(
                    "Mined block {} at nonce {nonce}: {hash} (difficulty: {})",
                    self.index, self.difficulty
                );
                return Ok(Block::new(
                    self.index,
                    hash,
                    self.previous_hash.clone(),
                    self.timestamp,
                    self.data.clone(),
                    self.difficulty,
                    nonce,
                ));
            }

            if nonce >= max_nonce {
                return Err(BlockchainError::Mining(format!(
                    "No nonce up to {max_nonce} satisfies difficulty {}",
                    self.difficulty
                )));
            }
            nonce += 1;
        }
    }

    fn hash_with_nonce(&self, nonce: u64) -> String {
        calculate_hash(
            self.index,
            &self.previous_hash,
            self.timestamp,
            &self.data,
            self.difficulty,
            nonce,
        )
    }
}

/// Mine a block for the given template with no bound and no cancellation
pub fn find_block(
    index: u64,
    previous_hash: &str,
    timestamp: i64,
    data: &str,
    difficulty: u32,
) -> Result<Block> {
    ProofOfWork::new_proof_of_work(index, previous_hash, timestamp, data, difficulty)?.run()
}
