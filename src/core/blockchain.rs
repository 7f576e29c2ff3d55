// The chain manager owns the canonical chain. Everything else only ever sees
// snapshots, so append and replace stay the only ways the chain can change.

use crate::config::ChainConfig;
use crate::core::{Block, BroadcastSink, ChainValidator, DifficultyAdjustment, NoopBroadcast, ProofOfWork};
use crate::error::{Result, ValidationError};
use crate::utils::current_timestamp;
use log::{info, warn};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

pub struct Blockchain {
    // Replaced wholesale under the write lock so readers never see a partial chain
    blocks: RwLock<Vec<Block>>,
    validator: ChainValidator,
    difficulty: DifficultyAdjustment,
    broadcaster: Arc<dyn BroadcastSink>,
    max_nonce: Option<u64>,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new(&ChainConfig::default(), Arc::new(NoopBroadcast))
    }
}

impl Blockchain {
    /// A chain holding only the genesis block
    pub fn new(config: &ChainConfig, broadcaster: Arc<dyn BroadcastSink>) -> Blockchain {
        Blockchain {
            blocks: RwLock::new(vec![Block::genesis().clone()]),
            validator: ChainValidator::from_config(config),
            difficulty: DifficultyAdjustment::from_config(config),
            broadcaster,
            max_nonce: config.max_nonce,
        }
    }

    pub fn get_blockchain(&self) -> Vec<Block> {
        self.blocks
            .read()
            .expect("Failed to acquire read lock on blocks - this should never happen")
            .clone()
    }

    pub fn get_latest_block(&self) -> Block {
        let blocks = self
            .blocks
            .read()
            .expect("Failed to acquire read lock on blocks - this should never happen");
        // The chain always holds at least the genesis block.
        blocks.last().cloned().unwrap_or_else(|| Block::genesis().clone())
    }

    pub fn len(&self) -> usize {
        self.blocks
            .read()
            .expect("Failed to acquire read lock on blocks - this should never happen")
            .len()
    }

    /// Always false: the chain holds at least the genesis block.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Difficulty the next mined block must meet
    pub fn get_difficulty(&self) -> u32 {
        let blocks = self
            .blocks
            .read()
            .expect("Failed to acquire read lock on blocks - this should never happen");
        self.difficulty.get_difficulty(&blocks)
    }

    pub fn validator(&self) -> &ChainValidator {
        &self.validator
    }

    /// Mine a block carrying `data` on top of the current tip, append it and broadcast it
    pub fn generate_next_block(&self, data: &str) -> Result<Block> {
        self.generate_next_block_inner(data, None)
    }

    /// Like `generate_next_block`, but mining stops once `cancel` is set
    pub fn generate_next_block_cancellable(&self, data: &str, cancel: &AtomicBool) -> Result<Block> {
        self.generate_next_block_inner(data, Some(cancel))
    }

    fn generate_next_block_inner(&self, data: &str, cancel: Option<&AtomicBool>) -> Result<Block> {
        // Snapshot the template, then mine with no lock held.
        let (previous, difficulty) = {
            let blocks = self
                .blocks
                .read()
                .expect("Failed to acquire read lock on blocks - this should never happen");
            let previous = blocks
                .last()
                .cloned()
                .unwrap_or_else(|| Block::genesis().clone());
            (previous, self.difficulty.get_difficulty(&blocks))
        };

        let pow = ProofOfWork::new_proof_of_work(
            previous.get_index() + 1,
            previous.get_hash(),
            current_timestamp()?,
            data,
            difficulty,
        )?;
        let block = pow.search(self.max_nonce.unwrap_or(u64::MAX), cancel)?;

        // A tip that moved while mining makes this block stale.
        self.add_block_to_chain(block.clone())?;
        self.broadcaster.broadcast_latest(&block);
        Ok(block)
    }

    /// Append `block` if it validly extends the current tip
    pub fn add_block_to_chain(&self, block: Block) -> std::result::Result<(), ValidationError> {
        let mut blocks = self
            .blocks
            .write()
            .expect("Failed to acquire write lock on blocks - this should never happen");
        let latest = blocks.last().unwrap_or_else(|| Block::genesis());

        if let Err(e) = self.validator.validate_new_block(&block, latest) {
            warn!("Rejected block {}: {e}", block.get_index());
            return Err(e);
        }

        info!("Appended block {}: {}", block.get_index(), block.get_hash());
        blocks.push(block);
        Ok(())
    }

    /// Swap in `candidate` if it is valid and strictly longer than the current chain
    pub fn replace_chain(&self, candidate: Vec<Block>) -> std::result::Result<(), ValidationError> {
        if let Err(e) = self.validator.validate_chain(&candidate) {
            warn!("Received blockchain invalid: {e}");
            return Err(e);
        }

        let latest = {
            let mut blocks = self
                .blocks
                .write()
                .expect("Failed to acquire write lock on blocks - this should never happen");
            if candidate.len() <= blocks.len() {
                let err = ValidationError::ChainNotLonger {
                    candidate: candidate.len(),
                    current: blocks.len(),
                };
                warn!("Received blockchain rejected: {err}");
                return Err(err);
            }

            info!(
                "Received blockchain is valid. Replacing chain of length {} with length {}",
                blocks.len(),
                candidate.len()
            );
            *blocks = candidate;
            blocks.last().cloned()
        };

        if let Some(latest) = latest {
            self.broadcaster.broadcast_latest(&latest);
        }
        Ok(())
    }
}
