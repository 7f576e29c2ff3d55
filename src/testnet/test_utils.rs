//! Test utilities for blockchain testing

use crate::core::{calculate_hash, find_block, Block, BroadcastSink};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Seconds between blocks in mined test chains
pub const TEST_BLOCK_SPACING: i64 = 10;

/// Mine a successor of `previous` ten seconds after it
pub fn mine_next(previous: &Block, data: &str, difficulty: u32) -> Block {
    find_block(
        previous.get_index() + 1,
        previous.get_hash(),
        previous.get_timestamp() + TEST_BLOCK_SPACING,
        data,
        difficulty,
    )
    .expect("test difficulty is within the digest width")
}

/// A valid chain of `len` blocks starting at genesis, all at difficulty 0
pub fn mine_chain(len: usize) -> Vec<Block> {
    let difficulties = vec![0; len.saturating_sub(1)];
    mine_chain_with(&difficulties)
}

/// A valid chain starting at genesis with one mined block per difficulty given
pub fn mine_chain_with(difficulties: &[u32]) -> Vec<Block> {
    let mut chain = vec![Block::genesis().clone()];
    for (i, difficulty) in difficulties.iter().enumerate() {
        let previous = chain.last().expect("chain starts with genesis");
        let block = mine_next(previous, &format!("test block {}", i + 1), *difficulty);
        chain.push(block);
    }
    chain
}

/// Like `mine_chain_with`, but every block keeps nonce 0 whether or not it
/// meets its declared difficulty. Only valid with proof-of-work checks off.
pub fn unmined_chain_with(difficulties: &[u32]) -> Vec<Block> {
    let mut chain = vec![Block::genesis().clone()];
    for (i, difficulty) in difficulties.iter().enumerate() {
        let previous = chain.last().expect("chain starts with genesis");
        let index = previous.get_index() + 1;
        let previous_hash = previous.get_hash().to_string();
        let timestamp = previous.get_timestamp() + TEST_BLOCK_SPACING;
        let data = format!("unmined block {}", i + 1);
        let hash = calculate_hash(index, &previous_hash, timestamp, &data, *difficulty, 0);
        chain.push(Block::new(index, hash, previous_hash, timestamp, data, *difficulty, 0));
    }
    chain
}

/// Linked blocks with chosen `(timestamp, difficulty)` pairs.
///
/// Hashes are consistent with the fields but proof-of-work is not mined, so
/// these are for timing and difficulty tests only.
pub fn chain_with_timestamps(timing: &[(i64, u32)]) -> Vec<Block> {
    let mut chain: Vec<Block> = Vec::with_capacity(timing.len());
    for (index, (timestamp, difficulty)) in timing.iter().enumerate() {
        let previous_hash = chain
            .last()
            .map(|b| b.get_hash().to_string())
            .unwrap_or_default();
        let data = format!("timed block {index}");
        let hash = calculate_hash(index as u64, &previous_hash, *timestamp, &data, *difficulty, 0);
        chain.push(Block::new(
            index as u64,
            hash,
            previous_hash,
            *timestamp,
            data,
            *difficulty,
            0,
        ));
    }
    chain
}

/// Broadcast sink that remembers what it was told
#[derive(Default)]
pub struct RecordingBroadcast {
    count: AtomicUsize,
    last: Mutex<Option<Block>>,
}

impl RecordingBroadcast {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<Block> {
        self.last.lock().unwrap().clone()
    }
}

impl BroadcastSink for RecordingBroadcast {
    fn broadcast_latest(&self, latest: &Block) {
        self.count.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(latest.clone());
    }
}
