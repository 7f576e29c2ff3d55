use crate::config::ChainConfig;
use crate::core::Block;
use log::info;

/// Difficulty retargeting from recent block timing.
///
/// Every `adjustment_interval` blocks the difficulty moves by one step
/// depending on how long the last interval took compared with
/// `block_generation_interval * adjustment_interval`; in between it stays at
/// the latest block's difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyAdjustment {
    block_generation_interval: u64,
    adjustment_interval: u64,
}

impl Default for DifficultyAdjustment {
    fn default() -> Self {
        Self::from_config(&ChainConfig::default())
    }
}

impl DifficultyAdjustment {
    pub fn new(block_generation_interval: u64, adjustment_interval: u64) -> DifficultyAdjustment {
        DifficultyAdjustment {
            block_generation_interval,
            adjustment_interval,
        }
    }

    pub fn from_config(config: &ChainConfig) -> DifficultyAdjustment {
        Self::new(
            config.block_generation_interval,
            config.difficulty_adjustment_interval,
        )
    }

    /// Difficulty required for the block that would follow `chain`'s tip
    pub fn get_difficulty(&self, chain: &[Block]) -> u32 {
        let Some(latest) = chain.last() else {
            return 0;
        };

        if self.adjustment_interval > 0
            && latest.get_index() % self.adjustment_interval == 0
            && latest.get_index() != 0
        {
            self.get_adjusted_difficulty(latest, chain)
        } else {
            latest.get_difficulty()
        }
    }

    /// Seconds an adjustment interval is expected to take
    pub fn expected_time(&self) -> i64 {
        self.block_generation_interval
            .checked_mul(self.adjustment_interval)
            .and_then(|seconds| i64::try_from(seconds).ok())
            .unwrap_or(i64::MAX)
    }

    fn get_adjusted_difficulty(&self, latest: &Block, chain: &[Block]) -> u32 {
        let offset = self.adjustment_interval as usize;
        let Some(prev_adjustment) = chain
            .len()
            .checked_sub(offset)
            .and_then(|position| chain.get(position))
        else {
            return latest.get_difficulty();
        };

        let expected = self.expected_time();
        // Timestamps come from peers, so none of this may overflow.
        let taken = latest
            .get_timestamp()
            .saturating_sub(prev_adjustment.get_timestamp());
        let base = prev_adjustment.get_difficulty();

        // taken < expected / 2, kept in integers
        let adjusted = if taken.saturating_mul(2) < expected {
            base.saturating_add(1)
        } else if taken > expected.saturating_mul(2) {
            base.saturating_sub(1)
        } else {
            base
        };

        info!(
            "Difficulty retarget at block {}: {base} -> {adjusted} (taken: {taken}s, expected: {expected}s)",
            latest.get_index()
        );
        adjusted
    }
}
