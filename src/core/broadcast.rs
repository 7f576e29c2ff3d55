use crate::core::Block;
use log::debug;

/// Notification sink called after the canonical chain gains a new tip.
///
/// Delivery is fire-and-forget: the chain mutation is already committed when
/// this runs, and nothing it does can undo it.
pub trait BroadcastSink: Send + Sync {
    fn broadcast_latest(&self, latest: &Block);
}

/// Sink for nodes with no network layer attached
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBroadcast;

impl BroadcastSink for NoopBroadcast {
    fn broadcast_latest(&self, latest: &Block) {
        debug!("No broadcast sink attached, latest block {}", latest.get_index());
    }
}

impl<F> BroadcastSink for F
where
    F: Fn(&Block) + Send + Sync,
{
    fn broadcast_latest(&self, latest: &Block) {
        self(latest)
    }
}
