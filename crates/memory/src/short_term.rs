//! Short-term memory — a bounded, order-preserving recency buffer.

use percept_core::interaction::Interaction;
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of interactions the buffer retains.
pub const DEFAULT_CAPACITY: usize = 200;

/// Fixed-capacity FIFO buffer of the most recent interactions.
///
/// Its sole responsibility is bounded, order-preserving recency: no ranking,
/// no filtering. Only ever touched from the single tick loop, so it carries
/// no internal locking.
#[derive(Debug)]
pub struct ShortTermMemory {
    buffer: VecDeque<Arc<Interaction>>,
    capacity: usize,
}

impl ShortTermMemory {
    /// Create a buffer bounded at `capacity` interactions.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append an interaction at the tail. If capacity is exceeded, the oldest
    /// interaction is removed from the head and returned.
    pub fn remember(&mut self, interaction: Arc<Interaction>) -> Option<Arc<Interaction>> {
        self.buffer.push_back(interaction);

        if self.buffer.len() > self.capacity {
            return self.buffer.pop_front();
        }

        None
    }

    /// Snapshot of the buffer in insertion order, oldest first.
    /// Used verbatim as chronological context.
    pub fn recall(&self) -> Vec<Arc<Interaction>> {
        self.buffer.iter().cloned().collect()
    }

    /// Number of interactions currently held.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ShortTermMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
