use std::time::Duration;

use crate::provider::{DEFAULT_INFLIGHT_COUNT, MIN_SLOT_SIZE};

/// Per-node uniform ring configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Number of uniform slots, and so the number of submissions that may be
    /// in flight for this node at once.
    pub inflight_count: usize,

    /// Bytes per uniform slot. Must hold two matrices.
    pub slot_size: u64,

    /// Bounded wait for a free slot.
    ///
    /// `None` blocks until the GPU releases one. With `Some`, a render that
    /// waits longer fails with a backpressure timeout instead.
    pub acquire_timeout: Option<Duration>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            inflight_count: DEFAULT_INFLIGHT_COUNT,
            slot_size: MIN_SLOT_SIZE,
            acquire_timeout: None,
        }
    }
}
