//! Error taxonomy for the node pipeline.
//!
//! Precondition violations (malformed slot sizes, non-triangle meshes, more
//! releases than acquisitions) are programming errors and panic at the call
//! site instead of showing up here.

use std::time::Duration;

use thiserror::Error;

/// Device memory for a vertex or uniform buffer could not be reserved.
///
/// Fatal to the construction of the owning node; never retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to allocate {size} bytes for `{label}`: {reason}")]
pub struct AllocationError {
    pub label: String,
    pub size: u64,
    pub reason: String,
}

impl AllocationError {
    pub fn new(label: impl Into<String>, size: u64, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            size,
            reason: reason.into(),
        }
    }
}

/// The GPU queue rejected or failed a submitted command sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("device lost: {0}")]
    DeviceLost(String),

    #[error("waiting for submission completion failed: {0}")]
    Poll(String),

    #[error("completion poller is no longer running")]
    BackendClosed,
}

/// Failure to obtain a uniform slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AcquireError {
    /// The provider was cancelled (torn down) while the caller waited.
    #[error("buffer provider closed while waiting for a free slot")]
    Closed,

    /// No slot was released in time; the GPU is more than N frames behind.
    #[error("no uniform slot became free within {waited:?} (GPU backpressure)")]
    Timeout { waited: Duration },
}

/// Any failure surfaced by [`RenderNode::render`](crate::node::RenderNode::render).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Acquire(#[from] AcquireError),
}

impl RenderError {
    /// `true` for the designed backpressure condition (bounded wait expired).
    pub fn is_backpressure_timeout(&self) -> bool {
        matches!(self, RenderError::Acquire(AcquireError::Timeout { .. }))
    }
}
