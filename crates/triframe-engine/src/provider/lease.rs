use std::sync::Arc;

use crate::sync::TokenPool;

/// Claim on one token of a provider's pool.
///
/// Exactly one token is returned per lease: either through
/// [`release`](Self::release) or, if the lease is dropped without being
/// released (lost completion, rejected submission), from `Drop`.
#[derive(Debug)]
#[must_use = "dropping a lease returns its slot immediately"]
pub struct InFlightLease {
    pool: Option<Arc<TokenPool>>,
}

impl InFlightLease {
    pub(super) fn new(pool: Arc<TokenPool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Returns the token to the pool. Call once the GPU finished the submission.
    pub fn release(mut self) {
        if let Some(pool) = self.pool.take() {
            pool.release();
        }
    }

    pub(super) fn belongs_to(&self, pool: &Arc<TokenPool>) -> bool {
        self.pool.as_ref().is_some_and(|p| Arc::ptr_eq(p, pool))
    }
}

impl Drop for InFlightLease {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            log::warn!("in-flight lease dropped without completion; returning slot token");
            pool.release();
        }
    }
}

/// A slot handed out by [`BufferProvider::acquire_next_slot`](super::BufferProvider::acquire_next_slot).
#[derive(Debug)]
#[must_use = "dropping a slot handle returns the slot immediately"]
pub struct SlotHandle {
    pub(super) index: usize,
    pub(super) lease: InFlightLease,
}

impl SlotHandle {
    /// Index of the slot in `[0, N)`.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Detaches the lease so it can travel with the submission's completion.
    #[inline]
    pub fn into_lease(self) -> InFlightLease {
        self.lease
    }
}

/// Cancels a provider from another thread.
///
/// Wakes a frame thread stuck in `acquire_next_slot` (for example because
/// completions stopped arriving) with [`AcquireError::Closed`](crate::error::AcquireError::Closed).
#[derive(Debug, Clone)]
pub struct CancelHandle {
    pub(super) pool: Arc<TokenPool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.pool.close();
    }

    pub fn is_cancelled(&self) -> bool {
        self.pool.is_closed()
    }
}
