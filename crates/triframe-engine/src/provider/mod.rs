//! Uniform-slot rotation.
//!
//! A [`BufferProvider`] owns N uniform slots and hands them out round-robin.
//! Its token pool makes the (N+1)-th acquisition wait until the GPU has
//! finished with the oldest slot, so a slot is never rewritten while an
//! in-flight submission may still read it.

mod buffer_provider;
mod lease;

pub use buffer_provider::{
    BufferProvider, DEFAULT_INFLIGHT_COUNT, MIN_SLOT_SIZE, MODEL_VIEW_OFFSET, PROJECTION_OFFSET,
};
pub use lease::{CancelHandle, InFlightLease, SlotHandle};
