//! Synchronization primitives.
//!
//! Provides the counting token pool that bounds how many GPU submissions may
//! reference a provider's uniform slots at once. Each provider owns its own
//! pool; nothing here is process-global.

mod token_pool;

pub use token_pool::TokenPool;
