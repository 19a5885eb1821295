//! Math primitives.
//!
//! Only what the node pipeline needs: a 4×4 matrix whose memory layout is
//! copied verbatim into uniform slots.

mod matrix;

pub use matrix::Matrix4;
