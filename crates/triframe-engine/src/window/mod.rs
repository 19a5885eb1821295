//! Window + runtime loop (the frame driver).
//!
//! Owns the `winit` EventLoop and the single Window, wires them to the GPU
//! layer and redraws continuously.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
