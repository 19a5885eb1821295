//! Frame timing.
//!
//! One [`FrameClock`] per render loop; call `tick()` once per frame to get
//! the delta fed to `RenderNode::update`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
