//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types; the
//! runtime translates platform events into [`InputEvent`]s
//! (see `platform::winit`). [`PanGesture`] turns pointer drags into rotation
//! deltas.

mod pan;
pub(crate) mod platform;
mod types;

pub use pan::{PanDelta, PanGesture};
pub use types::{InputEvent, Key, MouseButton};
