//! Drawable scene objects.
//!
//! A [`RenderNode`] owns its geometry, its uniform ring and its transform, and
//! knows how to submit itself. A [`Scene`] is a flat list of nodes sharing one
//! world matrix; there is no hierarchy beyond that single parent.

mod render_node;
mod scene;
mod transform;

pub use crate::backend::ColorLoad;
pub use render_node::RenderNode;
pub use scene::Scene;
pub use transform::Transform;
