//! Typed configuration.
//!
//! Plain structs with `Default` values; no file format is read. Callers
//! override individual fields with struct update syntax.

mod node;
mod view;

pub use node::NodeConfig;
pub use view::{PipelineConfig, ProjectionConfig};
