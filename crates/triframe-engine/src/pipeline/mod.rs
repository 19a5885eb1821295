//! Shader + render-pipeline creation for node meshes.
//!
//! Two variants exist, picked by [`VertexFormat`](crate::mesh::VertexFormat):
//! vertex colors only, or textured (adds a texture + sampler bind group).

mod node_pipeline;

pub use node_pipeline::NodePipeline;
