//! Static per-object geometry.
//!
//! A [`Mesh`] is flattened once on the CPU and uploaded once into an immutable
//! device buffer ([`GpuMesh`]); neither is mutated afterwards.

mod cube;
mod gpu_mesh;
mod vertex;

pub use cube::cube;
pub use gpu_mesh::GpuMesh;
pub use vertex::{Mesh, Vertex, VertexFormat};
