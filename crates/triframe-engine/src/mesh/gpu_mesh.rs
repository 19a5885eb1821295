use crate::backend::Backend;
use crate::error::AllocationError;

use super::{Mesh, VertexFormat};

/// A mesh uploaded into an immutable device buffer.
///
/// Empty meshes own no buffer; drawing them is a no-op.
pub struct GpuMesh<B: Backend> {
    buffer: Option<B::Buffer>,
    vertex_count: u32,
    format: VertexFormat,
}

impl<B: Backend> GpuMesh<B> {
    pub fn upload(backend: &B, label: &str, mesh: &Mesh) -> Result<Self, AllocationError> {
        let buffer = if mesh.is_empty() {
            None
        } else {
            let buffer_label = format!("{label} vertices");
            Some(backend.allocate_immutable_buffer(&buffer_label, mesh.as_bytes())?)
        };

        log::debug!(
            "{label}: uploaded {} vertices ({} bytes)",
            mesh.vertex_count(),
            mesh.as_bytes().len()
        );

        Ok(Self {
            buffer,
            vertex_count: mesh.vertex_count(),
            format: mesh.format(),
        })
    }

    #[inline]
    pub fn vertex_buffer(&self) -> Option<&B::Buffer> {
        self.buffer.as_ref()
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn format(&self) -> VertexFormat {
        self.format
    }
}
