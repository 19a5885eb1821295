/// One vertex: position, color and an optional texture coordinate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub tex_coord: Option<[f32; 2]>,
}

impl Vertex {
    #[inline]
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self {
            position,
            color,
            tex_coord: None,
        }
    }

    #[inline]
    pub const fn textured(position: [f32; 3], color: [f32; 4], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            color,
            tex_coord: Some(tex_coord),
        }
    }

    fn push_floats(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.position);
        out.extend_from_slice(&self.color);
        if let Some(uv) = self.tex_coord {
            out.extend_from_slice(&uv);
        }
    }
}

/// Flat float layout of a mesh's vertices.
///
/// | Attribute | Format    | Offset | Location |
/// |-----------|-----------|--------|----------|
/// | position  | Float32x3 | 0      | 0        |
/// | color     | Float32x4 | 12     | 1        |
/// | tex_coord | Float32x2 | 28     | 2        | (textured only)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Colored,
    Textured,
}

impl VertexFormat {
    const COLORED_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    const TEXTURED_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
        2 => Float32x2  // tex_coord
    ];

    #[inline]
    pub const fn floats_per_vertex(self) -> usize {
        match self {
            VertexFormat::Colored => 7,
            VertexFormat::Textured => 9,
        }
    }

    #[inline]
    pub const fn stride(self) -> u64 {
        (self.floats_per_vertex() * std::mem::size_of::<f32>()) as u64
    }

    pub fn layout(self) -> wgpu::VertexBufferLayout<'static> {
        let attributes: &'static [wgpu::VertexAttribute] = match self {
            VertexFormat::Colored => &Self::COLORED_ATTRS,
            VertexFormat::Textured => &Self::TEXTURED_ATTRS,
        };

        wgpu::VertexBufferLayout {
            array_stride: self.stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }
}

/// Immutable triangle list flattened to a float array.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    format: VertexFormat,
    vertex_count: u32,
    data: Vec<f32>,
}

impl Mesh {
    /// Flattens `vertices` in order.
    ///
    /// Panics if the vertex count is not a multiple of 3, or if only some
    /// vertices carry texture coordinates.
    pub fn new(vertices: &[Vertex]) -> Self {
        assert!(
            vertices.len() % 3 == 0,
            "triangle mesh needs a multiple of 3 vertices, got {}",
            vertices.len()
        );

        let textured = vertices.first().is_some_and(|v| v.tex_coord.is_some());
        assert!(
            vertices.iter().all(|v| v.tex_coord.is_some() == textured),
            "mesh mixes textured and untextured vertices"
        );

        let format = if textured { VertexFormat::Textured } else { VertexFormat::Colored };

        let mut data = Vec::with_capacity(vertices.len() * format.floats_per_vertex());
        for v in vertices {
            v.push_floats(&mut data);
        }

        Self {
            format,
            vertex_count: vertices.len() as u32,
            data,
        }
    }

    #[inline]
    pub fn format(&self) -> VertexFormat {
        self.format
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    #[inline]
    pub fn floats(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    fn tri() -> [Vertex; 3] {
        [
            Vertex::new([0.0, 1.0, 0.0], RED),
            Vertex::new([-1.0, -1.0, 0.0], RED),
            Vertex::new([1.0, -1.0, 0.0], RED),
        ]
    }

    #[test]
    fn flattens_colored_vertices_in_order() {
        let mesh = Mesh::new(&tri());
        assert_eq!(mesh.format(), VertexFormat::Colored);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.floats().len(), 21);
        assert_eq!(&mesh.floats()[..7], &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(mesh.as_bytes().len(), 21 * 4);
    }

    #[test]
    fn textured_vertices_append_uv() {
        let uv = [0.25, 0.5];
        let v = Vertex::textured([1.0, 2.0, 3.0], RED, uv);
        let mesh = Mesh::new(&[v, v, v]);
        assert_eq!(mesh.format(), VertexFormat::Textured);
        assert_eq!(&mesh.floats()[7..9], &uv);
        assert_eq!(VertexFormat::Textured.stride(), 36);
    }

    #[test]
    fn empty_mesh_is_valid() {
        let mesh = Mesh::new(&[]);
        assert!(mesh.is_empty());
        assert!(mesh.as_bytes().is_empty());
    }

    #[test]
    #[should_panic(expected = "multiple of 3")]
    fn non_triangle_count_panics() {
        let t = tri();
        let _ = Mesh::new(&t[..2]);
    }

    #[test]
    #[should_panic(expected = "mixes textured")]
    fn mixed_tex_coords_panic() {
        let mut t = tri();
        t[1].tex_coord = Some([0.0, 0.0]);
        let _ = Mesh::new(&t);
    }
}
