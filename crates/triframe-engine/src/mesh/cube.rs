use super::{Mesh, Vertex};

// Texture atlas: a horizontal cross of 0.25×0.25 cells.
const CELL: f32 = 0.25;

/// Textured cube centered at the origin, 36 vertices, counter-clockwise
/// winding seen from outside.
///
/// Texture coordinates address a cross-shaped atlas (top row: top face;
/// middle row: left, front, right, back; bottom row: bottom face).
pub fn cube(half_extent: f32) -> Mesh {
    let h = half_extent;
    let mut vertices = Vec::with_capacity(36);

    // Corners per face: top-left, bottom-left, bottom-right, top-right.
    let faces: [([[f32; 3]; 4], [f32; 2], [f32; 4]); 6] = [
        // front (+z)
        ([[-h, h, h], [-h, -h, h], [h, -h, h], [h, h, h]], [0.25, 0.25], [1.0, 0.0, 0.0, 1.0]),
        // left (-x)
        ([[-h, h, -h], [-h, -h, -h], [-h, -h, h], [-h, h, h]], [0.0, 0.25], [0.0, 1.0, 0.0, 1.0]),
        // right (+x)
        ([[h, h, h], [h, -h, h], [h, -h, -h], [h, h, -h]], [0.5, 0.25], [0.0, 0.0, 1.0, 1.0]),
        // top (+y)
        ([[-h, h, -h], [-h, h, h], [h, h, h], [h, h, -h]], [0.25, 0.0], [0.1, 0.6, 0.4, 1.0]),
        // bottom (-y)
        ([[-h, -h, h], [-h, -h, -h], [h, -h, -h], [h, -h, h]], [0.25, 0.5], [1.0, 1.0, 0.0, 1.0]),
        // back (-z)
        ([[h, h, -h], [h, -h, -h], [-h, -h, -h], [-h, h, -h]], [0.75, 0.25], [1.0, 0.0, 1.0, 1.0]),
    ];

    for (corners, [u, v], color) in faces {
        let uvs = [[u, v], [u, v + CELL], [u + CELL, v + CELL], [u + CELL, v]];
        for i in [0, 1, 2, 0, 2, 3] {
            vertices.push(Vertex::textured(corners[i], color, uvs[i]));
        }
    }

    Mesh::new(&vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::VertexFormat;

    #[test]
    fn cube_is_textured_triangle_list() {
        let mesh = cube(1.0);
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.format(), VertexFormat::Textured);
        assert_eq!(mesh.floats().len(), 36 * 9);
    }

    #[test]
    fn cube_vertices_sit_on_the_extent() {
        let mesh = cube(0.3);
        for v in mesh.floats().chunks(9) {
            assert!(v[..3].iter().all(|c| (c.abs() - 0.3).abs() < 1e-6));
            assert!(v[7..9].iter().all(|t| (0.0..=1.0).contains(t)));
        }
    }

    #[test]
    fn front_face_winds_counter_clockwise() {
        let mesh = cube(1.0);
        let p = |i: usize| {
            let f = &mesh.floats()[i * 9..i * 9 + 3];
            [f[0], f[1]]
        };
        let (a, b, c) = (p(0), p(1), p(2));
        let signed_area = (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]);
        assert!(signed_area > 0.0);
    }
}
