use crate::math::Matrix4;

/// Perspective camera parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Vertical field of view, in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl ProjectionConfig {
    /// Projection for a drawable of the given aspect ratio (width / height).
    pub fn matrix(&self, aspect: f32) -> Matrix4 {
        Matrix4::perspective(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }

    /// Like [`matrix`](Self::matrix), from a pixel size. Zero-sized drawables
    /// (minimized windows) fall back to a square aspect.
    pub fn matrix_for_size(&self, width: u32, height: u32) -> Matrix4 {
        let aspect = if width == 0 || height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        self.matrix(aspect)
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 85.0,
            near: 0.01,
            far: 100.0,
        }
    }
}

/// Render-pipeline state that is not dictated by the vertex format.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Format of the color target the pipeline draws into.
    pub color_format: wgpu::TextureFormat,

    pub front_face: wgpu::FrontFace,

    pub cull_mode: Option<wgpu::Face>,
}

impl PipelineConfig {
    pub fn new(color_format: wgpu::TextureFormat) -> Self {
        Self {
            color_format,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
        }
    }
}
