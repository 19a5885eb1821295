//! GPU collaborator boundary.
//!
//! The node pipeline only needs four things from a GPU API: reserve a
//! CPU-writable buffer, upload an immutable buffer once, write bytes into a
//! buffer, and submit a draw whose completion is reported later through a
//! callback. [`Backend`] captures exactly that, so the synchronization logic in
//! [`provider`](crate::provider) and [`node`](crate::node) runs unchanged on
//! wgpu and on the headless [`RecordingBackend`].

mod native;
mod recording;

pub use native::{WgpuBackend, WgpuMaterial};
pub use recording::{
    RecordedBuffer, RecordedDraw, RecordedMaterial, RecordedPipeline, RecordingBackend,
};

use crate::color::Color;
use crate::error::{AllocationError, SubmissionError};
use crate::mesh::VertexFormat;

/// Describes a buffer to reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRequest<'a> {
    pub label: &'a str,
    pub size: u64,
    /// Buffer is rewritten by the CPU after creation (uniform slots).
    pub cpu_writable: bool,
}

impl<'a> BufferRequest<'a> {
    #[inline]
    pub fn uniform(label: &'a str, size: u64) -> Self {
        Self {
            label,
            size,
            cpu_writable: true,
        }
    }
}

/// How the color target is initialized at the start of a draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ColorLoad {
    Clear(Color),
    /// Keep prior contents (later nodes of a scene).
    Load,
}

impl ColorLoad {
    /// `Some(color)` clears with `color`; `None` clears with [`Color::DARK_GREEN`].
    pub fn clear_or_default(color: Option<Color>) -> Self {
        ColorLoad::Clear(color.unwrap_or(Color::DARK_GREEN))
    }
}

impl Default for ColorLoad {
    fn default() -> Self {
        ColorLoad::Clear(Color::DARK_GREEN)
    }
}

/// One recorded draw: everything a backend needs to encode a render pass.
pub struct DrawCall<'a, B: Backend + ?Sized> {
    pub label: &'a str,
    pub pipeline: &'a B::Pipeline,
    pub vertex_buffer: &'a B::Buffer,
    /// Uniform slot bound as the second vertex-stage input.
    pub uniforms: &'a B::Buffer,
    pub material: Option<&'a B::Material>,
    pub load: ColorLoad,
    /// Layout of `vertex_buffer`; must match the pipeline's.
    pub vertex_format: VertexFormat,
    pub vertex_count: u32,
    pub instance_count: u32,
}

impl<B: Backend + ?Sized> DrawCall<'_, B> {
    /// Rejects draws the pipeline cannot consume: a vertex layout other than
    /// the pipeline's, or a textured pipeline without a material.
    ///
    /// Called by backends before anything is encoded.
    pub fn check_against(&self, pipeline_format: VertexFormat) -> Result<(), SubmissionError> {
        if self.vertex_format != pipeline_format {
            return Err(SubmissionError::Rejected(format!(
                "`{}` has {:?} vertices but the pipeline expects {:?}",
                self.label, self.vertex_format, pipeline_format
            )));
        }
        if pipeline_format == VertexFormat::Textured && self.material.is_none() {
            return Err(SubmissionError::Rejected(format!(
                "`{}` uses a textured pipeline but has no material",
                self.label
            )));
        }
        Ok(())
    }
}

/// Callback invoked once when a submission finishes executing (or fails).
///
/// Backends must call [`Completion::complete`] exactly once per accepted
/// submission. A completion that is dropped without being called still
/// releases whatever it owns through `Drop`.
pub struct Completion(Box<dyn FnOnce(Result<(), SubmissionError>) + Send + 'static>);

impl Completion {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Result<(), SubmissionError>) + Send + 'static,
    {
        Self(Box::new(f))
    }

    #[inline]
    pub fn complete(self, result: Result<(), SubmissionError>) {
        (self.0)(result)
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Completion(..)")
    }
}

/// Device/allocation + submission-queue collaborator.
pub trait Backend {
    /// Device buffer handle.
    type Buffer: Send + 'static;

    /// Compiled pipeline the draw binds.
    type Pipeline;

    /// Texture + sampler pair bound at draw time.
    type Material;

    /// Presentable color target.
    type Target: ?Sized;

    fn allocate_buffer(&self, request: &BufferRequest<'_>) -> Result<Self::Buffer, AllocationError>;

    fn allocate_immutable_buffer(
        &self,
        label: &str,
        bytes: &[u8],
    ) -> Result<Self::Buffer, AllocationError>;

    /// Copies `bytes` into `buffer` at `offset`.
    fn write_buffer(&self, buffer: &Self::Buffer, offset: u64, bytes: &[u8]);

    /// Encodes and submits `draw` against `target` without waiting for the GPU.
    ///
    /// On `Ok`, `on_complete` is invoked later, possibly on another thread.
    /// On `Err`, `on_complete` has been dropped or already invoked with the error.
    fn submit(
        &self,
        target: &Self::Target,
        draw: DrawCall<'_, Self>,
        on_complete: Completion,
    ) -> Result<(), SubmissionError>;
}
