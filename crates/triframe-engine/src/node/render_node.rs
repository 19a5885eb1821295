use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::backend::{Backend, ColorLoad, Completion, DrawCall};
use crate::config::NodeConfig;
use crate::error::{AcquireError, AllocationError, RenderError, SubmissionError};
use crate::math::Matrix4;
use crate::mesh::{GpuMesh, Mesh};
use crate::provider::BufferProvider;

use super::Transform;

/// One drawable object: geometry, optional material, uniform ring, transform.
///
/// `render` may block while all of the node's uniform slots are referenced
/// by unfinished submissions; everything else is non-blocking.
pub struct RenderNode<B: Backend> {
    name: Arc<str>,
    mesh: GpuMesh<B>,
    material: Option<B::Material>,
    provider: BufferProvider<B>,
    acquire_timeout: Option<Duration>,
    transform: Transform,
    time: f64,
    /// Latest failure reported by a completion, kept until taken.
    completion_error: Arc<Mutex<Option<SubmissionError>>>,
}

impl<B: Backend> RenderNode<B> {
    /// Uploads `mesh` and allocates the node's uniform slots.
    ///
    /// Panics on an invalid `config` (zero slots, slot too small for two
    /// matrices).
    pub fn new(
        backend: &B,
        name: &str,
        mesh: &Mesh,
        material: Option<B::Material>,
        config: &NodeConfig,
    ) -> Result<Self, AllocationError> {
        let gpu_mesh = GpuMesh::upload(backend, name, mesh)?;
        let provider = BufferProvider::new(backend, name, config.inflight_count, config.slot_size)?;

        log::debug!(
            "node `{name}`: {} vertices, {} in flight, textured: {}",
            mesh.vertex_count(),
            config.inflight_count,
            material.is_some()
        );

        Ok(Self {
            name: Arc::from(name),
            mesh: gpu_mesh,
            material,
            provider,
            acquire_timeout: config.acquire_timeout,
            transform: Transform::default(),
            time: 0.0,
            completion_error: Arc::new(Mutex::new(None)),
        })
    }

    /// Advances the node clock. No GPU work.
    pub fn update(&mut self, dt: f32) {
        self.time += f64::from(dt);
    }

    /// Local matrix: translate, rotate (X, Y, Z), scale.
    pub fn model_matrix(&self) -> Matrix4 {
        self.transform.matrix()
    }

    /// Writes `parent · model` and `projection` into the next free uniform
    /// slot and submits one draw against `target`.
    ///
    /// Returns as soon as the draw is submitted. The slot is released by the
    /// submission's completion, on success and on failure alike; a failure
    /// reported that way is kept for [`take_completion_error`](Self::take_completion_error).
    /// An empty mesh returns `Ok(())` without touching the uniform ring.
    pub fn render(
        &mut self,
        backend: &B,
        pipeline: &B::Pipeline,
        target: &B::Target,
        parent: &Matrix4,
        projection: &Matrix4,
        load: ColorLoad,
    ) -> Result<(), RenderError> {
        let Some(vertex_buffer) = self.mesh.vertex_buffer() else {
            return Ok(());
        };

        let acquired = match self.acquire_timeout {
            Some(timeout) => self.provider.acquire_next_slot_timeout(timeout),
            None => self.provider.acquire_next_slot(),
        };
        let handle = acquired.inspect_err(|err| {
            if let AcquireError::Timeout { waited } = err {
                log::warn!("node `{}`: no uniform slot freed within {waited:?}", self.name);
            }
        })?;

        let model_view = parent * &self.transform.matrix();
        self.provider
            .write_uniforms(backend, &handle, &model_view, projection);

        let vertex_count = self.mesh.vertex_count();
        let draw = DrawCall {
            label: &self.name,
            pipeline,
            vertex_buffer,
            uniforms: self.provider.slot(&handle),
            material: self.material.as_ref(),
            load,
            vertex_format: self.mesh.format(),
            vertex_count,
            instance_count: vertex_count / 3,
        };

        let slot = handle.index();
        let lease = handle.into_lease();
        let name = Arc::clone(&self.name);
        let failure = Arc::clone(&self.completion_error);
        let completion = Completion::new(move |result| {
            if let Err(err) = result {
                log::error!("node `{name}`: submission failed: {err}");
                *failure.lock() = Some(err);
            }
            lease.release();
            log::trace!("node `{name}`: uniform slot {slot} released");
        });

        backend.submit(target, draw, completion)?;
        Ok(())
    }

    /// Takes the most recent error delivered to a completion, if any.
    ///
    /// `render` only reports failures known at submit time; GPU-side failures
    /// arrive later on the completion thread and are collected here.
    pub fn take_completion_error(&self) -> Option<SubmissionError> {
        self.completion_error.lock().take()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Seconds accumulated through [`update`](Self::update).
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.mesh.vertex_count()
    }

    #[inline]
    pub fn provider(&self) -> &BufferProvider<B> {
        &self.provider
    }
}
