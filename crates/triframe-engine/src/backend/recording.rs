use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{AllocationError, SubmissionError};
use crate::math::Matrix4;
use crate::mesh::VertexFormat;

use super::{Backend, BufferRequest, ColorLoad, Completion, DrawCall};

/// Host-memory buffer produced by [`RecordingBackend`].
///
/// Clones share storage, so a simulated GPU thread can read exactly what the
/// CPU side wrote.
#[derive(Debug, Clone)]
pub struct RecordedBuffer {
    id: usize,
    label: String,
    cpu_writable: bool,
    data: Arc<Mutex<Vec<u8>>>,
}

impl RecordedBuffer {
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies `len` bytes starting at `offset`.
    pub fn read(&self, offset: usize, len: usize) -> Vec<u8> {
        self.data.lock()[offset..offset + len].to_vec()
    }

    /// Reads a full matrix starting at byte `offset`.
    pub fn read_matrix(&self, offset: usize) -> Matrix4 {
        let bytes = self.read(offset, Matrix4::BYTE_SIZE as usize);
        bytemuck::pod_read_unaligned(&bytes)
    }
}

/// Snapshot of one submitted draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub label: String,
    pub target: String,
    pub pipeline: String,
    pub vertex_buffer: usize,
    pub uniform_buffer: usize,
    /// Uniform slot contents at submission time.
    pub uniforms: Vec<u8>,
    pub material: Option<String>,
    pub load: ColorLoad,
    pub vertex_count: u32,
    pub instance_count: u32,
}

impl RecordedDraw {
    /// Model-view matrix as written into the slot.
    pub fn model_view(&self) -> Matrix4 {
        bytemuck::pod_read_unaligned(&self.uniforms[..Matrix4::BYTE_SIZE as usize])
    }

    /// Projection matrix as written into the slot.
    pub fn projection(&self) -> Matrix4 {
        let start = Matrix4::BYTE_SIZE as usize;
        bytemuck::pod_read_unaligned(&self.uniforms[start..start + Matrix4::BYTE_SIZE as usize])
    }
}

#[derive(Default)]
struct Inner {
    next_id: usize,
    allocated: u64,
    memory_limit: Option<u64>,
    draws: Vec<RecordedDraw>,
    pending: VecDeque<Completion>,
    reject_next: Option<SubmissionError>,
}

/// Headless backend that keeps buffers in host memory and records draws.
///
/// Completions are queued instead of firing on their own; the owner decides
/// when "the GPU" finishes via [`complete_next`](Self::complete_next) and
/// friends. This makes in-flight timing fully deterministic.
#[derive(Default)]
pub struct RecordingBackend {
    inner: Mutex<Inner>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails allocations once `limit` bytes have been handed out.
    pub fn with_memory_limit(limit: u64) -> Self {
        let backend = Self::default();
        backend.inner.lock().memory_limit = Some(limit);
        backend
    }

    /// Bytes currently allocated.
    pub fn allocated_bytes(&self) -> u64 {
        self.inner.lock().allocated
    }

    pub fn draws(&self) -> Vec<RecordedDraw> {
        self.inner.lock().draws.clone()
    }

    /// Submissions accepted but not yet completed.
    pub fn pending_completions(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// The next `submit` returns `err` and drops its completion.
    pub fn reject_next_submit(&self, err: SubmissionError) {
        self.inner.lock().reject_next = Some(err);
    }

    /// Completes the oldest pending submission successfully.
    ///
    /// Returns `false` when nothing is pending.
    pub fn complete_next(&self) -> bool {
        self.finish_next(Ok(()))
    }

    /// Completes the oldest pending submission with `err`.
    pub fn fail_next(&self, err: SubmissionError) -> bool {
        self.finish_next(Err(err))
    }

    /// Completes every pending submission successfully; returns how many.
    pub fn complete_all(&self) -> usize {
        let mut n = 0;
        while self.complete_next() {
            n += 1;
        }
        n
    }

    fn finish_next(&self, result: Result<(), SubmissionError>) -> bool {
        // Pop under the lock, run the callback outside of it.
        let next = self.inner.lock().pending.pop_front();
        match next {
            Some(completion) => {
                completion.complete(result);
                true
            }
            None => false,
        }
    }
}

/// Pipeline handle for [`RecordingBackend`]: a label and the vertex layout it
/// accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPipeline {
    pub label: String,
    pub vertex_format: VertexFormat,
}

impl RecordedPipeline {
    pub fn new(label: impl Into<String>, vertex_format: VertexFormat) -> Self {
        Self {
            label: label.into(),
            vertex_format,
        }
    }
}

/// Material handle for [`RecordingBackend`]; only the label is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMaterial(pub String);

impl Backend for RecordingBackend {
    type Buffer = RecordedBuffer;
    type Pipeline = RecordedPipeline;
    type Material = RecordedMaterial;
    type Target = str;

    fn allocate_buffer(&self, request: &BufferRequest<'_>) -> Result<RecordedBuffer, AllocationError> {
        let mut inner = self.inner.lock();

        if let Some(limit) = inner.memory_limit {
            if inner.allocated + request.size > limit {
                return Err(AllocationError::new(
                    request.label,
                    request.size,
                    format!("memory limit of {limit} bytes exceeded"),
                ));
            }
        }

        inner.allocated += request.size;
        let id = inner.next_id;
        inner.next_id += 1;

        Ok(RecordedBuffer {
            id,
            label: request.label.to_string(),
            cpu_writable: request.cpu_writable,
            data: Arc::new(Mutex::new(vec![0u8; request.size as usize])),
        })
    }

    fn allocate_immutable_buffer(
        &self,
        label: &str,
        bytes: &[u8],
    ) -> Result<RecordedBuffer, AllocationError> {
        let buffer = self.allocate_buffer(&BufferRequest {
            label,
            size: bytes.len() as u64,
            cpu_writable: false,
        })?;
        buffer.data.lock().copy_from_slice(bytes);
        Ok(buffer)
    }

    fn write_buffer(&self, buffer: &RecordedBuffer, offset: u64, bytes: &[u8]) {
        assert!(buffer.cpu_writable, "write into immutable buffer `{}`", buffer.label);
        let offset = offset as usize;
        buffer.data.lock()[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn submit(
        &self,
        target: &str,
        draw: DrawCall<'_, Self>,
        on_complete: Completion,
    ) -> Result<(), SubmissionError> {
        draw.check_against(draw.pipeline.vertex_format)?;

        let mut inner = self.inner.lock();

        if let Some(err) = inner.reject_next.take() {
            drop(inner);
            drop(on_complete);
            return Err(err);
        }

        inner.draws.push(RecordedDraw {
            label: draw.label.to_string(),
            target: target.to_string(),
            pipeline: draw.pipeline.label.clone(),
            vertex_buffer: draw.vertex_buffer.id,
            uniform_buffer: draw.uniforms.id,
            uniforms: draw.uniforms.data.lock().clone(),
            material: draw.material.map(|m| m.0.clone()),
            load: draw.load,
            vertex_count: draw.vertex_count,
            instance_count: draw.instance_count,
        });
        inner.pending.push_back(on_complete);

        Ok(())
    }
}
