use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Sender, TrySendError};
use parking_lot::Mutex;
use wgpu::util::DeviceExt;

use crate::error::{AllocationError, SubmissionError};
use crate::pipeline::NodePipeline;

use super::{Backend, BufferRequest, ColorLoad, Completion, DrawCall};

/// Submissions the poller may have queued before `submit` blocks.
const POLLER_QUEUE_DEPTH: usize = 64;

/// Texture view + sampler bound at group 1 of the textured pipeline.
#[derive(Debug, Clone)]
pub struct WgpuMaterial {
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl WgpuMaterial {
    pub fn new(view: wgpu::TextureView, sampler: wgpu::Sampler) -> Self {
        Self { view, sampler }
    }
}

/// [`Backend`] over a wgpu device and queue.
///
/// Each draw is encoded into its own command buffer and submitted right away.
/// Completions are handed to a poller thread that waits on the submission
/// index and then runs the callback, so the frame thread never polls.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    lost: Arc<Mutex<Option<String>>>,
    poller: CompletionPoller,
}

impl WgpuBackend {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> std::io::Result<Self> {
        let lost = Arc::new(Mutex::new(None));
        {
            let lost = Arc::clone(&lost);
            device.set_device_lost_callback(move |reason, message| {
                log::error!("wgpu device lost ({reason:?}): {message}");
                *lost.lock() = Some(message);
            });
        }

        let poller = CompletionPoller::spawn(device.clone())?;

        Ok(Self {
            device,
            queue,
            lost,
            poller,
        })
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn check_size(&self, label: &str, size: u64, uniform: bool) -> Result<(), AllocationError> {
        let limits = self.device.limits();

        if size > limits.max_buffer_size {
            return Err(AllocationError::new(
                label,
                size,
                format!("exceeds max_buffer_size ({})", limits.max_buffer_size),
            ));
        }
        if uniform && size > u64::from(limits.max_uniform_buffer_binding_size) {
            return Err(AllocationError::new(
                label,
                size,
                format!(
                    "exceeds max_uniform_buffer_binding_size ({})",
                    limits.max_uniform_buffer_binding_size
                ),
            ));
        }
        Ok(())
    }
}

impl Backend for WgpuBackend {
    type Buffer = wgpu::Buffer;
    type Pipeline = NodePipeline;
    type Material = WgpuMaterial;
    type Target = wgpu::TextureView;

    fn allocate_buffer(&self, request: &BufferRequest<'_>) -> Result<wgpu::Buffer, AllocationError> {
        self.check_size(request.label, request.size, true)?;

        let mut usage = wgpu::BufferUsages::UNIFORM;
        if request.cpu_writable {
            usage |= wgpu::BufferUsages::COPY_DST;
        }

        Ok(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(request.label),
            size: request.size,
            usage,
            mapped_at_creation: false,
        }))
    }

    fn allocate_immutable_buffer(
        &self,
        label: &str,
        bytes: &[u8],
    ) -> Result<wgpu::Buffer, AllocationError> {
        self.check_size(label, bytes.len() as u64, false)?;

        Ok(self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytes,
            usage: wgpu::BufferUsages::VERTEX,
        }))
    }

    fn write_buffer(&self, buffer: &wgpu::Buffer, offset: u64, bytes: &[u8]) {
        self.queue.write_buffer(buffer, offset, bytes);
    }

    fn submit(
        &self,
        target: &wgpu::TextureView,
        draw: DrawCall<'_, Self>,
        on_complete: Completion,
    ) -> Result<(), SubmissionError> {
        if let Some(message) = self.lost.lock().clone() {
            return Err(SubmissionError::DeviceLost(message));
        }

        let pipeline = draw.pipeline;
        draw.check_against(pipeline.vertex_format())?;

        let material_group = match (pipeline.material_layout(), draw.material) {
            (Some(layout), Some(material)) => Some(self.device.create_bind_group(
                &wgpu::BindGroupDescriptor {
                    label: Some("triframe material bind group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&material.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&material.sampler),
                        },
                    ],
                },
            )),
            _ => None,
        };

        let uniform_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("triframe uniform bind group"),
            layout: pipeline.uniform_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: draw.uniforms.as_entire_binding(),
            }],
        });

        let load = match draw.load {
            ColorLoad::Clear(color) => wgpu::LoadOp::Clear(color.to_wgpu()),
            ColorLoad::Load => wgpu::LoadOp::Load,
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(draw.label),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(draw.label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline.raw());
            rpass.set_bind_group(0, &uniform_group, &[]);
            if let Some(group) = material_group.as_ref() {
                rpass.set_bind_group(1, group, &[]);
            }
            rpass.set_vertex_buffer(0, draw.vertex_buffer.slice(..));
            rpass.draw(0..draw.vertex_count, 0..draw.instance_count);
        }

        let index = self.queue.submit(std::iter::once(encoder.finish()));
        self.poller.watch(&self.device, index, on_complete);

        Ok(())
    }
}

/// Background thread that turns submission indices into completion callbacks.
struct CompletionPoller {
    tx: Option<Sender<(wgpu::SubmissionIndex, Completion)>>,
    thread: Option<JoinHandle<()>>,
}

impl CompletionPoller {
    fn spawn(device: wgpu::Device) -> std::io::Result<Self> {
        let (tx, rx) = crossbeam_channel::bounded::<(wgpu::SubmissionIndex, Completion)>(
            POLLER_QUEUE_DEPTH,
        );

        let thread = std::thread::Builder::new()
            .name("triframe-completions".into())
            .spawn(move || {
                for (index, completion) in rx {
                    completion.complete(wait_for(&device, index));
                }
                log::debug!("completion poller stopped");
            })?;

        Ok(Self {
            tx: Some(tx),
            thread: Some(thread),
        })
    }

    fn watch(&self, device: &wgpu::Device, index: wgpu::SubmissionIndex, completion: Completion) {
        let Some(tx) = self.tx.as_ref() else {
            completion.complete(wait_for(device, index));
            return;
        };

        let (index, completion) = match tx.try_send((index, completion)) {
            Ok(()) => return,
            Err(TrySendError::Full(msg)) => {
                log::trace!("completion queue full; waiting for the poller");
                match tx.send(msg) {
                    Ok(()) => return,
                    Err(err) => err.into_inner(),
                }
            }
            Err(TrySendError::Disconnected(msg)) => msg,
        };

        // Poller is gone; the slot must still not be reused before the GPU is done.
        log::warn!("completion poller unavailable; waiting inline");
        completion.complete(wait_for(device, index));
    }
}

impl Drop for CompletionPoller {
    fn drop(&mut self) {
        // Closing the channel lets the thread drain what is queued and exit.
        drop(self.tx.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("completion poller panicked");
            }
        }
    }
}

fn wait_for(device: &wgpu::Device, index: wgpu::SubmissionIndex) -> Result<(), SubmissionError> {
    device
        .poll(wgpu::PollType::Wait {
            submission_index: Some(index),
            timeout: None,
        })
        .map(|_| ())
        .map_err(|e| SubmissionError::Poll(e.to_string()))
}
