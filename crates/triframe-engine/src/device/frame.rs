/// One acquired swapchain image.
///
/// Nodes submit their own command buffers against `view`; the frame is shown
/// by [`Gpu::present`](super::Gpu::present). Holding it blocks acquisition of
/// the next frame, so present promptly.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}
