use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::backend::WgpuBackend;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::time::FrameTime;

use super::app::AppControl;

/// Borrowed window handle with size helpers.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size as `(width, height)` in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        let phys = self.window.inner_size();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(self.window.scale_factor());
        (logi.width as f32, logi.height as f32)
    }
}

/// What a draw closure gets for one acquired frame.
pub struct RenderCtx<'a> {
    pub backend: &'a WgpuBackend,
    /// Color target of the acquired surface texture.
    pub target: &'a wgpu::TextureView,
    pub surface_format: wgpu::TextureFormat,
    /// Drawable size in physical pixels.
    pub size: PhysicalSize<u32>,
}

impl RenderCtx<'_> {
    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        self.backend.device()
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        self.backend.queue()
    }
}

/// Per-frame context passed to [`App::on_frame`](super::App::on_frame).
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// Acquires a surface frame, runs `draw` against it, then presents.
    ///
    /// Surface errors skip the frame (after reconfiguring when needed); a fatal
    /// one returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>) -> AppControl,
    {
        let frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => AppControl::Exit,
                    _ => AppControl::Continue,
                };
            }
        };

        let control = {
            let rctx = RenderCtx {
                backend: self.gpu.backend(),
                target: &frame.view,
                surface_format: self.gpu.surface_format(),
                size: self.gpu.size(),
            };
            draw(&rctx)
        };

        self.window.window.pre_present_notify();
        self.gpu.present(frame);

        control
    }
}
