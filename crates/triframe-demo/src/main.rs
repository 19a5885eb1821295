use std::path::PathBuf;

use anyhow::{Context, Result};
use triframe_engine::backend::{WgpuBackend, WgpuMaterial};
use triframe_engine::config::{NodeConfig, PipelineConfig, ProjectionConfig};
use triframe_engine::core::{App, AppControl, FrameCtx, RenderCtx, WindowCtx};
use triframe_engine::device::GpuInit;
use triframe_engine::input::{InputEvent, Key, PanGesture};
use triframe_engine::logging::{init_logging, LoggingConfig};
use triframe_engine::math::Matrix4;
use triframe_engine::mesh::{cube, VertexFormat};
use triframe_engine::node::{RenderNode, Scene};
use triframe_engine::pipeline::NodePipeline;
use triframe_engine::texture::{default_sampler, Texture, TextureImage, TextureOptions};
use triframe_engine::window::{Runtime, RuntimeConfig};

/// GPU-side state, built on the first frame once a device exists.
struct CubeScene {
    pipeline: NodePipeline,
    scene: Scene<WgpuBackend>,
    projection: Matrix4,
    projection_size: (u32, u32),
}

struct CubeDemo {
    texture_path: Option<PathBuf>,
    projection: ProjectionConfig,
    pan: PanGesture,
    gpu: Option<CubeScene>,
}

impl CubeDemo {
    fn new(texture_path: Option<PathBuf>) -> Self {
        Self {
            texture_path,
            projection: ProjectionConfig::default(),
            pan: PanGesture::default(),
            gpu: None,
        }
    }

    fn build(&self, rctx: &RenderCtx<'_>) -> Result<CubeScene> {
        let device = rctx.device();

        let texture = match &self.texture_path {
            Some(path) => Texture::load(device, rctx.queue(), path, TextureOptions::default())
                .with_context(|| format!("failed to load texture {}", path.display()))?,
            None => {
                let image = TextureImage::checkerboard(256, 32, [230, 230, 230, 255], [40, 40, 48, 255]);
                Texture::upload(device, rctx.queue(), "checkerboard", &image, true)
                    .context("failed to upload checkerboard texture")?
            }
        };
        let material = WgpuMaterial::new(texture.view().clone(), default_sampler(device));

        let pipeline = NodePipeline::new(
            device,
            VertexFormat::Textured,
            &PipelineConfig::new(rctx.surface_format),
        );

        let mut world = Matrix4::identity();
        world.translate(0.0, 0.0, -4.0).rotate_around_x(25f32.to_radians());

        let mut scene = Scene::new(world);
        let node = RenderNode::new(rctx.backend, "cube", &cube(1.0), Some(material), &NodeConfig::default())
            .context("failed to create cube node")?;
        scene.push(node);

        let size = (rctx.size.width, rctx.size.height);
        Ok(CubeScene {
            pipeline,
            scene,
            projection: self.projection.matrix_for_size(size.0, size.1),
            projection_size: size,
        })
    }
}

impl App for CubeDemo {
    fn on_input(&mut self, event: &InputEvent, window: &WindowCtx<'_>) -> AppControl {
        if let InputEvent::Key {
            key: Key::Escape,
            pressed: true,
            ..
        } = event
        {
            return AppControl::Exit;
        }

        if let Some(delta) = self.pan.handle(event, window.logical_size()) {
            if let Some(node) = self.gpu.as_mut().and_then(|g| g.scene.node_mut(0)) {
                delta.apply(node.transform_mut());
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if let Some(gpu) = self.gpu.as_mut() {
            gpu.scene.update(ctx.time.dt);
        }

        ctx.render(|rctx| {
            if self.gpu.is_none() {
                match self.build(rctx) {
                    Ok(scene) => self.gpu = Some(scene),
                    Err(e) => {
                        log::error!("{e:#}");
                        return AppControl::Exit;
                    }
                }
            }
            let Some(gpu) = self.gpu.as_mut() else {
                return AppControl::Exit;
            };

            let size = (rctx.size.width, rctx.size.height);
            if size != gpu.projection_size {
                gpu.projection = self.projection.matrix_for_size(size.0, size.1);
                gpu.projection_size = size;
            }

            match gpu
                .scene
                .render(rctx.backend, &gpu.pipeline, rctx.target, &gpu.projection, None)
            {
                Ok(()) => match gpu.scene.nodes().iter().find_map(|n| n.take_completion_error()) {
                    Some(e) => {
                        log::error!("GPU submission failed: {e}");
                        AppControl::Exit
                    }
                    None => AppControl::Continue,
                },
                Err(e) if e.is_backpressure_timeout() => {
                    log::warn!("frame dropped: {e}");
                    AppControl::Continue
                }
                Err(e) => {
                    log::error!("render failed: {e}");
                    AppControl::Exit
                }
            }
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let texture_path = std::env::args_os().nth(1).map(PathBuf::from);
    if texture_path.is_none() {
        log::info!("no texture path given; using a checkerboard");
    }

    let config = RuntimeConfig {
        title: "triframe cube".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), CubeDemo::new(texture_path))
}
