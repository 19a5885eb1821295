use crate::config::PipelineConfig;
use crate::mesh::VertexFormat;
use crate::provider::MIN_SLOT_SIZE;

fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

/// Compiled pipeline plus the bind group layouts draws are built against.
///
/// | Group | Binding | Stage    | Resource                          |
/// |-------|---------|----------|-----------------------------------|
/// | 0     | 0       | vertex   | uniform slot (model-view, proj.)  |
/// | 1     | 0       | fragment | texture view (textured only)      |
/// | 1     | 1       | fragment | sampler (textured only)           |
pub struct NodePipeline {
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    material_layout: Option<wgpu::BindGroupLayout>,
    vertex_format: VertexFormat,
}

impl NodePipeline {
    pub fn new(device: &wgpu::Device, vertex_format: VertexFormat, config: &PipelineConfig) -> Self {
        let (name, shader_src) = match vertex_format {
            VertexFormat::Colored => ("colored", include_str!("shaders/colored.wgsl")),
            VertexFormat::Textured => ("textured", include_str!("shaders/textured.wgsl")),
        };

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("triframe {name} shader")),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("triframe uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(MIN_SLOT_SIZE),
                },
                count: None,
            }],
        });

        let material_layout = (vertex_format == VertexFormat::Textured).then(|| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("triframe material bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            })
        });

        let mut bind_group_layouts = vec![&uniform_layout];
        if let Some(layout) = material_layout.as_ref() {
            bind_group_layouts.push(layout);
        }

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("triframe {name} pipeline layout")),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("triframe {name} pipeline")),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_format.layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.color_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: config.front_face,
                cull_mode: config.cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("created {name} pipeline for {:?}", config.color_format);

        Self {
            pipeline,
            uniform_layout,
            material_layout,
            vertex_format,
        }
    }

    #[inline]
    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    #[inline]
    pub fn uniform_layout(&self) -> &wgpu::BindGroupLayout {
        &self.uniform_layout
    }

    /// Layout of group 1; `None` for the vertex-color variant.
    #[inline]
    pub fn material_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.material_layout.as_ref()
    }

    #[inline]
    pub fn vertex_format(&self) -> VertexFormat {
        self.vertex_format
    }
}
