use std::path::Path;

use super::{TextureError, TextureImage};

/// Upload options.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureOptions {
    /// Reverse row order after decoding.
    pub flip_vertically: bool,

    /// Upload the full mip chain instead of level 0 only.
    pub mipmapped: bool,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            flip_vertically: false,
            mipmapped: true,
        }
    }
}

/// A sampled 2-D texture living on the device.
pub struct Texture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl Texture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Decodes `path` and uploads it.
    pub fn load(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        options: TextureOptions,
    ) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = TextureImage::open(path, options.flip_vertically)?;
        let label = path.display().to_string();
        Self::upload(device, queue, &label, &image, options.mipmapped)
    }

    /// Creates the texture and writes level 0 (and every mip level when
    /// `mipmapped`).
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        image: &TextureImage,
        mipmapped: bool,
    ) -> Result<Self, TextureError> {
        let max = device.limits().max_texture_dimension_2d;
        if image.width() > max || image.height() > max {
            return Err(TextureError::TooLarge {
                width: image.width(),
                height: image.height(),
                max,
            });
        }

        let levels = if mipmapped {
            image.mip_chain()
        } else {
            vec![image.clone()]
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width(),
                height: image.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level.pixels(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(level.width() * 4),
                    rows_per_image: Some(level.height()),
                },
                wgpu::Extent3d {
                    width: level.width(),
                    height: level.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        log::info!(
            "texture `{label}`: {}x{}, mip count {}",
            image.width(),
            image.height(),
            levels.len()
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self { texture, view })
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn raw(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub fn mip_level_count(&self) -> u32 {
        self.texture.mip_level_count()
    }
}

/// Nearest filtering on every axis, clamped to edge, all mip levels usable.
pub fn default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("triframe default sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        lod_min_clamp: 0.0,
        lod_max_clamp: f32::MAX,
        ..Default::default()
    })
}
