use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::TextureError;

/// Decoded RGBA8 image, rows stored top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureImage {
    /// Reads and decodes an image file (PNG, JPEG or BMP).
    pub fn open(path: impl AsRef<Path>, flip_vertically: bool) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let image = Self::decode(&bytes, flip_vertically)?;
        log::debug!("decoded {} ({}x{})", path.display(), image.width, image.height);
        Ok(image)
    }

    /// Decodes an in-memory encoded image, converting it to RGBA8.
    pub fn decode(bytes: &[u8], flip_vertically: bool) -> Result<Self, TextureError> {
        let mut rgba = image::load_from_memory(bytes)?.to_rgba8();
        if flip_vertically {
            imageops::flip_vertical_in_place(&mut rgba);
        }
        Ok(Self::from_image(rgba))
    }

    /// Wraps raw RGBA8 pixels; `pixels.len()` must equal `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 || pixels.len() != width as usize * height as usize * 4 {
            return Err(TextureError::InvalidPixels {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Two-color checkerboard with square cells of `cell` pixels.
    pub fn checkerboard(size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let cell = cell.max(1);
        let rgba = RgbaImage::from_fn(size.max(1), size.max(1), |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                image::Rgba(a)
            } else {
                image::Rgba(b)
            }
        });
        Self::from_image(rgba)
    }

    fn from_image(rgba: RgbaImage) -> Self {
        Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// `floor(log2(max(w, h))) + 1`: levels down to and including 1×1.
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).leading_zeros()
    }

    /// Every mip level, starting with a copy of this image.
    ///
    /// Level `l` is `max(width >> l, 1)` × `max(height >> l, 1)`, filtered from
    /// level `l - 1`.
    pub fn mip_chain(&self) -> Vec<TextureImage> {
        let levels = self.mip_level_count();
        let mut chain = Vec::with_capacity(levels as usize);
        chain.push(self.clone());

        for level in 1..levels {
            let prev = &chain[level as usize - 1];
            let Some(src) = RgbaImage::from_raw(prev.width, prev.height, prev.pixels.clone()) else {
                break;
            };
            let w = (self.width >> level).max(1);
            let h = (self.height >> level).max(1);
            chain.push(Self::from_image(imageops::resize(&src, w, h, FilterType::Triangle)));
        }

        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32) -> TextureImage {
        TextureImage::from_rgba(w, h, vec![255; (w * h * 4) as usize]).unwrap()
    }

    // ── mip chain ─────────────────────────────────────────────────────────

    #[test]
    fn mip_level_count_reaches_one_by_one() {
        assert_eq!(solid(1, 1).mip_level_count(), 1);
        assert_eq!(solid(256, 256).mip_level_count(), 9);
        assert_eq!(solid(300, 20).mip_level_count(), 9);
    }

    #[test]
    fn mip_chain_halves_each_axis_independently() {
        let dims: Vec<_> = solid(8, 2)
            .mip_chain()
            .iter()
            .map(|m| (m.width(), m.height()))
            .collect();
        assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
    }

    #[test]
    fn mip_levels_keep_rgba_size_and_color() {
        for level in solid(16, 16).mip_chain() {
            assert_eq!(level.pixels().len(), (level.width() * level.height() * 4) as usize);
            assert!(level.pixels().iter().all(|&p| p == 255));
        }
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn from_rgba_rejects_wrong_length() {
        let err = TextureImage::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, TextureError::InvalidPixels { len: 15, .. }));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            TextureImage::decode(b"not an image", false),
            Err(TextureError::Decode(_))
        ));
    }

    #[test]
    fn decode_png_and_flip() {
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let upright = TextureImage::decode(&png, false).unwrap();
        assert_eq!(&upright.pixels()[..4], &[255, 0, 0, 255]);

        let flipped = TextureImage::decode(&png, true).unwrap();
        assert_eq!(&flipped.pixels()[..4], &[0, 0, 255, 255]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = TextureImage::open("/definitely/not/here.png", false).unwrap_err();
        assert!(err.to_string().contains("not/here.png"));
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let img = TextureImage::checkerboard(4, 2, [0, 0, 0, 255], [255, 255, 255, 255]);
        let px = |x: u32, y: u32| {
            let i = ((y * 4 + x) * 4) as usize;
            img.pixels()[i]
        };
        assert_eq!(px(0, 0), 0);
        assert_eq!(px(2, 0), 255);
        assert_eq!(px(2, 2), 0);
    }
}
