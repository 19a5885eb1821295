use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read texture file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode texture image")]
    Decode(#[from] image::ImageError),

    #[error("pixel buffer of {len} bytes does not match {width}x{height} RGBA8")]
    InvalidPixels { width: u32, height: u32, len: usize },

    #[error("{width}x{height} texture exceeds the device limit of {max} texels per side")]
    TooLarge { width: u32, height: u32, max: u32 },
}
