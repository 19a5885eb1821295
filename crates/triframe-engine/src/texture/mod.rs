//! Texture loading.
//!
//! Images are decoded to RGBA8 on the CPU ([`TextureImage`]), their mip chain
//! is generated by repeated halving, and every level is uploaded once
//! ([`Texture`]). The resulting view and [`default_sampler`] form a node's
//! material.

mod decode;
mod error;
mod gpu;

pub use decode::TextureImage;
pub use error::TextureError;
pub use gpu::{default_sampler, Texture, TextureOptions};
