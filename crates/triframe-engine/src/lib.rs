//! triframe engine crate.
//!
//! Renders a flat list of textured 3-D nodes with wgpu. Each node rotates a
//! small ring of uniform slots guarded by a token pool, so the CPU can prepare
//! the next frames while the GPU still reads earlier ones, without ever
//! rewriting a slot that is in flight.
//!
//! The node pipeline (`math`, `mesh`, `sync`, `provider`, `node`) only talks
//! to the GPU through [`backend::Backend`]; `device`, `window`, `core`,
//! `texture` and `pipeline` provide the wgpu/winit side.

pub mod backend;
pub mod color;
pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod input;
pub mod logging;
pub mod math;
pub mod mesh;
pub mod node;
pub mod pipeline;
pub mod provider;
pub mod sync;
pub mod texture;
pub mod time;
pub mod window;
