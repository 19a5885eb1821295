//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - wrapping device and queue in the node pipeline's [`WgpuBackend`](crate::backend::WgpuBackend)
//! - creating & configuring the Surface and acquiring/presenting frames

mod frame;
mod gpu;
mod init;
mod surface;

pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
