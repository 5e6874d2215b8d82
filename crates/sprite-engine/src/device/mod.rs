//! GPU device and window swapchain.
//!
//! `Gpu` requests the adapter and device for a window, configures its
//! surface and hands out one `GpuFrame` per redraw.

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
