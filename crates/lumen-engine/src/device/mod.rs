//! GPU device and swap-chain management.
//!
//! This module is responsible for:
//! - picking an adapter by driver type and a device by feature level
//! - creating and configuring the surface (swap chain) once per window
//! - the depth-stencil target sized to the client area
//! - acquiring frames and presenting them

mod context;
mod depth;
mod driver;
mod error;
mod frame;
mod init;
mod swap_chain;
mod window;

pub use context::Gpu;
pub use depth::{DepthTarget, DEPTH_FORMAT};
pub use driver::{DriverType, FeatureLevel};
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::RendererInit;
pub use swap_chain::SwapChainPath;
pub use window::RenderWindow;
