//! Lumen engine crate.
//!
//! A small forward renderer over wgpu: a name-keyed scene of renderables and
//! shaders, point lights, a first-person camera and the winit game loop that
//! drives them.

pub mod camera;
pub mod device;
pub mod game;
pub mod input;
pub mod light;
pub mod logging;
pub mod math;
pub mod renderable;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod time;

pub use camera::Camera;
pub use device::{DriverType, FeatureLevel, RenderWindow, RendererInit, SwapChainPath};
pub use game::{Game, GameConfig};
pub use light::{PointLight, NUM_LIGHTS};
pub use renderable::{Material, Renderable};
pub use renderer::{FramePlan, Name, RegistryError, Renderer, UpdateStage};
pub use shader::{PixelShader, ShaderSource, VertexShader};
pub use texture::Texture;
