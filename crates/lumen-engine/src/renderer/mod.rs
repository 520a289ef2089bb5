//! The renderer: device lifecycle, registries and the per-frame cycle.

mod constants;
mod ctx;
mod engine;
mod error;
mod frame;
mod pipeline;
mod registry;

pub use constants::{
    CbChangeOnCameraMovement, CbChangeOnResize, CbChangesEveryFrame, CbLights, CAMERA_BINDING,
    FRAME_GROUP, LIGHTS_BINDING, MATERIAL_GROUP, OBJECT_BINDING, OBJECT_GROUP, RESIZE_BINDING,
    SAMPLER_BINDING, TEXTURE_BINDING,
};
pub use ctx::{BindLayouts, GpuCtx};
pub use engine::{Renderer, UpdateStage};
pub use error::RegistryError;
pub use frame::{FrameData, FramePlan};
pub use registry::{Name, Registry};
