use super::constants::{CbChangeOnCameraMovement, CbChangesEveryFrame, CbLights};
use super::pipeline::PipelineKey;
use super::registry::Name;
use crate::light::{PointLight, NUM_LIGHTS};

/// Every constant-buffer payload of one frame, computed without touching the GPU.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    pub camera: CbChangeOnCameraMovement,
    pub lights: CbLights,
    /// Per-renderable payloads in registry order.
    pub objects: Vec<(Name, CbChangesEveryFrame)>,
}

/// What one call to `render` uploads and draws, decided before any GPU work.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub data: FrameData,
    /// Drawable renderables in registry order, with their pipeline.
    pub(crate) draws: Vec<(Name, PipelineKey)>,
    /// Renderables left out and why.
    pub skipped: Vec<(Name, String)>,
}

impl FramePlan {
    pub fn drawn(&self) -> impl Iterator<Item = &Name> {
        self.draws.iter().map(|(name, _)| name)
    }
}

/// Packs the light slots; unpopulated slots are zero (black, at the origin).
pub(crate) fn pack_lights(slots: &[Option<PointLight>; NUM_LIGHTS]) -> CbLights {
    let mut cb = CbLights {
        light_positions: [[0.0; 4]; NUM_LIGHTS],
        light_colors: [[0.0; 4]; NUM_LIGHTS],
    };
    for (i, light) in slots.iter().enumerate() {
        if let Some(light) = light {
            cb.light_positions[i] = light.position().to_array();
            cb.light_colors[i] = light.color().to_array();
        }
    }
    cb
}
