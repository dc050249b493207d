use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Flat-shade parameters used when a renderer computes its own shade.
pub struct LightingOptions {
    /// Direction toward the light in screen space (+z toward viewer).
    #[schemars(skip)]
    pub light_direction: [f32; 3],
    /// Ambient floor.
    #[schemars(title = "Ambient", range(min = 0.0, max = 0.7), extend("step" = 0.01))]
    pub ambient: f32,
    /// Diffuse contribution.
    #[schemars(title = "Diffuse", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub diffuse: f32,
    /// Number of discrete shade levels.
    #[schemars(skip)]
    pub shade_levels: u8,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            light_direction: [-1.0, -1.0, 2.0],
            ambient: 0.45,
            diffuse: 0.84,
            shade_levels: 64,
        }
    }
}
