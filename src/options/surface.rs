use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Surface", inline)]
#[serde(default)]
/// Dot and geodesic surface parameters.
pub struct SurfaceOptions {
    /// Solvent probe radius in angstroms; 0 gives van der Waals dots.
    #[schemars(title = "Probe Radius", range(min = 0.0, max = 3.0), extend("step" = 0.1))]
    pub probe_radius: f32,
    /// Geodesic tessellation level (0..=4).
    #[schemars(title = "Geodesic Level", range(min = 0, max = 4))]
    pub geodesic_level: u8,
    /// While in motion, shapes with more dots than this draw points only.
    #[schemars(skip)]
    pub motion_dot_threshold: usize,
    /// Face-completion passes on geo-surface maps; stops early once a pass
    /// changes nothing.
    #[schemars(skip)]
    pub max_completion_passes: usize,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            probe_radius: 1.2,
            geodesic_level: 3,
            motion_dot_threshold: 2000,
            max_completion_passes: 2,
        }
    }
}
