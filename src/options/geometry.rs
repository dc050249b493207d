use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Hermite level ceiling.
pub const MAX_HERMITE_LEVEL: u8 = 8;
/// Ribbon aspect ratio ceiling.
pub const MAX_ASPECT_RATIO: f32 = 20.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Geometry", inline)]
#[serde(default)]
/// Spline and mesh detail options for polymer shapes.
pub struct GeometryOptions {
    /// Hermite subdivision level; 0 disables mesh segments.
    #[schemars(title = "Hermite Level", range(min = 0, max = 8))]
    pub hermite_level: u8,
    /// Ribbon width : thickness ratio; 0 disables mesh segments.
    #[schemars(title = "Aspect Ratio", range(min = 0.0, max = 20.0), extend("step" = 1.0))]
    pub aspect_ratio: f32,
    /// Build meshes even for thin segments.
    #[schemars(title = "High Resolution")]
    pub high_resolution: bool,
    /// Use lead atoms (alpha carbons) as control points instead of midpoints.
    #[schemars(title = "Trace Alpha")]
    pub trace_alpha: bool,
    /// Outline ribbons and arrowheads.
    #[schemars(title = "Ribbon Border")]
    pub ribbon_border: bool,
    /// Draw cartoon helices as cylinders.
    #[schemars(title = "Cartoon Rockets")]
    pub cartoon_rockets: bool,
    /// How far sheet control points are pulled toward midpoints (0..1).
    #[schemars(title = "Sheet Smoothing", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub sheet_smoothing: f32,
    /// Number of parallel strands drawn by the strands shape.
    #[schemars(skip)]
    pub strand_count: u8,
}

impl GeometryOptions {
    /// Hermite level clamped to `0..=8`.
    #[must_use]
    pub fn clamped_hermite_level(&self) -> usize {
        usize::from(self.hermite_level.min(MAX_HERMITE_LEVEL))
    }

    /// Aspect ratio clamped to `0..=20`; forced to 0 when the hermite level
    /// is 0.
    #[must_use]
    pub fn effective_aspect_ratio(&self) -> f32 {
        if self.clamped_hermite_level() == 0 || !self.aspect_ratio.is_finite()
        {
            return 0.0;
        }
        self.aspect_ratio.clamp(0.0, MAX_ASPECT_RATIO)
    }
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            hermite_level: 0,
            aspect_ratio: 16.0,
            high_resolution: false,
            trace_alpha: true,
            ribbon_border: false,
            cartoon_rockets: false,
            sheet_smoothing: 1.0,
            strand_count: 5,
        }
    }
}
