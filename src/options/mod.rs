//! Centralized rendering/display options with TOML preset support.
//!
//! Every setting that influences derived geometry (spline detail, surface
//! probe, bond striping) or how it is drawn (camera, shading, palettes) is
//! consolidated here. Options serialize to/from TOML view presets.

mod camera;
mod colors;
mod display;
mod geometry;
mod lighting;
mod surface;

use std::path::Path;

pub use camera::CameraOptions;
pub use colors::ColorOptions;
pub use display::{DisplayOptions, MultipleBondMode};
pub use geometry::{GeometryOptions, MAX_ASPECT_RATIO, MAX_HERMITE_LEVEL};
pub use lighting::LightingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use surface::SurfaceOptions;

use crate::error::ShapeError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[geometry]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Selection and display toggles.
    pub display: DisplayOptions,
    /// Spline and mesh detail.
    pub geometry: GeometryOptions,
    /// Dot surface parameters.
    pub surface: SurfaceOptions,
    /// Camera projection parameters.
    pub camera: CameraOptions,
    /// Flat shading parameters.
    pub lighting: LightingOptions,
    /// Color palette options.
    #[schemars(skip)]
    pub colors: ColorOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ShapeError> {
        let content = std::fs::read_to_string(path).map_err(ShapeError::Io)?;
        toml::from_str(&content)
            .map_err(|e| ShapeError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ShapeError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShapeError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ShapeError::Io)?;
        }
        std::fs::write(path, content).map_err(ShapeError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
