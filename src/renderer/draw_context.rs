//! Per-frame state lent to every renderer.

use crate::camera::Projection;
use crate::g3d::{Graphics3D, Lighting, ScreenPool};
use crate::model::MolecularModel;
use crate::options::Options;

/// Everything a renderer reads during one frame.
pub struct RenderContext<'a> {
    /// Camera transform.
    pub projection: &'a dyn Projection,
    /// Drawing backend.
    pub g3d: &'a mut dyn Graphics3D,
    /// The molecule.
    pub model: &'a MolecularModel,
    /// Current options.
    pub options: &'a Options,
    /// Scratch screen buffers.
    pub pool: &'a ScreenPool,
    /// Flat shading for geo-surface faces.
    pub lighting: &'a Lighting,
}
