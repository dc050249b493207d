//! Lazily constructed renderers and the frame pass.

use super::ShapeManager;
use crate::camera::Projection;
use crate::error::ShapeError;
use crate::g3d::{Graphics3D, Lighting};
use crate::renderer::{RenderContext, Renderer, RendererRegistry};
use crate::shape::ShapeKind;

/// Factory registry plus one renderer slot per kind.
#[derive(Default)]
pub(crate) struct Renderers {
    registry: RendererRegistry,
    slots: [Option<Box<dyn Renderer>>; ShapeKind::COUNT],
}

impl Renderers {
    /// The renderer for `kind`, constructing it on first use. A failed
    /// construction leaves the slot empty so the next call tries again.
    fn get(&mut self, kind: ShapeKind) -> Result<&mut (dyn Renderer + 'static), ShapeError> {
        let slot = &mut self.slots[kind.index()];
        if slot.is_none() {
            *slot = Some(self.registry.create(kind)?);
            log::debug!("constructed renderer for {kind}");
        }
        slot.as_deref_mut().ok_or(ShapeError::RendererUnavailable(kind))
    }
}

impl std::fmt::Debug for Renderers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let constructed: Vec<ShapeKind> = ShapeKind::ALL
            .into_iter()
            .filter(|k| self.slots[k.index()].is_some())
            .collect();
        f.debug_struct("Renderers")
            .field("registry", &self.registry)
            .field("constructed", &constructed)
            .finish()
    }
}

/// Outcome of one [`ShapeManager::render_frame`] pass, each list in
/// painter's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Kinds whose renderer ran to completion.
    pub rendered: Vec<ShapeKind>,
    /// Kinds with no loaded shape.
    pub skipped: Vec<ShapeKind>,
    /// Kinds whose renderer was unavailable or returned an error.
    pub failed: Vec<ShapeKind>,
}

impl ShapeManager {
    /// Replace the renderer registry. Constructed renderers are dropped and
    /// rebuilt from the new factories on the next frame.
    pub fn set_registry(&mut self, registry: RendererRegistry) {
        self.renderers = Renderers {
            registry,
            slots: std::array::from_fn(|_| None),
        };
    }

    /// Draw every loaded shape in painter's order.
    ///
    /// Polymer segment meshes are built first; the draw pass then only
    /// reads shapes. A kind without a renderer is logged, reported in
    /// [`FrameReport::failed`] and retried next frame; later kinds still
    /// draw.
    pub fn render_frame(
        &mut self,
        projection: &dyn Projection,
        g3d: &mut dyn Graphics3D,
    ) -> FrameReport {
        for shape in self.shapes.iter_mut().flatten() {
            shape.prepare(&self.model, &self.options, projection, &self.pool);
        }

        let lighting = Lighting::from_options(&self.options.lighting);
        let Self {
            model,
            options,
            shapes,
            renderers,
            pool,
            ..
        } = self;
        let mut ctx = RenderContext {
            projection,
            g3d,
            model,
            options,
            pool,
            lighting: &lighting,
        };

        let mut report = FrameReport::default();
        for kind in ShapeKind::ALL {
            let Some(shape) = shapes[kind.index()].as_ref() else {
                report.skipped.push(kind);
                continue;
            };
            let result = renderers
                .get(kind)
                .and_then(|renderer| renderer.render(shape, &mut ctx));
            match result {
                Ok(()) => report.rendered.push(kind),
                Err(e) => {
                    log::warn!("skipping {kind} this frame: {e}");
                    report.failed.push(kind);
                }
            }
        }
        report
    }
}
