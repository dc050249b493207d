//! Per-family renderers and the registry that constructs them.
//!
//! A renderer is a pure projection pass over one shape: it reads the shape's
//! derived geometry and style arrays and issues [`Graphics3D`] calls. It
//! never writes to the shape. Scratch screen buffers come from the pool in
//! [`RenderContext`] and go back when their guards drop.
//!
//! [`Graphics3D`]: crate::g3d::Graphics3D

pub mod axes;
pub mod balls;
pub mod cartoon;
pub mod dots;
pub mod draw_context;
pub mod echo;
pub mod labels;
pub mod mesh;
pub mod polyhedra;
pub mod polymer;
pub mod sticks;

pub use draw_context::RenderContext;

use crate::error::ShapeError;
use crate::shape::{AnyShape, ShapeKind};

/// Common draw signature of every shape renderer.
pub trait Renderer {
    /// Draw `shape` for the current frame. Shapes of another family are
    /// ignored.
    fn render(&mut self, shape: &AnyShape, ctx: &mut RenderContext<'_>) -> Result<(), ShapeError>;
}

/// Builds a renderer for one shape kind.
pub type RendererFactory = fn() -> Result<Box<dyn Renderer>, ShapeError>;

fn boxed<R: Renderer + Default + 'static>() -> Result<Box<dyn Renderer>, ShapeError> {
    Ok(Box::new(R::default()))
}

/// Compile-time table from shape kind to renderer factory.
#[derive(Clone)]
pub struct RendererRegistry {
    factories: [Option<RendererFactory>; ShapeKind::COUNT],
}

impl RendererRegistry {
    /// A registry with no factories.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: [None; ShapeKind::COUNT],
        }
    }

    /// Every built-in renderer.
    #[must_use]
    pub fn standard() -> Self {
        let mut r = Self::empty();
        r.register(ShapeKind::Balls, boxed::<balls::BallsRenderer>);
        r.register(ShapeKind::Sticks, boxed::<sticks::SticksRenderer>);
        r.register(ShapeKind::Dots, boxed::<dots::DotsRenderer>);
        r.register(ShapeKind::GeoSurface, boxed::<dots::DotsRenderer>);
        for kind in [
            ShapeKind::Backbone,
            ShapeKind::Trace,
            ShapeKind::Strands,
            ShapeKind::Ribbons,
        ] {
            r.register(kind, boxed::<polymer::MpsRenderer>);
        }
        r.register(ShapeKind::Cartoon, boxed::<cartoon::CartoonRenderer>);
        r.register(ShapeKind::Rockets, boxed::<cartoon::CartoonRenderer>);
        r.register(ShapeKind::Mesh, boxed::<mesh::MeshRenderer>);
        r.register(ShapeKind::Polyhedra, boxed::<polyhedra::PolyhedraRenderer>);
        r.register(ShapeKind::Axes, boxed::<axes::AxesRenderer>);
        r.register(ShapeKind::Labels, boxed::<labels::LabelsRenderer>);
        r.register(ShapeKind::Echo, boxed::<echo::EchoRenderer>);
        r
    }

    /// Install or replace the factory for `kind`.
    pub fn register(&mut self, kind: ShapeKind, factory: RendererFactory) {
        self.factories[kind.index()] = Some(factory);
    }

    /// Remove the factory for `kind`.
    pub fn unregister(&mut self, kind: ShapeKind) {
        self.factories[kind.index()] = None;
    }

    /// Construct the renderer for `kind`.
    pub fn create(&self, kind: ShapeKind) -> Result<Box<dyn Renderer>, ShapeError> {
        let factory = self.factories[kind.index()].ok_or(ShapeError::RendererUnavailable(kind))?;
        factory()
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<ShapeKind> = ShapeKind::ALL
            .iter()
            .copied()
            .filter(|k| self.factories[k.index()].is_some())
            .collect();
        f.debug_struct("RendererRegistry").field("kinds", &kinds).finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use glam::Vec3;

    use crate::camera::{Camera, Viewport};
    use crate::g3d::recording::RecordingGraphics;
    use crate::g3d::{Lighting, ScreenPool};
    use crate::model::MolecularModel;
    use crate::options::{CameraOptions, Options};

    use super::RenderContext;

    /// Viewport framing `model` on a 500×500 canvas.
    pub fn viewport_for(model: &MolecularModel) -> Viewport {
        let (center, radius) = model.bounds();
        viewport_at(center, radius)
    }

    /// Viewport framing a sphere.
    pub fn viewport_at(center: Vec3, radius: f32) -> Viewport {
        let camera = Camera::framing(center, radius, 1.0, &CameraOptions::default());
        Viewport::new(camera, 500, 500)
    }

    /// Run `f` with a fresh context over a recording backend.
    pub fn with_context<R>(
        model: &MolecularModel,
        options: &Options,
        view: &Viewport,
        pool: &ScreenPool,
        g3d: &mut RecordingGraphics,
        f: impl FnOnce(&mut RenderContext<'_>) -> R,
    ) -> R {
        let lighting = Lighting::from_options(&options.lighting);
        let mut ctx = RenderContext {
            projection: view,
            g3d,
            model,
            options,
            pool,
            lighting: &lighting,
        };
        f(&mut ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_every_kind() {
        let registry = RendererRegistry::standard();
        for kind in ShapeKind::ALL {
            assert!(registry.create(kind).is_ok(), "{kind}");
        }
    }

    #[test]
    fn unregistered_kind_is_unavailable() {
        let mut registry = RendererRegistry::standard();
        registry.unregister(ShapeKind::Dots);
        assert!(matches!(
            registry.create(ShapeKind::Dots).err(),
            Some(ShapeError::RendererUnavailable(ShapeKind::Dots))
        ));
        assert!(format!("{registry:?}").contains("Balls"));
    }
}
