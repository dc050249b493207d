//! The per-viewer shape table.
//!
//! [`ShapeManager`] owns the molecule, the options, the colour table, one
//! optional shape per [`ShapeKind`] and one lazily constructed renderer per
//! kind. A frame is a single synchronous pass over the table in painter's
//! order.
//!
//! # Frame loop
//!
//! Mutate shapes with [`set_size`](ShapeManager::set_size) and
//! [`set_property`](ShapeManager::set_property) between frames, then call
//! [`render_frame`](ShapeManager::render_frame) with the current projection
//! and a drawing backend. The returned [`FrameReport`] says which kinds
//! drew, which were absent and which had no renderer.

mod accessors;
mod queries;
mod renderers;

use self::renderers::Renderers;
pub use self::renderers::FrameReport;
use crate::error::ShapeError;
use crate::g3d::{ColorTable, ScreenPool};
use crate::model::MolecularModel;
use crate::options::Options;
use crate::shape::{AnyShape, ShapeContext, ShapeKind, ShapeProperty};
use crate::util::BitSet;

/// Shapes, renderers and shared state of one viewer.
pub struct ShapeManager {
    /// The molecule every shape is sized for.
    model: MolecularModel,
    /// Runtime geometry, display, surface and lighting options.
    options: Options,
    /// Interned colours shared by every shape.
    colors: ColorTable,
    /// One slot per kind, absent until loaded.
    shapes: [Option<AnyShape>; ShapeKind::COUNT],
    /// Factory registry plus the constructed renderers.
    renderers: Renderers,
    /// Scratch screen buffers lent to renderers.
    pool: ScreenPool,
}

impl ShapeManager {
    /// Manager over `model` with no shapes loaded and the standard registry.
    #[must_use]
    pub fn new(model: MolecularModel, options: Options) -> Self {
        Self {
            model,
            options,
            colors: ColorTable::new(),
            shapes: std::array::from_fn(|_| None),
            renderers: Renderers::default(),
            pool: ScreenPool::new(),
        }
    }

    /// Create the shape for `kind` if absent and return it.
    pub fn load_shape(&mut self, kind: ShapeKind) -> &mut AnyShape {
        load(&mut self.shapes, kind, &self.model, &self.options)
    }

    /// Run `f` on the (loaded) shape of `kind` with a property context.
    fn with_shape<R>(
        &mut self,
        kind: ShapeKind,
        f: impl FnOnce(&mut AnyShape, &mut ShapeContext<'_>) -> R,
    ) -> R {
        let shape = load(&mut self.shapes, kind, &self.model, &self.options);
        let mut ctx = ShapeContext {
            model: &self.model,
            colors: &mut self.colors,
            options: &self.options,
        };
        f(shape, &mut ctx)
    }

    /// Set the width of the selected elements of `kind`, loading it first.
    pub fn set_size(
        &mut self,
        kind: ShapeKind,
        mad: i16,
        selection: &BitSet,
    ) -> Result<(), ShapeError> {
        self.with_shape(kind, |shape, ctx| shape.set_size(mad, selection, ctx))
    }

    /// Apply a property to the selected elements of `kind`, loading it first.
    pub fn set_property(
        &mut self,
        kind: ShapeKind,
        property: ShapeProperty,
        selection: &BitSet,
    ) -> Result<(), ShapeError> {
        self.with_shape(kind, |shape, ctx| {
            shape.set_property(property, selection, ctx)
        })
    }
}

fn load<'s>(
    shapes: &'s mut [Option<AnyShape>; ShapeKind::COUNT],
    kind: ShapeKind,
    model: &MolecularModel,
    options: &Options,
) -> &'s mut AnyShape {
    let slot = &mut shapes[kind.index()];
    if slot.is_none() {
        log::info!("loaded shape {kind}");
    }
    slot.get_or_insert_with(|| AnyShape::new(kind, model, options))
}

impl std::fmt::Debug for ShapeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeManager")
            .field("atoms", &self.model.atom_count())
            .field("loaded", &self.loaded_kinds())
            .field("renderers", &self.renderers)
            .finish_non_exhaustive()
    }
}
