//! Read and write access to the state a [`ShapeManager`] owns.

use super::ShapeManager;
use crate::g3d::{ColorTable, ScreenPool};
use crate::model::MolecularModel;
use crate::options::Options;
use crate::shape::{AnyShape, ShapeKind};
use crate::util::BitSet;

// ── Shapes ──

impl ShapeManager {
    /// The loaded shape of `kind`, if any.
    #[must_use]
    pub fn shape(&self, kind: ShapeKind) -> Option<&AnyShape> {
        self.shapes[kind.index()].as_ref()
    }

    /// Mutable access to the loaded shape of `kind`, if any.
    pub fn shape_mut(&mut self, kind: ShapeKind) -> Option<&mut AnyShape> {
        self.shapes[kind.index()].as_mut()
    }

    /// Drop the shape of `kind`; it stops drawing until loaded again.
    pub fn unload_shape(&mut self, kind: ShapeKind) -> Option<AnyShape> {
        self.shapes[kind.index()].take()
    }
}

// ── Model ──

impl ShapeManager {
    /// The molecule.
    #[must_use]
    pub fn model(&self) -> &MolecularModel {
        &self.model
    }

    /// Swap in a new molecule. Every shape is sized for the old one, so all
    /// are unloaded.
    pub fn replace_model(&mut self, model: MolecularModel) {
        log::debug!(
            "replacing model ({} -> {} atoms), unloading shapes",
            self.model.atom_count(),
            model.atom_count()
        );
        self.model = model;
        self.shapes = std::array::from_fn(|_| None);
    }

    /// Hide the given atoms from every shape.
    pub fn set_hidden(&mut self, hidden: BitSet) {
        self.model.set_hidden(hidden);
    }

    /// Restrict display to one model index, or show all with `None`.
    pub fn set_display_model(&mut self, model: Option<usize>) {
        self.model.set_display_model(model);
    }
}

// ── Options and shared resources ──

impl ShapeManager {
    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mutable options; read again on the next frame.
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Interned colours.
    #[must_use]
    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Scratch screen buffers lent to renderers.
    #[must_use]
    pub fn pool(&self) -> &ScreenPool {
        &self.pool
    }
}
