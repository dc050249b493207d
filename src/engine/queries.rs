//! Picking and table queries.

use super::ShapeManager;
use crate::camera::Projection;
use crate::shape::{ClosestAtom, ShapeKind};

impl ShapeManager {
    /// Nearest displayed atom under pixel `(x, y)` across every pickable
    /// shape.
    #[must_use]
    pub fn find_nearest_atom(
        &self,
        x: i32,
        y: i32,
        projection: &dyn Projection,
    ) -> Option<ClosestAtom> {
        self.shapes.iter().flatten().fold(None, |best, shape| {
            ClosestAtom::nearer(best, shape.find_nearest_atom(x, y, &self.model, projection))
        })
    }

    /// Kinds with a loaded shape, in painter's order.
    #[must_use]
    pub fn loaded_kinds(&self) -> Vec<ShapeKind> {
        ShapeKind::ALL
            .into_iter()
            .filter(|k| self.shapes[k.index()].is_some())
            .collect()
    }
}
