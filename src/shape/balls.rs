//! Atom spheres.

use super::{ClosestAtom, Clickable, Colorable, ShapeContext, Sizable, StyleRecord};
use crate::camera::Projection;
use crate::g3d::{Colix, ColorValue};
use crate::model::MolecularModel;
use crate::util::BitSet;

/// Per-atom sphere widths and colors.
#[derive(Debug, Clone)]
pub struct Balls {
    style: StyleRecord,
    mads: Vec<i16>,
    colixes: Vec<Colix>,
}

impl Balls {
    /// All atoms off, colors inherited.
    #[must_use]
    pub fn new(model: &MolecularModel) -> Self {
        let n = model.atom_count();
        Self {
            style: StyleRecord::default(),
            mads: vec![0; n],
            colixes: vec![Colix::INHERIT; n],
        }
    }

    /// Shape-wide style.
    #[must_use]
    pub fn style(&self) -> &StyleRecord {
        &self.style
    }

    /// Diameters in milliangstroms; negative draws an outline.
    #[must_use]
    pub fn mads(&self) -> &[i16] {
        &self.mads
    }

    /// Explicit colors; INHERIT takes the atom's.
    #[must_use]
    pub fn colixes(&self) -> &[Colix] {
        &self.colixes
    }
}

impl Sizable for Balls {
    fn set_size(&mut self, mad: i16, selection: &BitSet, _ctx: &mut ShapeContext<'_>) {
        self.style.mad = mad;
        for i in selection.iter() {
            if let Some(slot) = self.mads.get_mut(i) {
                *slot = mad;
            }
        }
    }
}

impl Colorable for Balls {
    fn set_color(&mut self, color: ColorValue, selection: &BitSet, ctx: &mut ShapeContext<'_>) {
        let (colix, palette) = ctx.resolve_color(color);
        self.style.colix = colix;
        for i in selection.iter() {
            if i < self.colixes.len() {
                self.colixes[i] = ctx.colix_or_palette(colix, palette, i, None);
            }
        }
    }

    fn set_translucent(
        &mut self,
        translucent: bool,
        selection: &BitSet,
        ctx: &mut ShapeContext<'_>,
    ) {
        let atoms = ctx.model.atoms();
        for i in selection.iter() {
            if let (Some(slot), Some(atom)) = (self.colixes.get_mut(i), atoms.get(i)) {
                *slot = Colix::inherit(*slot, atom.colix).with_translucency(translucent);
            }
        }
    }
}

impl Clickable for Balls {
    fn find_nearest_atom(
        &self,
        x: i32,
        y: i32,
        model: &MolecularModel,
        projection: &dyn Projection,
    ) -> Option<ClosestAtom> {
        let mut best = None;
        for (i, atom) in model.atoms().iter().enumerate() {
            let mad = i32::from(self.mads.get(i).copied().unwrap_or(0)).abs();
            if mad == 0 || !model.is_atom_displayed(i) {
                continue;
            }
            let s = projection.transform_point(atom.position);
            let r = (projection.scale_to_screen(s.z, mad) / 2).max(2);
            let (dx, dy) = (s.x - x, s.y - y);
            let d2 = dx * dx + dy * dy;
            if d2 <= r * r {
                best = ClosestAtom::nearer(best, Some(ClosestAtom { atom: i, distance2: d2 }));
            }
        }
        best
    }
}
