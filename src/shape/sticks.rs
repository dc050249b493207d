//! Bond cylinders.
//!
//! A bond is styled when both atoms are selected, or either one in OR mode.
//! Bonds that keep INHERIT are drawn half-and-half in their atoms' colors.

use super::{ClosestAtom, Clickable, Colorable, ShapeContext, Sizable, StyleRecord};
use crate::camera::Projection;
use crate::g3d::{Colix, ColorValue};
use crate::model::{Bond, MolecularModel};
use crate::util::BitSet;

/// Per-bond widths and colors.
#[derive(Debug, Clone)]
pub struct Sticks {
    style: StyleRecord,
    mads: Vec<i16>,
    colixes: Vec<Colix>,
}

fn bond_selected(bond: &Bond, selection: &BitSet, or_mode: bool) -> bool {
    let (a, b) = (selection.get(bond.atom_a), selection.get(bond.atom_b));
    if or_mode {
        a || b
    } else {
        a && b
    }
}

impl Sticks {
    /// All bonds off.
    #[must_use]
    pub fn new(model: &MolecularModel) -> Self {
        let n = model.bonds().len();
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

    /// Widths in milliangstroms; negative draws dashed.
    #[must_use]
    pub fn mads(&self) -> &[i16] {
        &self.mads
    }

    /// Explicit colors; INHERIT takes each atom's.
    #[must_use]
    pub fn colixes(&self) -> &[Colix] {
        &self.colixes
    }

    fn selected_bonds<'m>(
        model: &'m MolecularModel,
        selection: &'m BitSet,
        or_mode: bool,
    ) -> impl Iterator<Item = usize> + 'm {
        model
            .bonds()
            .iter()
            .enumerate()
            .filter(move |(_, b)| bond_selected(b, selection, or_mode))
            .map(|(i, _)| i)
    }
}

impl Sizable for Sticks {
    fn set_size(&mut self, mad: i16, selection: &BitSet, ctx: &mut ShapeContext<'_>) {
        self.style.mad = mad;
        for i in Self::selected_bonds(ctx.model, selection, ctx.bond_mode_or()) {
            if let Some(slot) = self.mads.get_mut(i) {
                *slot = mad;
            }
        }
    }
}

impl Colorable for Sticks {
    fn set_color(&mut self, color: ColorValue, selection: &BitSet, ctx: &mut ShapeContext<'_>) {
        let (colix, _) = ctx.resolve_color(color);
        self.style.colix = colix;
        // palette colors come from the atoms at draw time
        let colix = if colix.is_unrecognized() { Colix::INHERIT } else { colix };
        for i in Self::selected_bonds(ctx.model, selection, ctx.bond_mode_or()) {
            if let Some(slot) = self.colixes.get_mut(i) {
                *slot = colix;
            }
        }
    }

    fn set_translucent(
        &mut self,
        translucent: bool,
        selection: &BitSet,
        ctx: &mut ShapeContext<'_>,
    ) {
        for i in Self::selected_bonds(ctx.model, selection, ctx.bond_mode_or()) {
            if let Some(slot) = self.colixes.get_mut(i) {
                *slot = slot.with_translucency(translucent);
            }
        }
    }
}

impl Clickable for Sticks {
    fn find_nearest_atom(
        &self,
        x: i32,
        y: i32,
        model: &MolecularModel,
        projection: &dyn Projection,
    ) -> Option<ClosestAtom> {
        let atoms = model.atoms();
        let mut best = None;
        for (bond, &mad) in model.bonds().iter().zip(&self.mads) {
            if mad == 0 {
                continue;
            }
            for i in [bond.atom_a, bond.atom_b] {
                if !model.is_atom_displayed(i) {
                    continue;
                }
                let s = projection.transform_point(atoms[i].position);
                let r = (projection.scale_to_screen(s.z, i32::from(mad).abs()) / 2).max(2);
                let (dx, dy) = (s.x - x, s.y - y);
                let d2 = dx * dx + dy * dy;
                if d2 <= r * r {
                    best = ClosestAtom::nearer(best, Some(ClosestAtom { atom: i, distance2: d2 }));
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::g3d::{ColorTable, Palette};
    use crate::model::{Atom, BondOrder, Element};
    use crate::options::Options;

    fn propane() -> MolecularModel {
        let atoms = (0..3)
            .map(|i| Atom::new(Element::C, "C", Vec3::new(i as f32 * 1.5, 0.0, 0.0)))
            .collect();
        let bonds = vec![
            Bond::new(0, 1, BondOrder::Single),
            Bond::new(1, 2, BondOrder::Double),
        ];
        MolecularModel::new(atoms, bonds).unwrap()
    }

    #[test]
    fn and_mode_needs_both_atoms_or_mode_either() {
        let model = propane();
        let mut colors = ColorTable::new();
        let mut options = Options::default();
        let first_two: BitSet = [0, 1].into_iter().collect();
        let mut sticks = Sticks::new(&model);
        {
            let mut ctx = ShapeContext {
                model: &model,
                colors: &mut colors,
                options: &options,
            };
            sticks.set_size(150, &first_two, &mut ctx);
        }
        assert_eq!(sticks.mads(), &[150, 0]);

        options.display.bond_selection_mode_or = true;
        let mut ctx = ShapeContext {
            model: &model,
            colors: &mut colors,
            options: &options,
        };
        sticks.set_size(250, &first_two, &mut ctx);
        assert_eq!(sticks.mads(), &[250, 250]);
    }

    #[test]
    fn palette_color_resets_to_inherit() {
        let model = propane();
        let options = Options::default();
        let mut colors = ColorTable::new();
        let mut ctx = ShapeContext {
            model: &model,
            colors: &mut colors,
            options: &options,
        };
        let mut sticks = Sticks::new(&model);
        let all = model.all_atoms();
        sticks.set_color(ColorValue::Rgb(0x0012_3456), &all, &mut ctx);
        assert!(!sticks.colixes()[0].is_inherit());
        sticks.set_color(ColorValue::Palette(Palette::Cpk), &all, &mut ctx);
        assert!(sticks.colixes().iter().all(|c| c.is_inherit()));
        sticks.set_translucent(true, &all, &mut ctx);
        assert!(sticks.colixes().iter().all(|c| c.is_translucent()));
    }
}
