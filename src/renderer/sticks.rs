//! Bonds as cylinders, lines and dashes.
//!
//! Multiple bonds are drawn as parallel stripes offset perpendicular to the
//! bond on screen. Stripes are `width + |AB|/8` apart, where `|AB|` is the
//! on-screen bond length.

use super::{RenderContext, Renderer};
use crate::error::ShapeError;
use crate::g3d::{Colix, Endcaps, Graphics3D, Shade, Shading, ScreenPoint};
use crate::model::{BondOrder, Element};
use crate::options::MultipleBondMode;
use crate::shape::AnyShape;

/// Above this width (milliangstroms) "not small" multiple bonds draw single.
pub const MULTIPLE_BOND_SMALL_MAXIMUM: i32 = 500;

/// Dashes as `(start, end)` in twelfths of the bond.
const DASHES: [(i32, i32); 3] = [(0, 2), (5, 7), (10, 12)];
/// Hydrogen-bond dashes in tenths.
const HBOND_DASHES: [(i32, i32); 5] = [(1, 2), (3, 4), (5, 6), (7, 8), (9, 10)];

/// How one bond is drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stroke {
    colixes: [Colix; 2],
    width: i32,
    a: ScreenPoint,
    b: ScreenPoint,
}

impl Stroke {
    fn is_line(&self) -> bool {
        self.width <= 1
    }

    fn along(&self, num: i32, den: i32) -> ScreenPoint {
        let (a, b) = (self.a, self.b);
        ScreenPoint::new(
            a.x + (b.x - a.x) * num / den,
            a.y + (b.y - a.y) * num / den,
            a.z + (b.z - a.z) * num / den,
        )
    }

    fn shifted(&self, dx: f32, dy: f32) -> Self {
        let (dx, dy) = (dx.round() as i32, dy.round() as i32);
        Self {
            a: self.a.offset(dx, dy),
            b: self.b.offset(dx, dy),
            ..*self
        }
    }

    fn draw_solid(&self, g3d: &mut dyn Graphics3D) {
        let [ca, cb] = self.colixes;
        if self.is_line() {
            g3d.draw_line(ca, cb, self.a, self.b);
        } else {
            g3d.fill_cylinder(self.colixes, Endcaps::Spherical, self.width, self.a, self.b);
        }
    }

    fn draw_dashes(&self, g3d: &mut dyn Graphics3D, dashes: &[(i32, i32)], den: i32) {
        let [ca, cb] = self.colixes;
        for &(s, e) in dashes {
            let (p, q) = (self.along(s, den), self.along(e, den));
            let (cs, ce) = (
                if 2 * s < den { ca } else { cb },
                if 2 * e <= den { ca } else { cb },
            );
            if self.is_line() {
                g3d.draw_line(cs, ce, p, q);
            } else {
                g3d.fill_cylinder([cs, ce], Endcaps::Flat, self.width, p, q);
            }
        }
    }

    /// `count` parallel stripes; bit `k` of `dashed` dashes stripe `k`.
    fn draw_stripes(&self, g3d: &mut dyn Graphics3D, count: usize, dashed: u32) {
        let (dx, dy) = ((self.b.x - self.a.x) as f32, (self.b.y - self.a.y) as f32);
        if dx == 0.0 && dy == 0.0 {
            self.draw_end_on(g3d, count);
            return;
        }
        let mag = dx.hypot(dy);
        let step = self.width as f32 + mag / 8.0;
        let (px, py) = (dy / mag * step, -dx / mag * step);
        let first = -(count as f32 - 1.0) / 2.0;
        for k in 0..count {
            let t = first + k as f32;
            let stripe = self.shifted(px * t, py * t);
            if dashed & (1 << k) != 0 {
                stripe.draw_dashes(g3d, &DASHES, 12);
            } else {
                stripe.draw_solid(g3d);
            }
        }
    }

    /// Bond pointing at the viewer: stacked stubs.
    fn draw_end_on(&self, g3d: &mut dyn Graphics3D, count: usize) {
        if self.is_line() {
            return;
        }
        let step = self.width + self.width / 8 + 3;
        let first = -((count as i32 - 1) * step) / 2;
        for k in 0..count as i32 {
            let p = self.a.offset(0, first + k * step);
            g3d.fill_cylinder([self.colixes[0]; 2], Endcaps::Spherical, self.width, p, p);
        }
    }

    /// Stereo wedge widening from `a` to `b`.
    fn draw_wedge(&self, g3d: &mut dyn Graphics3D) {
        let (dx, dy) = ((self.b.x - self.a.x) as f32, (self.b.y - self.a.y) as f32);
        let mag = dx.hypot(dy).max(1.0);
        let half = self.width.max(2) as f32;
        let (px, py) = ((dy / mag * half).round() as i32, (-dx / mag * half).round() as i32);
        let points = [self.a, self.b.offset(px, py), self.b.offset(-px, -py)];
        g3d.fill_triangle(self.colixes[1], points, Shading::Flat(Shade(0)));
    }
}

/// Draws every sized bond.
#[derive(Debug, Default)]
pub struct SticksRenderer;

impl Renderer for SticksRenderer {
    fn render(&mut self, shape: &AnyShape, ctx: &mut RenderContext<'_>) -> Result<(), ShapeError> {
        let AnyShape::Sticks(sticks) = shape else {
            return Ok(());
        };
        let display = &ctx.options.display;
        let atoms = ctx.model.atoms();
        for (i, bond) in ctx.model.bonds().iter().enumerate() {
            let mad = i32::from(sticks.mads().get(i).copied().unwrap_or(0));
            if mad == 0
                || !ctx.model.is_atom_displayed(bond.atom_a)
                || !ctx.model.is_atom_displayed(bond.atom_b)
            {
                continue;
            }
            let (atom_a, atom_b) = (&atoms[bond.atom_a], &atoms[bond.atom_b]);
            if !display.show_hydrogens && (atom_a.element == Element::H || atom_b.element == Element::H) {
                continue;
            }
            let a = ctx.projection.transform_point(atom_a.position);
            let b = ctx.projection.transform_point(atom_b.position);
            if !ctx.projection.is_in_display_range(a.x, a.y)
                && !ctx.projection.is_in_display_range(b.x, b.y)
            {
                continue;
            }
            let explicit = sticks.colixes().get(i).copied().unwrap_or_default();
            let stroke = Stroke {
                colixes: [
                    Colix::inherit(explicit, atom_a.colix),
                    Colix::inherit(explicit, atom_b.colix),
                ],
                width: ctx.projection.scale_to_screen((a.z + b.z) / 2, mad.abs()),
                a,
                b,
            };
            let multiple = display.show_multiple_bonds
                && match display.multiple_bond_mode {
                    MultipleBondMode::Never => false,
                    MultipleBondMode::NotSmall => mad <= MULTIPLE_BOND_SMALL_MAXIMUM,
                    MultipleBondMode::Always => true,
                };
            let all_dashed = if mad < 0 { u32::MAX } else { 0 };
            match bond.order {
                BondOrder::Hydrogen if !display.hbonds_solid => {
                    stroke.draw_dashes(ctx.g3d, &HBOND_DASHES, 10);
                }
                BondOrder::Partial => stroke.draw_stripes(ctx.g3d, 1, u32::MAX),
                BondOrder::StereoNear | BondOrder::StereoFar => stroke.draw_wedge(ctx.g3d),
                BondOrder::Aromatic if multiple => stroke.draw_stripes(ctx.g3d, 2, 0b10 | all_dashed),
                order => {
                    let count = if multiple { order.stripe_count() } else { 1 };
                    stroke.draw_stripes(ctx.g3d, count, all_dashed);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::g3d::recording::{DrawKind, RecordingGraphics};
    use crate::g3d::{ColorTable, ScreenPool};
    use crate::model::{Atom, Bond, MolecularModel};
    use crate::options::Options;
    use crate::renderer::test_support::{viewport_for, with_context};
    use crate::shape::sticks::Sticks;
    use crate::shape::{ShapeContext, Sizable};

    fn render(order: BondOrder, mad: i16, options: &Options) -> RecordingGraphics {
        let atoms = vec![
            Atom::new(Element::C, "C1", Vec3::ZERO),
            Atom::new(Element::C, "C2", Vec3::new(1.5, 0.0, 0.0)),
        ];
        let model = MolecularModel::new(atoms, vec![Bond::new(0, 1, order)]).unwrap();
        let mut colors = ColorTable::new();
        let mut sticks = Sticks::new(&model);
        let mut sctx = ShapeContext {
            model: &model,
            colors: &mut colors,
            options,
        };
        sticks.set_size(mad, &model.all_atoms(), &mut sctx);
        let shape = AnyShape::Sticks(sticks);
        let view = viewport_for(&model);
        let pool = ScreenPool::new();
        let mut g3d = RecordingGraphics::new(500, 500);
        with_context(&model, options, &view, &pool, &mut g3d, |ctx| {
            SticksRenderer.render(&shape, ctx).unwrap();
        });
        g3d
    }

    #[test]
    fn one_primitive_per_stripe() {
        let options = Options::default();
        for (order, stripes) in [
            (BondOrder::Single, 1),
            (BondOrder::Double, 2),
            (BondOrder::Triple, 3),
            (BondOrder::Quadruple, 4),
        ] {
            let g3d = render(order, 200, &options);
            assert_eq!(g3d.calls.len(), stripes, "{order:?}");
            assert_eq!(g3d.count(DrawKind::Cylinder), stripes);
        }
    }

    #[test]
    fn multiple_bonds_collapse_when_disabled_or_thick() {
        let mut options = Options::default();
        assert_eq!(render(BondOrder::Triple, 800, &options).calls.len(), 1);
        options.display.show_multiple_bonds = false;
        assert_eq!(render(BondOrder::Double, 200, &options).calls.len(), 1);
    }

    #[test]
    fn dashed_forms() {
        let mut options = Options::default();
        assert_eq!(render(BondOrder::Partial, 200, &options).calls.len(), 3);
        assert_eq!(render(BondOrder::Single, -200, &options).calls.len(), 3);
        assert_eq!(render(BondOrder::Hydrogen, 200, &options).calls.len(), 5);
        // solid stripe plus three dashes
        assert_eq!(render(BondOrder::Aromatic, 200, &options).calls.len(), 4);
        options.display.hbonds_solid = true;
        assert_eq!(render(BondOrder::Hydrogen, 200, &options).calls.len(), 1);
    }

    #[test]
    fn hairline_bonds_draw_lines() {
        let g3d = render(BondOrder::Single, 1, &Options::default());
        assert_eq!(g3d.count(DrawKind::Line), 1);
    }
}
