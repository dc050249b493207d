//! Atom spheres.

use super::{RenderContext, Renderer};
use crate::error::ShapeError;
use crate::g3d::Colix;
use crate::model::Element;
use crate::shape::AnyShape;

/// Draws one sphere per displayed atom.
#[derive(Debug, Default)]
pub struct BallsRenderer;

impl Renderer for BallsRenderer {
    fn render(&mut self, shape: &AnyShape, ctx: &mut RenderContext<'_>) -> Result<(), ShapeError> {
        let AnyShape::Balls(balls) = shape else {
            return Ok(());
        };
        let show_hydrogens = ctx.options.display.show_hydrogens;
        for (i, atom) in ctx.model.atoms().iter().enumerate() {
            let mad = i32::from(balls.mads().get(i).copied().unwrap_or(0));
            if mad == 0 || !ctx.model.is_atom_displayed(i) {
                continue;
            }
            if atom.element == Element::H && !show_hydrogens {
                continue;
            }
            let s = ctx.projection.transform_point(atom.position);
            if !ctx.projection.is_in_display_range(s.x, s.y) {
                continue;
            }
            let colix = Colix::inherit(balls.colixes()[i], atom.colix);
            let diameter = ctx.projection.scale_to_screen(s.z, mad.abs());
            if mad < 0 {
                ctx.g3d.draw_circle(colix, diameter, s);
            } else {
                ctx.g3d.fill_sphere(colix, diameter, s);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::g3d::recording::{DrawCall, DrawKind, RecordingGraphics};
    use crate::g3d::{ColorTable, ScreenPool};
    use crate::model::{Atom, MolecularModel};
    use crate::options::Options;
    use crate::renderer::test_support::{viewport_for, with_context};
    use crate::shape::balls::Balls;
    use crate::shape::{ShapeContext, Sizable};
    use crate::util::BitSet;

    #[test]
    fn one_sphere_per_sized_atom() {
        let atoms = vec![
            Atom::new(Element::C, "C1", Vec3::ZERO),
            Atom::new(Element::O, "O1", Vec3::new(1.2, 0.0, 0.0)),
            Atom::new(Element::H, "H1", Vec3::new(-1.0, 0.0, 0.0)),
        ];
        let model = MolecularModel::new(atoms, Vec::new()).unwrap();
        let mut options = Options::default();
        let mut colors = ColorTable::new();
        let mut balls = Balls::new(&model);
        {
            let mut sctx = ShapeContext {
                model: &model,
                colors: &mut colors,
                options: &options,
            };
            let first: BitSet = [0].into_iter().collect();
            balls.set_size(400, &model.all_atoms(), &mut sctx);
            balls.set_size(-400, &first, &mut sctx);
        }
        options.display.show_hydrogens = false;
        let shape = AnyShape::Balls(balls);
        let view = viewport_for(&model);
        let pool = ScreenPool::new();
        let mut g3d = RecordingGraphics::new(500, 500);
        with_context(&model, &options, &view, &pool, &mut g3d, |ctx| {
            BallsRenderer.render(&shape, ctx).unwrap();
        });
        assert_eq!(g3d.count(DrawKind::Sphere), 1);
        assert_eq!(g3d.count(DrawKind::Circle), 1);
        let Some(DrawCall::Sphere { colix, diameter, .. }) = g3d.calls.iter().find(|c| c.kind() == DrawKind::Sphere) else {
            panic!("no sphere");
        };
        assert_eq!(*colix, model.atoms()[1].colix);
        assert!(*diameter > 0);
    }
}
