//! Atom labels.

use super::{RenderContext, Renderer};
use crate::error::ShapeError;
use crate::g3d::{Colix, Font, Graphics3D, ScreenPoint};
use crate::model::Element;
use crate::shape::AnyShape;

/// Padding in pixels around a text background box.
pub const TEXT_BOX_PAD: i32 = 2;

/// Draw `text` with its baseline-left corner at `at`, over a filled box when
/// `bg_colix` is set.
pub(crate) fn draw_text(
    g3d: &mut dyn Graphics3D,
    colix: Colix,
    bg_colix: Colix,
    font: &Font,
    text: &str,
    width: i32,
    at: ScreenPoint,
) {
    if !bg_colix.is_inherit() {
        let ascent = g3d.font_ascent(font);
        let (x0, x1) = (at.x - TEXT_BOX_PAD, at.x + width + TEXT_BOX_PAD);
        let (y0, y1) = (at.y - ascent - TEXT_BOX_PAD, at.y + ascent / 3 + TEXT_BOX_PAD);
        let z = at.z + 1;
        let corners = [
            ScreenPoint::new(x0, y0, z),
            ScreenPoint::new(x1, y0, z),
            ScreenPoint::new(x1, y1, z),
            ScreenPoint::new(x0, y1, z),
        ];
        g3d.fill_quadrilateral(bg_colix, corners, None);
    }
    g3d.draw_string(colix, Colix::INHERIT, font, text, at);
}

/// Draws each label beside its atom, offset right and up.
#[derive(Debug, Default)]
pub struct LabelsRenderer;

impl Renderer for LabelsRenderer {
    fn render(&mut self, shape: &AnyShape, ctx: &mut RenderContext<'_>) -> Result<(), ShapeError> {
        let AnyShape::Labels(labels) = shape else {
            return Ok(());
        };
        let model = ctx.model;
        let show_hydrogens = ctx.options.display.show_hydrogens;
        for (i, label) in labels.iter() {
            let Some(atom) = model.atoms().get(i) else {
                continue;
            };
            if label.text.is_empty()
                || !model.is_atom_displayed(i)
                || (atom.element == Element::H && !show_hydrogens)
            {
                continue;
            }
            let s = ctx.projection.transform_point(atom.position);
            if !ctx.projection.is_in_display_range(s.x, s.y) {
                continue;
            }
            let width = ctx.g3d.string_width(&label.font, &label.text);
            let (dx, dy) = label.offset;
            let x = label.align.start_x(s.x + dx, width);
            let at = ScreenPoint::new(x, s.y - dy, s.z);
            let colix = Colix::inherit(label.colix, atom.colix);
            draw_text(ctx.g3d, colix, label.bg_colix, &label.font, &label.text, width, at);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::camera::Projection;
    use crate::g3d::recording::{DrawCall, DrawKind, RecordingGraphics};
    use crate::g3d::{ColorTable, ColorValue, ScreenPool};
    use crate::model::{Atom, MolecularModel};
    use crate::options::Options;
    use crate::renderer::test_support::{viewport_for, with_context};
    use crate::shape::labels::{LabelProperty, Labels, TextAlign};
    use crate::shape::ShapeContext;
    use crate::util::BitSet;

    fn render(props: Vec<LabelProperty>) -> (MolecularModel, RecordingGraphics) {
        let atoms = vec![
            Atom::new(Element::C, "C1", Vec3::ZERO),
            Atom::new(Element::N, "N1", Vec3::new(1.4, 0.0, 0.0)),
        ];
        let model = MolecularModel::new(atoms, Vec::new()).unwrap();
        let options = Options::default();
        let mut colors = ColorTable::new();
        let mut labels = Labels::new(&model);
        {
            let mut sctx = ShapeContext {
                model: &model,
                colors: &mut colors,
                options: &options,
            };
            let first: BitSet = [0].into_iter().collect();
            for p in props {
                labels.set_property(p, &first, &mut sctx);
            }
        }
        let shape = AnyShape::Labels(labels);
        let view = viewport_for(&model);
        let pool = ScreenPool::new();
        let mut g3d = RecordingGraphics::new(500, 500);
        with_context(&model, &options, &view, &pool, &mut g3d, |ctx| {
            LabelsRenderer.render(&shape, ctx).unwrap();
        });
        (model, g3d)
    }

    fn texts(g3d: &RecordingGraphics) -> Vec<(String, ScreenPoint)> {
        g3d.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, at, .. } => Some((text.clone(), *at)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn label_sits_at_the_offset() {
        let (model, g3d) = render(vec![LabelProperty::Text("%e%i".to_owned())]);
        let drawn = texts(&g3d);
        assert_eq!(drawn.len(), 1);
        let (text, at) = &drawn[0];
        assert_eq!(text, "C1");
        assert_eq!(g3d.count(DrawKind::Quadrilateral), 0);
        let view = viewport_for(&model);
        let s = view.transform_point(Vec3::ZERO);
        assert_eq!((at.x, at.y), (s.x + 4, s.y - 4));
    }

    #[test]
    fn right_aligned_label_ends_at_the_anchor() {
        let (model, g3d) = render(vec![
            LabelProperty::Align(TextAlign::Right),
            LabelProperty::Text("%a".to_owned()),
            LabelProperty::BgColor(ColorValue::Rgb(0x0000_00ff)),
        ]);
        let drawn = texts(&g3d);
        let (text, at) = &drawn[0];
        let width = g3d.string_width(&Font::default(), text);
        let view = viewport_for(&model);
        let s = view.transform_point(Vec3::ZERO);
        assert_eq!(at.x + width, s.x + 4);
        // box first, text over it
        assert_eq!(g3d.count(DrawKind::Quadrilateral), 1);
        assert_eq!(g3d.calls[0].kind(), DrawKind::Quadrilateral);
    }

    #[test]
    fn empty_labels_are_skipped() {
        let (_, g3d) = render(vec![LabelProperty::Text(String::new())]);
        assert!(texts(&g3d).is_empty());
    }
}
