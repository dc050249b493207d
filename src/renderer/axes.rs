//! Coordinate axes.

use super::labels::draw_text;
use super::{RenderContext, Renderer};
use crate::error::ShapeError;
use crate::g3d::Endcaps;
use crate::shape::AnyShape;

/// Tip labels in axis order.
const AXIS_NAMES: [&str; 3] = ["X", "Y", "Z"];

/// Draws the three axes and their tip labels.
#[derive(Debug, Default)]
pub struct AxesRenderer;

impl Renderer for AxesRenderer {
    fn render(&mut self, shape: &AnyShape, ctx: &mut RenderContext<'_>) -> Result<(), ShapeError> {
        let AnyShape::Axes(axes) = shape else {
            return Ok(());
        };
        if !axes.is_visible() {
            return Ok(());
        }
        let style = axes.style();
        let mad = i32::from(style.mad);
        let (origin, tips) = axes.points();
        let o = ctx.projection.transform_point(origin);
        for (tip, name) in tips.into_iter().zip(AXIS_NAMES) {
            let t = ctx.projection.transform_point(tip);
            if mad == 1 {
                ctx.g3d.draw_line(style.colix, style.colix, o, t);
            } else {
                let d = ctx.projection.scale_to_screen((o.z + t.z) / 2, mad.abs());
                ctx.g3d.fill_cylinder([style.colix; 2], Endcaps::Flat, d, o, t);
            }
            if axes.labels() {
                let width = ctx.g3d.string_width(&style.font, name);
                draw_text(ctx.g3d, style.colix, style.bg_colix, &style.font, name, width, t);
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
    use crate::model::MolecularModel;
    use crate::options::Options;
    use crate::renderer::test_support::{viewport_at, with_context};
    use crate::shape::axes::{Axes, AxesProperty};
    use crate::shape::{ShapeContext, Sizable};

    fn render(axes: Axes) -> RecordingGraphics {
        let model = MolecularModel::default();
        let options = Options::default();
        let view = viewport_at(Vec3::ZERO, 3.0);
        let pool = ScreenPool::new();
        let shape = AnyShape::Axes(axes);
        let mut g3d = RecordingGraphics::new(500, 500);
        with_context(&model, &options, &view, &pool, &mut g3d, |ctx| {
            AxesRenderer.render(&shape, ctx).unwrap();
        });
        g3d
    }

    fn sized(mad: i16) -> Axes {
        let mut axes = Axes::new();
        let model = MolecularModel::default();
        let options = Options::default();
        let mut colors = ColorTable::new();
        let mut sctx = ShapeContext {
            model: &model,
            colors: &mut colors,
            options: &options,
        };
        axes.set_size(mad, &model.all_atoms(), &mut sctx);
        axes
    }

    #[test]
    fn hidden_until_sized() {
        assert!(render(Axes::new()).calls.is_empty());
    }

    #[test]
    fn three_axes_with_labels() {
        let g3d = render(sized(100));
        assert_eq!(g3d.count(DrawKind::Cylinder), 3);
        let names: Vec<&str> = g3d
            .calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, ["X", "Y", "Z"]);
    }

    #[test]
    fn hairline_axes_without_labels() {
        let mut axes = sized(1);
        axes.set_property(AxesProperty::Labels(false));
        let g3d = render(axes);
        assert_eq!(g3d.count(DrawKind::Line), 3);
        assert_eq!(g3d.count(DrawKind::Text), 0);
    }
}
