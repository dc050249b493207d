//! Dot surfaces and geodesic surfaces.

use glam::Vec3;

use super::{RenderContext, Renderer};
use crate::error::ShapeError;
use crate::g3d::geodesic::Geodesic;
use crate::g3d::{Colix, ScreenPoint, Shading};
use crate::model::Element;
use crate::shape::AnyShape;
use crate::surface::convex::{get_points, DotMap};
use crate::surface::Dots;

/// Pixel diameter of a surface dot.
pub const DOT_DIAMETER: i32 = 3;
/// Atoms smaller than this on screen (pixels) get single-pixel dots.
pub const PIXEL_DOT_MAX_DIAMETER: i32 = 16;

fn draw_dots(
    map: &DotMap,
    colix: Colix,
    center: Vec3,
    radius: f32,
    level: usize,
    pixels: bool,
    ctx: &mut RenderContext<'_>,
) {
    for p in get_points(map, center, radius, level) {
        let s = ctx.projection.transform_point(p);
        if pixels {
            ctx.g3d.draw_pixel(colix, s);
        } else {
            ctx.g3d.fill_sphere(colix, DOT_DIAMETER, s);
        }
    }
}

/// Flat-shaded geodesic faces whose three vertices are all exposed.
fn draw_faces(
    map: &DotMap,
    colix: Colix,
    center: Vec3,
    radius: f32,
    level: usize,
    ctx: &mut RenderContext<'_>,
) {
    let geodesic = Geodesic::get();
    let vertices = geodesic.vertices(level);
    let pool = ctx.pool;
    let mut screens = pool.acquire(vertices.len());
    for k in map.iter() {
        if let (Some(s), Some(&v)) = (screens.get_mut(k), vertices.get(k)) {
            *s = ctx.projection.transform_point(center + v * radius);
        }
    }
    for face in &geodesic.level(level).faces {
        let [a, b, c] = face.map(usize::from);
        if !(map.get(a) && map.get(b) && map.get(c)) {
            continue;
        }
        let points: [ScreenPoint; 3] = [screens[a], screens[b], screens[c]];
        let shade = ctx.lighting.surface_shade(points[0], points[1], points[2]);
        ctx.g3d.fill_triangle(colix, points, Shading::Flat(shade));
    }
}

/// Draws dot surfaces and, for the geo variant, their filled faces.
#[derive(Debug, Default)]
pub struct DotsRenderer;

impl DotsRenderer {
    fn render_dots(dots: &Dots, ctx: &mut RenderContext<'_>) {
        let model = ctx.model;
        let display = &ctx.options.display;
        let low_detail =
            display.in_motion && dots.dot_count() > ctx.options.surface.motion_dot_threshold;
        let show_hydrogens = display.show_hydrogens;
        for i in dots.dots_on().iter() {
            let (Some(map), Some(atom)) = (dots.map(i), model.atoms().get(i)) else {
                continue;
            };
            if !model.is_atom_displayed(i) || (atom.element == Element::H && !show_hydrogens) {
                continue;
            }
            let s = ctx.projection.transform_point(atom.position);
            if !ctx.projection.is_in_display_range(s.x, s.y) {
                continue;
            }
            let colix = Colix::inherit(dots.colixes().get(i).copied().unwrap_or_default(), atom.colix);
            let radius = atom.vdw_radius() + dots.probe_radius();
            if dots.is_geo() && !low_detail {
                draw_faces(map, colix, atom.position, radius, dots.level(), ctx);
                continue;
            }
            let diameter = ctx.projection.scale_to_screen(s.z, (radius * 2000.0) as i32);
            let pixels = low_detail || diameter < PIXEL_DOT_MAX_DIAMETER;
            draw_dots(map, colix, atom.position, radius, dots.level(), pixels, ctx);
        }
    }
}

impl Renderer for DotsRenderer {
    fn render(&mut self, shape: &AnyShape, ctx: &mut RenderContext<'_>) -> Result<(), ShapeError> {
        if let AnyShape::Dots(dots) = shape {
            Self::render_dots(dots, ctx);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g3d::recording::{DrawKind, RecordingGraphics};
    use crate::g3d::{ColorTable, ScreenPool};
    use crate::model::{Atom, MolecularModel};
    use crate::options::Options;
    use crate::renderer::test_support::{viewport_at, with_context};
    use crate::shape::{ShapeContext, Sizable};

    fn options() -> Options {
        let mut options = Options::default();
        options.surface.geodesic_level = 1;
        options.surface.probe_radius = 0.0;
        options
    }

    fn render(model: &MolecularModel, geo: bool, options: &Options) -> (RecordingGraphics, usize) {
        let mut colors = ColorTable::new();
        let mut dots = Dots::new(model, options, geo);
        {
            let mut sctx = ShapeContext {
                model,
                colors: &mut colors,
                options,
            };
            dots.set_size(1, &model.all_atoms(), &mut sctx);
        }
        let shape = AnyShape::Dots(dots);
        let view = viewport_at(Vec3::ZERO, 3.0);
        let pool = ScreenPool::new();
        let mut g3d = RecordingGraphics::new(500, 500);
        with_context(model, options, &view, &pool, &mut g3d, |ctx| {
            DotsRenderer.render(&shape, ctx).unwrap();
        });
        let outstanding = pool.outstanding();
        (g3d, outstanding)
    }

    fn lone_carbon() -> MolecularModel {
        MolecularModel::new(vec![Atom::new(Element::C, "C", Vec3::ZERO)], Vec::new()).unwrap()
    }

    #[test]
    fn isolated_atom_shows_every_dot() {
        let (g3d, _) = render(&lone_carbon(), false, &options());
        assert_eq!(g3d.count(DrawKind::Sphere), 42);
    }

    #[test]
    fn busy_moving_view_uses_pixels() {
        let mut options = options();
        options.display.in_motion = true;
        options.surface.motion_dot_threshold = 10;
        let (g3d, _) = render(&lone_carbon(), false, &options);
        assert_eq!(g3d.count(DrawKind::Pixel), 42);
        assert_eq!(g3d.count(DrawKind::Sphere), 0);
    }

    #[test]
    fn geo_surface_fills_exposed_faces() {
        let (g3d, outstanding) = render(&lone_carbon(), true, &options());
        assert_eq!(g3d.count(DrawKind::Triangle), 80);
        assert_eq!(outstanding, 0);

        let mut options = options();
        options.display.in_motion = true;
        options.surface.motion_dot_threshold = 10;
        let (g3d, _) = render(&lone_carbon(), true, &options);
        assert_eq!(g3d.count(DrawKind::Triangle), 0);
        assert_eq!(g3d.count(DrawKind::Pixel), 42);
    }

    #[test]
    fn buried_faces_are_not_filled() {
        let atoms = vec![
            Atom::new(Element::C, "C1", Vec3::ZERO),
            Atom::new(Element::C, "C2", Vec3::new(1.5, 0.0, 0.0)),
        ];
        let model = MolecularModel::new(atoms, Vec::new()).unwrap();
        let (g3d, _) = render(&model, true, &options());
        let triangles = g3d.count(DrawKind::Triangle);
        assert!(triangles > 0);
        assert!(triangles < 160);
    }

    #[test]
    fn hidden_atoms_have_no_dots() {
        let mut model = lone_carbon();
        model.set_hidden([0].into_iter().collect());
        let (g3d, _) = render(&model, false, &options());
        assert!(g3d.calls.is_empty());
    }
}
