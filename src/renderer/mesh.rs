//! Polygon meshes: user meshes and polymer segment meshes.

use super::{RenderContext, Renderer};
use crate::error::ShapeError;
use crate::g3d::{Colix, Endcaps, Normix, ScreenPoint, Shading};
use crate::mesh::Mesh;
use crate::shape::AnyShape;

/// Pixel diameter of a mesh vertex dot.
pub const POINT_DIAMETER: i32 = 4;

/// Draw one mesh in `colix`. Vertices are projected once into a pooled
/// buffer.
///
/// Per-polygon colors win over the color of a polygon's first vertex, which
/// wins over `colix`. A mesh with a polygon indexing past its vertices is
/// skipped with a warning.
pub fn render_mesh(mesh: &Mesh, colix: Colix, ctx: &mut RenderContext<'_>) {
    let n = mesh.vertex_count();
    if !mesh.visible || n == 0 {
        return;
    }
    if let Some(bad) = mesh
        .polygons()
        .iter()
        .find(|p| p.indices().iter().any(|&i| i >= n))
    {
        log::warn!(
            "mesh {}: polygon {:?} past vertex count {n}, not drawn",
            mesh.id(),
            bad.indices()
        );
        return;
    }
    let pool = ctx.pool;
    let mut screens = pool.acquire(n);
    for (s, &v) in screens.iter_mut().zip(mesh.vertices()) {
        *s = ctx.projection.transform_point(v);
    }
    let cull = mesh.front_only && !mesh.is_two_sided();
    let facing: Vec<bool> = (0..n)
        .map(|i| {
            !cull
                || mesh
                    .vertex_normal(i)
                    .is_none_or(|v| ctx.projection.transform_vector(v).z >= 0.0)
        })
        .collect();

    let display = &ctx.options.display;
    let low_detail = display.in_motion && n > ctx.options.surface.motion_dot_threshold;
    if mesh.show_points || mesh.polygon_count() == 0 || low_detail {
        for (i, (s, &front)) in screens.iter().zip(&facing).enumerate() {
            if front {
                let c = mesh.vertex_colix(i).unwrap_or(colix);
                ctx.g3d.fill_sphere(c, POINT_DIAMETER, *s);
            }
        }
    }
    if low_detail || !(mesh.fill_triangles || mesh.draw_triangles) {
        return;
    }

    let normix = |i: usize| mesh.normixes().get(i).copied().unwrap_or(Normix::NULL);
    let screen = |i: usize| screens.get(i).copied().unwrap_or_default();
    for (p, polygon) in mesh.polygons().iter().enumerate() {
        let idx = polygon.indices();
        let check = idx
            .iter()
            .enumerate()
            .filter(|&(_, &v)| facing.get(v).copied().unwrap_or(false))
            .fold(0u32, |m, (k, _)| m | 1 << k);
        let colix = mesh
            .polygon_colix(p)
            .or_else(|| idx.first().and_then(|&v| mesh.vertex_colix(v)))
            .unwrap_or(colix);
        match *idx {
            [a, b, _] if polygon.is_line() => {
                draw_edge(mesh, colix, screen(a), screen(b), ctx);
            }
            [a, b, c] => {
                let pts = [screen(a), screen(b), screen(c)];
                if mesh.fill_triangles && check == 0b111 {
                    let shading = Shading::Vertex([normix(a), normix(b), normix(c)]);
                    ctx.g3d.fill_triangle(colix, pts, shading);
                }
                if mesh.draw_triangles {
                    draw_outline(&pts, check, colix, ctx);
                }
            }
            [a, b, c, d] => {
                let pts = [screen(a), screen(b), screen(c), screen(d)];
                if mesh.fill_triangles && check == 0b1111 {
                    let normixes = [normix(a), normix(b), normix(c), normix(d)];
                    ctx.g3d.fill_quadrilateral(colix, pts, Some(normixes));
                }
                if mesh.draw_triangles {
                    draw_outline(&pts, check, colix, ctx);
                }
            }
            _ => log::warn!("mesh {}: skipping {}-gon", mesh.id(), idx.len()),
        }
    }
}

fn draw_edge(mesh: &Mesh, colix: Colix, a: ScreenPoint, b: ScreenPoint, ctx: &mut RenderContext<'_>) {
    if mesh.width_mad > 0 {
        let d = ctx
            .projection
            .scale_to_screen((a.z + b.z) / 2, i32::from(mesh.width_mad));
        ctx.g3d.fill_cylinder([colix; 2], Endcaps::Spherical, d, a, b);
    } else {
        ctx.g3d.draw_line(colix, colix, a, b);
    }
}

/// Edges between consecutive corners whose bits are both set in `check`.
fn draw_outline(pts: &[ScreenPoint], check: u32, colix: Colix, ctx: &mut RenderContext<'_>) {
    let n = pts.len();
    for k in 0..n {
        let j = (k + 1) % n;
        if check & (1 << k) != 0 && check & (1 << j) != 0 {
            ctx.g3d.draw_line(colix, colix, pts[k], pts[j]);
        }
    }
}

/// Draws every visible mesh of a collection.
#[derive(Debug, Default)]
pub struct MeshRenderer;

impl Renderer for MeshRenderer {
    fn render(&mut self, shape: &AnyShape, ctx: &mut RenderContext<'_>) -> Result<(), ShapeError> {
        let AnyShape::Mesh(collection) = shape else {
            return Ok(());
        };
        for mesh in collection.meshes() {
            render_mesh(mesh, mesh.colix, ctx);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::g3d::recording::{DrawCall, DrawKind, RecordingGraphics};
    use crate::g3d::ScreenPool;
    use crate::mesh::{MeshCollection, MeshProperty};
    use crate::model::MolecularModel;
    use crate::options::Options;
    use crate::renderer::test_support::{viewport_at, with_context};

    fn square() -> Mesh {
        let mut mesh = Mesh::new("sq", Colix::GOLD);
        for p in [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ] {
            let _ = mesh.add_vertex_copy(p);
        }
        let _ = mesh.add_quad(0, 1, 2, 3).unwrap();
        mesh.initialize().unwrap();
        mesh
    }

    fn draw(mesh: &Mesh, options: &Options) -> (RecordingGraphics, usize) {
        let model = MolecularModel::default();
        let view = viewport_at(Vec3::ZERO, 2.0);
        let pool = ScreenPool::new();
        let mut g3d = RecordingGraphics::new(500, 500);
        with_context(&model, options, &view, &pool, &mut g3d, |ctx| {
            render_mesh(mesh, mesh.colix, ctx);
        });
        let outstanding = pool.outstanding();
        (g3d, outstanding)
    }

    #[test]
    fn quad_is_one_quadrilateral_call() {
        let (g3d, outstanding) = draw(&square(), &Options::default());
        assert_eq!(g3d.calls.len(), 1);
        assert_eq!(g3d.count(DrawKind::Quadrilateral), 1);
        assert_eq!(g3d.count(DrawKind::Triangle), 0);
        assert_eq!(outstanding, 0);
    }

    #[test]
    fn back_faces_are_culled_when_front_only() {
        let mut mesh = square();
        mesh.front_only = true;
        let (g3d, _) = draw(&mesh, &Options::default());
        assert_eq!(g3d.count(DrawKind::Quadrilateral), 1);
        mesh.set_inside_out(true);
        mesh.initialize().unwrap();
        let (g3d, _) = draw(&mesh, &Options::default());
        assert_eq!(g3d.calls.len(), 0);
    }

    #[test]
    fn points_and_wireframe() {
        let mut mesh = square();
        mesh.show_points = true;
        mesh.fill_triangles = false;
        mesh.draw_triangles = true;
        let (g3d, _) = draw(&mesh, &Options::default());
        assert_eq!(g3d.count(DrawKind::Sphere), 4);
        assert_eq!(g3d.count(DrawKind::Line), 4);

        let mut options = Options::default();
        options.display.in_motion = true;
        options.surface.motion_dot_threshold = 2;
        let (g3d, _) = draw(&mesh, &options);
        assert_eq!(g3d.count(DrawKind::Sphere), 4);
        assert_eq!(g3d.count(DrawKind::Line), 0);
    }

    #[test]
    fn stored_lines_use_width() {
        let mut mesh = Mesh::new("l", Colix::RED);
        let _ = mesh.add_vertex_copy(Vec3::ZERO);
        let _ = mesh.add_vertex_copy(Vec3::X);
        let _ = mesh.add_polygon(&[0, 1]).unwrap();
        mesh.initialize().unwrap();
        let (g3d, _) = draw(&mesh, &Options::default());
        assert_eq!(g3d.count(DrawKind::Line), 1);
        mesh.width_mad = 300;
        let (g3d, _) = draw(&mesh, &Options::default());
        assert_eq!(g3d.count(DrawKind::Cylinder), 1);
    }

    #[test]
    fn shrunk_mesh_draws_only_its_remaining_points() {
        let mut mesh = square();
        mesh.set_vertex_count(2);
        let (g3d, outstanding) = draw(&mesh, &Options::default());
        assert_eq!(g3d.count(DrawKind::Quadrilateral), 0);
        assert_eq!(g3d.count(DrawKind::Sphere), 2);
        assert_eq!(outstanding, 0);
    }

    #[test]
    fn polygon_color_overrides_vertex_and_mesh_color() {
        let mut mesh = square();
        let (g3d, _) = draw(&mesh, &Options::default());
        assert!(matches!(
            g3d.calls[0],
            DrawCall::Quadrilateral { colix: Colix::GOLD, .. }
        ));
        mesh.set_vertex_colixes(vec![Colix::BLUE; 4]).unwrap();
        let (g3d, _) = draw(&mesh, &Options::default());
        assert!(matches!(
            g3d.calls[0],
            DrawCall::Quadrilateral { colix: Colix::BLUE, .. }
        ));
        mesh.set_polygon_colixes(vec![Colix::RED]).unwrap();
        let (g3d, _) = draw(&mesh, &Options::default());
        assert!(matches!(
            g3d.calls[0],
            DrawCall::Quadrilateral { colix: Colix::RED, .. }
        ));
    }

    #[test]
    fn collection_built_from_properties_renders_its_quad() {
        let mut collection = MeshCollection::new("mesh", Colix::GOLD);
        let corners = vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ];
        collection
            .set_property(MeshProperty::Vertices(corners.clone()))
            .unwrap();
        collection
            .set_property(MeshProperty::Polygons(vec![vec![0, 1, 2, 3]]))
            .unwrap();
        // a shorter vertex list drops the quad instead of leaving it dangling
        collection
            .set_property(MeshProperty::Vertices(corners[..2].to_vec()))
            .unwrap();
        let (g3d, _) = draw(&collection.meshes()[0], &Options::default());
        assert_eq!(g3d.count(DrawKind::Quadrilateral), 0);

        collection.set_property(MeshProperty::Vertices(corners)).unwrap();
        collection
            .set_property(MeshProperty::Polygons(vec![vec![0, 1, 2, 3]]))
            .unwrap();
        let (g3d, _) = draw(&collection.meshes()[0], &Options::default());
        assert_eq!(g3d.count(DrawKind::Quadrilateral), 1);
    }

    #[test]
    fn collection_renderer_draws_visible_meshes() {
        let mut collection = MeshCollection::new("mesh", Colix::GOLD);
        *collection.create(Some("a")) = square();
        let shape = AnyShape::Mesh(collection);
        let model = MolecularModel::default();
        let options = Options::default();
        let view = viewport_at(Vec3::ZERO, 2.0);
        let pool = ScreenPool::new();
        let mut g3d = RecordingGraphics::new(500, 500);
        with_context(&model, &options, &view, &pool, &mut g3d, |ctx| {
            MeshRenderer.render(&shape, ctx).unwrap();
        });
        assert_eq!(g3d.count(DrawKind::Quadrilateral), 1);
    }
}
