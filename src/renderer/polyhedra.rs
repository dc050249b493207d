//! Coordination polyhedra.

use super::{RenderContext, Renderer};
use crate::error::ShapeError;
use crate::g3d::{Colix, Shading};
use crate::shape::polyhedra::{EdgeMode, Polyhedron};
use crate::shape::AnyShape;

fn render_polyhedron(p: &Polyhedron, edges: EdgeMode, ctx: &mut RenderContext<'_>) {
    let Some(center) = ctx.model.atoms().get(p.central_atom) else {
        return;
    };
    let colix = Colix::inherit(p.colix, center.colix);
    let pool = ctx.pool;
    let mut screens = pool.acquire(p.vertices().len());
    for (s, &v) in screens.iter_mut().zip(p.vertices()) {
        *s = ctx.projection.transform_point(v);
    }
    for (face, &normix) in p.faces().iter().zip(p.normixes()) {
        let points = face.map(|v| screens[v]);
        ctx.g3d.fill_triangle(colix, points, Shading::Normix(normix));
        let outline = match edges {
            EdgeMode::None => false,
            EdgeMode::All => true,
            EdgeMode::Front => normix
                .vector()
                .is_some_and(|n| ctx.projection.transform_vector(n).z > 0.0),
        };
        if outline {
            for k in 0..3 {
                ctx.g3d.draw_line(colix, colix, points[k], points[(k + 1) % 3]);
            }
        }
    }
}

/// Draws every visible polyhedron around a displayed central atom.
#[derive(Debug, Default)]
pub struct PolyhedraRenderer;

impl Renderer for PolyhedraRenderer {
    fn render(&mut self, shape: &AnyShape, ctx: &mut RenderContext<'_>) -> Result<(), ShapeError> {
        let AnyShape::Polyhedra(polyhedra) = shape else {
            return Ok(());
        };
        for p in polyhedra.polyhedra() {
            if p.visible && ctx.model.is_atom_displayed(p.central_atom) {
                render_polyhedron(p, polyhedra.edges(), ctx);
            }
        }
        Ok(())
    }
}
