//! Backbone, trace, ribbons and strands.
//!
//! Every family walks the visible segments of each polymer frame. Segment
//! `i` spans control points `i..i + 1`; the hermite neighbours are
//! `prev(i)` and `next(i, 2)`, clamped to the chain.

use super::mesh::render_mesh;
use super::{RenderContext, Renderer};
use crate::camera::Projection;
use crate::error::ShapeError;
use crate::g3d::{Endcaps, HermiteRibbon, PoolGuard, ScreenPoint, ScreenPool};
use crate::mesh::Mesh;
use crate::model::PolymerKind;
use crate::polymer::frame::PolymerFrame;
use crate::polymer::spline::catmull_rom;
use crate::polymer::{Mps, MpsFamily, SegmentStyle};
use crate::shape::AnyShape;

/// Samples per span of the in-motion trace centreline.
pub const MOTION_SEGMENTS: usize = 4;

/// Run `draw` over every drawable polymer of `mps`.
pub(crate) fn for_each_frame(
    mps: &Mps,
    ctx: &mut RenderContext<'_>,
    mut draw: impl FnMut(&PolymerFrame<'_>, &mut RenderContext<'_>),
) {
    let (model, options, projection, pool) = (ctx.model, ctx.options, ctx.projection, ctx.pool);
    for style in mps.polymers() {
        let Some(frame) = PolymerFrame::new(model, style, &options.geometry, projection, pool)
        else {
            continue;
        };
        if frame.polymer().kind() == PolymerKind::Carbohydrate || frame.visible().is_empty() {
            continue;
        }
        draw(&frame, ctx);
    }
}

/// The four hermite control points of segment `i` taken from `screens`.
pub(crate) fn hermite_points(
    screens: &[ScreenPoint],
    frame: &PolymerFrame<'_>,
    i: usize,
) -> [ScreenPoint; 4] {
    [
        screens[frame.prev(i)],
        screens[i],
        screens[frame.next(i, 1)],
        screens[frame.next(i, 2)],
    ]
}

/// The prebuilt mesh of segment `i`, when `style` wants one this frame.
pub(crate) fn segment_mesh<'f>(
    frame: &PolymerFrame<'f>,
    style: SegmentStyle,
    i: usize,
    projection: &dyn Projection,
) -> Option<&'f Mesh> {
    let _ = style.mesh_request(frame, projection, i)?;
    frame.style().mesh(i)
}

/// Variable-width tube for segment `i`.
pub(crate) fn render_conic(
    frame: &PolymerFrame<'_>,
    i: usize,
    special: bool,
    ctx: &mut RenderContext<'_>,
) {
    let colix = frame.lead_colix(i);
    if let Some(mesh) = segment_mesh(frame, SegmentStyle::Conic { special }, i, ctx.projection) {
        render_mesh(mesh, colix, ctx);
        return;
    }
    let diameters = frame.diameters(ctx.projection, i, frame.segment_mads(i, special));
    let points = hermite_points(frame.control_screens(), frame, i);
    ctx.g3d.fill_hermite(colix, frame.tension(), diameters, points);
}

/// Projected ribbon edges for one frame.
pub(crate) struct RibbonEdges<'a> {
    pub top: PoolGuard<'a, ScreenPoint>,
    pub bottom: PoolGuard<'a, ScreenPoint>,
}

impl<'a> RibbonEdges<'a> {
    /// Proteins are centred on the trace; nucleic ribbons hang off one side
    /// toward the bases.
    pub fn new(frame: &PolymerFrame<'a>, projection: &dyn Projection, pool: &'a ScreenPool) -> Self {
        let (top, bottom) = if frame.polymer().kind().is_nucleic() {
            (1.0, 0.0)
        } else {
            (0.5, -0.5)
        };
        Self {
            top: frame.offset_screens(projection, pool, top),
            bottom: frame.offset_screens(projection, pool, bottom),
        }
    }
}

/// Flat ribbon patch for segment `i`.
pub(crate) fn render_ribbon(
    frame: &PolymerFrame<'_>,
    i: usize,
    edges: &RibbonEdges<'_>,
    ctx: &mut RenderContext<'_>,
) {
    let colix = frame.lead_colix(i);
    if let Some(mesh) = segment_mesh(frame, SegmentStyle::Ribbon, i, ctx.projection) {
        render_mesh(mesh, colix, ctx);
        return;
    }
    let ribbon = HermiteRibbon {
        tension: frame.tension(),
        fill: true,
        border: ctx.options.geometry.ribbon_border,
        top: hermite_points(&edges.top, frame, i),
        bottom: hermite_points(&edges.bottom, frame, i),
        aspect_ratio: frame.aspect_ratio() as i32,
    };
    ctx.g3d.draw_hermite_ribbon(colix, &ribbon);
}

fn render_backbone(frame: &PolymerFrame<'_>, ctx: &mut RenderContext<'_>) {
    let leads = frame.lead_screens();
    let monomers = frame.polymer().monomers();
    for i in frame.visible().iter() {
        let j = i + 1;
        if j >= frame.count() || !ctx.model.is_atom_displayed(monomers[j].lead_atom) {
            continue;
        }
        let (a, b) = (leads[i], leads[j]);
        let colixes = [frame.lead_colix(i), frame.lead_colix(j)];
        let mad = frame.mad(i);
        if mad == 1 {
            ctx.g3d.draw_line(colixes[0], colixes[1], a, b);
        } else {
            let d = ctx.projection.scale_to_screen((a.z + b.z) / 2, mad);
            ctx.g3d.fill_cylinder(colixes, Endcaps::Spherical, d, a, b);
        }
    }
}

fn render_trace(frame: &PolymerFrame<'_>, ctx: &mut RenderContext<'_>) {
    if ctx.options.display.in_motion {
        render_trace_lines(frame, ctx);
        return;
    }
    for i in frame.visible().iter() {
        render_conic(frame, i, false, ctx);
    }
}

/// Thin centreline used while the view is moving.
fn render_trace_lines(frame: &PolymerFrame<'_>, ctx: &mut RenderContext<'_>) {
    let n = frame.count();
    let samples = catmull_rom(&frame.control_points()[..n], MOTION_SEGMENTS);
    let pool = ctx.pool;
    let mut screens = pool.acquire(samples.len());
    for (s, &p) in screens.iter_mut().zip(&samples) {
        *s = ctx.projection.transform_point(p);
    }
    for i in frame.visible().iter() {
        let colix = frame.lead_colix(i);
        let first = i * MOTION_SEGMENTS;
        for k in first..(first + MOTION_SEGMENTS).min(screens.len() - 1) {
            ctx.g3d.draw_line(colix, colix, screens[k], screens[k + 1]);
        }
    }
}

fn render_ribbons(frame: &PolymerFrame<'_>, ctx: &mut RenderContext<'_>) {
    let edges = RibbonEdges::new(frame, ctx.projection, ctx.pool);
    for i in frame.visible().iter() {
        render_ribbon(frame, i, &edges, ctx);
    }
}

/// Offsets in half-widths of `count` strands spread evenly across the
/// ribbon, outermost strands on the edges.
#[must_use]
pub fn strand_offsets(count: usize) -> Vec<f32> {
    if count <= 1 {
        return vec![0.0];
    }
    let step = 1.0 / (count - 1) as f32;
    (0..count).map(|k| k as f32 * step - 0.5).collect()
}

fn render_strands(frame: &PolymerFrame<'_>, ctx: &mut RenderContext<'_>) {
    let pool = ctx.pool;
    let count = usize::from(ctx.options.geometry.strand_count);
    for offset in strand_offsets(count) {
        let screens = frame.offset_screens(ctx.projection, pool, offset);
        for i in frame.visible().iter() {
            let points = hermite_points(&screens, frame, i);
            ctx.g3d.draw_hermite(frame.lead_colix(i), frame.tension(), points);
        }
    }
}

/// Draws the backbone, trace, ribbons and strands families.
#[derive(Debug, Default)]
pub struct MpsRenderer;

impl Renderer for MpsRenderer {
    fn render(&mut self, shape: &AnyShape, ctx: &mut RenderContext<'_>) -> Result<(), ShapeError> {
        let AnyShape::Mps(mps) = shape else {
            return Ok(());
        };
        match mps.family() {
            MpsFamily::Backbone => for_each_frame(mps, ctx, render_backbone),
            MpsFamily::Trace => for_each_frame(mps, ctx, render_trace),
            MpsFamily::Ribbons => for_each_frame(mps, ctx, render_ribbons),
            MpsFamily::Strands => for_each_frame(mps, ctx, render_strands),
            MpsFamily::Cartoon | MpsFamily::Rockets => {
                return super::cartoon::CartoonRenderer.render(shape, ctx);
            }
        }
        Ok(())
    }
}
