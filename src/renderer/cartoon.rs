//! Cartoon and rockets.
//!
//! Coil is a rope, helices and sheets are ribbons ending in an arrowhead.
//! Rocket helices are collected during the segment pass and drawn afterwards
//! as one cylinder per run of equally styled segments, capped by a cone.

use super::polymer::{
    for_each_frame, hermite_points, render_conic, render_ribbon, RibbonEdges,
};
use super::{RenderContext, Renderer};
use crate::error::ShapeError;
use crate::g3d::{Endcaps, HermiteRibbon};
use crate::polymer::frame::PolymerFrame;
use crate::polymer::{MpsFamily, SegmentStyle};
use crate::shape::AnyShape;

/// Half-widths of the arrowhead base at segment `i` and at its predecessor.
const ARROW_BASE: f32 = 0.7;
const ARROW_BACK: f32 = 1.0;
/// Pixel diameter of the arrowhead base outline.
const ARROW_BORDER_DIAMETER: i32 = 3;
/// Rocket ends closer than this (angstroms) get no cone.
const MIN_CONE_LENGTH: f32 = 0.05;

fn render_arrowhead(frame: &PolymerFrame<'_>, i: usize, ctx: &mut RenderContext<'_>) {
    let colix = frame.lead_colix(i);
    let projection = ctx.projection;
    let prev = frame.prev(i);
    let tip = frame.control_screens()[frame.next(i, 1)];
    let top = frame.offset_screen(projection, i, ARROW_BASE);
    let bottom = frame.offset_screen(projection, i, -ARROW_BASE);
    let ribbon = HermiteRibbon {
        tension: frame.tension(),
        fill: true,
        border: ctx.options.geometry.ribbon_border,
        top: [frame.offset_screen(projection, prev, ARROW_BACK), top, tip, tip],
        bottom: [frame.offset_screen(projection, prev, -ARROW_BACK), bottom, tip, tip],
        aspect_ratio: frame.aspect_ratio() as i32,
    };
    ctx.g3d.draw_hermite_ribbon(colix, &ribbon);
    if ribbon.border {
        ctx.g3d
            .fill_cylinder([colix; 2], Endcaps::Spherical, ARROW_BORDER_DIAMETER, top, bottom);
    }
}

/// Consecutive rocket segments sharing color and width, as `(start, end)`
/// inclusive.
fn rocket_runs(frame: &PolymerFrame<'_>, segments: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &i in segments {
        match runs.last_mut() {
            Some((start, end))
                if *end + 1 == i
                    && frame.lead_colix(*start) == frame.lead_colix(i)
                    && frame.mad(*start) == frame.mad(i) =>
            {
                *end = i;
            }
            _ => runs.push((i, i)),
        }
    }
    runs
}

fn render_rocket(frame: &PolymerFrame<'_>, start: usize, end: usize, ctx: &mut RenderContext<'_>) {
    let colix = frame.lead_colix(start);
    let mad = frame.mad(start);
    let screens = frame.control_screens();
    let points = frame.control_points();
    let (first, before_end, last) = (screens[start], screens[end], screens[end + 1]);
    let projection = ctx.projection;
    if points[end + 1].distance(points[end]) <= MIN_CONE_LENGTH {
        let d = projection.scale_to_screen((first.z + last.z) / 2, mad);
        ctx.g3d.fill_cylinder([colix; 2], Endcaps::Flat, d, first, last);
        return;
    }
    if start < end {
        let d = projection.scale_to_screen((first.z + before_end.z) / 2, mad);
        ctx.g3d.fill_cylinder([colix; 2], Endcaps::Flat, d, first, before_end);
    }
    let d = projection.scale_to_screen(before_end.z, mad + mad / 4);
    ctx.g3d.fill_cone(colix, Endcaps::Flat, d, before_end, last);
}

fn render_cartoon(frame: &PolymerFrame<'_>, rockets: bool, ctx: &mut RenderContext<'_>) {
    let family = if rockets {
        MpsFamily::Rockets
    } else {
        MpsFamily::Cartoon
    };
    let prefer_rockets = ctx.options.geometry.cartoon_rockets;
    let edges = RibbonEdges::new(frame, ctx.projection, ctx.pool);
    let mut deferred = Vec::new();
    let visible: Vec<usize> = frame.visible().iter().collect();
    for &i in visible.iter().rev() {
        match family.segment_style(frame, i, prefer_rockets) {
            SegmentStyle::Rocket => deferred.push(i),
            SegmentStyle::Ribbon => render_ribbon(frame, i, &edges, ctx),
            SegmentStyle::Arrowhead => render_arrowhead(frame, i, ctx),
            SegmentStyle::Strand => {
                let points = hermite_points(&edges.top, frame, i);
                ctx.g3d.draw_hermite(frame.lead_colix(i), frame.tension(), points);
            }
            SegmentStyle::Conic { .. } | SegmentStyle::Cylinder => {
                render_conic(frame, i, true, ctx);
            }
        }
    }
    deferred.reverse();
    for (start, end) in rocket_runs(frame, &deferred) {
        render_rocket(frame, start, end, ctx);
    }
}

/// Draws the cartoon and rockets families.
#[derive(Debug, Default)]
pub struct CartoonRenderer;

impl Renderer for CartoonRenderer {
    fn render(&mut self, shape: &AnyShape, ctx: &mut RenderContext<'_>) -> Result<(), ShapeError> {
        let AnyShape::Mps(mps) = shape else {
            return Ok(());
        };
        let rockets = match mps.family() {
            MpsFamily::Cartoon => false,
            MpsFamily::Rockets => true,
            _ => return Ok(()),
        };
        for_each_frame(mps, ctx, |frame, ctx| render_cartoon(frame, rockets, ctx));
        Ok(())
    }
}
