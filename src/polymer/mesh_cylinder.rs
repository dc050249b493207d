//! Tube and flattened-ribbon meshes for one polymer segment.
//!
//! A segment mesh is a stack of `n_hermites` vertex rings, each `n_per`
//! vertices around a hermite sample of the centerline, joined by quads.

use std::f32::consts::TAU;

use glam::{Mat3, Vec3};

use super::spline::hermite_list;
use crate::error::ShapeError;
use crate::g3d::Colix;
use crate::mesh::Mesh;

/// Reference direction for the ring start on round tubes.
const Z_REF: Vec3 = Vec3::new(0.1345, 0.5426, 0.3675);

/// Chain geometry a segment mesh is sampled from.
#[derive(Debug, Clone, Copy)]
pub struct SegmentSource<'a> {
    /// Control points, length `n + 1`.
    pub control_points: &'a [Vec3],
    /// Wing vectors, length `n + 1`; `None` forces round tubes.
    pub wing_vectors: Option<&'a [Vec3]>,
    /// Hermite tension.
    pub tension: f32,
    /// Clamped hermite level.
    pub hermite_level: usize,
}

impl SegmentSource<'_> {
    /// Ring count per segment.
    #[must_use]
    pub fn hermite_count(&self) -> usize {
        (self.hermite_level + 1) * 2
    }

    /// Vertices per ring.
    #[must_use]
    pub fn ring_size(&self) -> usize {
        self.hermite_count() * 2 - 2
    }

    fn neighbourhood(&self, points: &[Vec3], i: usize) -> [Vec3; 5] {
        let last = points.len() - 1;
        [
            points[i.saturating_sub(1)],
            points[i],
            points[(i + 1).min(last)],
            points[(i + 2).min(last)],
            points[(i + 3).min(last)],
        ]
    }
}

/// Diameters in milliangstroms at the start, middle and end of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentMads {
    /// Start.
    pub beg: i32,
    /// Middle.
    pub mid: i32,
    /// End.
    pub end: i32,
}

/// Build the mesh for segment `i`.
///
/// Returns `Ok(None)` when the segment has no length. An `aspect_ratio` other
/// than 1 flattens the tube along the wing vectors, when they are available.
pub fn create_mesh_cylinder(
    id: &str,
    colix: Colix,
    source: &SegmentSource<'_>,
    i: usize,
    mads: SegmentMads,
    aspect_ratio: f32,
) -> Result<Option<Mesh>, ShapeError> {
    let points = source.control_points;
    if points.len() < 2 || i + 1 >= points.len() {
        return Ok(None);
    }
    let chord = points[i] - points[(i + 1).min(points.len() - 1)];
    if chord.length_squared() == 0.0 {
        return Ok(None);
    }
    let wings = source
        .wing_vectors
        .filter(|w| w.len() == points.len() && (aspect_ratio - 1.0).abs() > f32::EPSILON);
    let eccentric = wings.is_some();

    let n_hermites = source.hermite_count();
    let n_per = source.ring_size();
    let r1 = mads.beg as f32 / 2000.0;
    let r2 = mads.mid as f32 / 2000.0;
    let r3 = mads.end as f32 / 2000.0;
    let dr = (r2 - r1) / n_hermites as f32 * 2.0;
    let dr2 = (r3 - r2) / n_hermites as f32 * 2.0;

    let control = hermite_list(
        source.tension,
        source.neighbourhood(points, i),
        n_hermites,
    );
    let wing_hermites = wings.map(|w| {
        hermite_list(source.tension, source.neighbourhood(w, i), n_hermites)
    });

    let mut mesh = Mesh::new(id, colix);
    let first = control[1] - control[0];
    let wing0 = first.cross(first.cross(Z_REF));
    let i_mid = n_hermites / 2;
    let flip_a = (n_per + 2) / 4;
    let flip_b = (3 * n_per + 2) / 4;
    let mut ring_start = 0;

    for p in 0..n_hermites {
        let norm = control[p + 1] - control[p];
        let axis = norm.try_normalize().unwrap_or(Vec3::Z);
        let (mut wing, mut wing1) = match &wing_hermites {
            Some(h) => (h[p], h[p]),
            None => (norm.cross(wing0), Vec3::ZERO),
        };
        wing = wing
            .try_normalize()
            .unwrap_or_else(|| axis.any_orthonormal_vector());
        if eccentric {
            wing *= 2.0 / aspect_ratio;
        }
        wing *= if p < i_mid {
            r1 + dr * p as f32
        } else {
            r2 + dr2 * (p - i_mid) as f32
        };

        let rotation = Mat3::from_axis_angle(axis, TAU / n_per as f32);
        for k in 0..n_per {
            wing = rotation * wing;
            let mut offset = wing;
            if eccentric {
                if k == flip_a || k == flip_b {
                    wing1 = -wing1;
                }
                offset += wing1;
            }
            let _ = mesh.add_vertex_copy(control[p] + offset);
        }
        if p > 0 {
            let prev = ring_start - n_per;
            for k in 0..n_per {
                let _ = mesh.add_quad(
                    prev + k,
                    prev + (k + 1) % n_per,
                    ring_start + (k + 1) % n_per,
                    ring_start + k,
                )?;
            }
        }
        ring_start += n_per;
    }
    mesh.initialize()?;
    log::debug!("built segment mesh {id}: {} vertices", mesh.vertex_count());
    Ok(Some(mesh))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(n: usize) -> Vec<Vec3> {
        (0..=n)
            .map(|i| Vec3::new(i.min(n - 1) as f32 * 3.8, 0.0, 0.0))
            .collect()
    }

    fn source<'a>(points: &'a [Vec3], wings: Option<&'a [Vec3]>, level: usize) -> SegmentSource<'a> {
        SegmentSource {
            control_points: points,
            wing_vectors: wings,
            tension: 7.0,
            hermite_level: level,
        }
    }

    const MADS: SegmentMads = SegmentMads {
        beg: 1000,
        mid: 1500,
        end: 1000,
    };

    #[test]
    fn ring_and_quad_counts() {
        let points = straight(6);
        for level in 0..=3 {
            let src = source(&points, None, level);
            let mesh = create_mesh_cylinder("m", Colix::RED, &src, 1, MADS, 1.0)
                .unwrap()
                .unwrap();
            let nh = src.hermite_count();
            let np = src.ring_size();
            assert_eq!(mesh.vertex_count(), nh * np);
            assert_eq!(mesh.polygon_count(), (nh - 1) * np);
            assert!(mesh.is_initialized());
        }
    }

    #[test]
    fn round_tube_radius_follows_mads() {
        let points = straight(6);
        let src = source(&points, None, 1);
        let mesh = create_mesh_cylinder("m", Colix::RED, &src, 2, MADS, 1.0)
            .unwrap()
            .unwrap();
        let np = src.ring_size();
        // first ring sits at radius beg/2000 around the control point
        let center = points[2];
        for v in &mesh.vertices()[..np] {
            let r = (*v - center).length();
            assert!((r - 0.5).abs() < 1e-3, "radius {r}");
        }
    }

    #[test]
    fn flattened_ribbon_is_wider_than_thick() {
        let points = straight(6);
        let wings = vec![Vec3::Y; 7];
        let src = source(&points, Some(&wings), 2);
        let mesh = create_mesh_cylinder("m", Colix::RED, &src, 2, MADS, 8.0)
            .unwrap()
            .unwrap();
        let (mut y, mut z) = (0.0f32, 0.0f32);
        for v in mesh.vertices() {
            y = y.max(v.y.abs());
            z = z.max(v.z.abs());
        }
        assert!(y > z * 1.5, "y {y} z {z}");
    }

    #[test]
    fn zero_length_segment_builds_nothing() {
        let points = vec![Vec3::ZERO; 4];
        let src = source(&points, None, 1);
        let mesh = create_mesh_cylinder("m", Colix::RED, &src, 0, MADS, 1.0).unwrap();
        assert!(mesh.is_none());
    }
}
