//! Spline sampling for polymer centerlines and mesh segments.

use glam::Vec3;

/// Hermite samples of the span `p[1]..p[2]`.
///
/// Returns `n + 1` points: `n` samples from `p[1]` to `p[2]` inclusive, then
/// one more continuing into `p[2]..p[3]` so the last sample still has a
/// forward direction. Tangents are `(p[k+1] - p[k-1]) * tension / 8`.
#[must_use]
pub fn hermite_list(tension: f32, p: [Vec3; 5], n: usize) -> Vec<Vec3> {
    let n = n.max(2);
    let t = tension / 8.0;
    let t1 = (p[2] - p[0]) * t;
    let t2 = (p[3] - p[1]) * t;
    let t3 = (p[4] - p[2]) * t;
    let span = (n - 1) as f32;
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let s = i as f32 / span;
        let sample = if i == n {
            hermite(s - 1.0, p[2], p[3], t2, t3)
        } else {
            hermite(s, p[1], p[2], t1, t2)
        };
        out.push(sample);
    }
    out
}

fn hermite(s: f32, a: Vec3, b: Vec3, ta: Vec3, tb: Vec3) -> Vec3 {
    let s2 = s * s;
    let s3 = s2 * s;
    let h1 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h2 = -2.0 * s3 + 3.0 * s2;
    let h3 = s3 - 2.0 * s2 + s;
    let h4 = s3 - s2;
    a * h1 + b * h2 + ta * h3 + tb * h4
}

/// Catmull-Rom spline interpolation (passes through all control points).
///
/// Ends are padded by reflection. Produces `segments_per_span` samples per
/// span plus the final point.
#[must_use]
pub fn catmull_rom(points: &[Vec3], segments_per_span: usize) -> Vec<Vec3> {
    let n = points.len();
    let segments_per_span = segments_per_span.max(1);
    if n < 2 {
        return points.to_vec();
    }
    if n < 3 {
        return linear_interpolate(points, segments_per_span);
    }

    let mut result = Vec::with_capacity((n - 1) * segments_per_span + 1);
    for i in 0..n - 1 {
        let p0 = if i == 0 {
            points[0] * 2.0 - points[1]
        } else {
            points[i - 1]
        };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 >= n {
            points[n - 1] * 2.0 - points[n - 2]
        } else {
            points[i + 2]
        };

        for j in 0..segments_per_span {
            let t = j as f32 / segments_per_span as f32;
            let t2 = t * t;
            let t3 = t2 * t;
            let pos = 0.5
                * ((2.0 * p1)
                    + (-p0 + p2) * t
                    + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
                    + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3);
            result.push(pos);
        }
    }
    result.push(points[n - 1]);
    result
}

/// Linear interpolation fallback for short point sequences.
#[must_use]
pub fn linear_interpolate(points: &[Vec3], segments_per_span: usize) -> Vec<Vec3> {
    let mut result = Vec::new();
    for pair in points.windows(2) {
        for j in 0..segments_per_span {
            let t = j as f32 / segments_per_span as f32;
            result.push(pair[0].lerp(pair[1], t));
        }
    }
    if let Some(&last) = points.last() {
        result.push(last);
    }
    result
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn line(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect()
    }

    #[test]
    fn hermite_hits_both_span_ends() {
        let p = line(5);
        let h = hermite_list(7.0, [p[0], p[1], p[2], p[3], p[4]], 4);
        assert_eq!(h.len(), 5);
        assert!((h[0] - p[1]).length() < 1e-5);
        assert!((h[3] - p[2]).length() < 1e-5);
        // the extra point continues past p2
        assert!(h[4].x > p[2].x);
    }

    #[test]
    fn hermite_samples_are_monotonic_on_a_line() {
        let p = line(5);
        let h = hermite_list(4.0, [p[0], p[1], p[2], p[3], p[4]], 6);
        for w in h.windows(2) {
            assert!(w[1].x >= w[0].x);
        }
    }

    #[test]
    fn catmull_rom_passes_through_control_points() {
        let p = vec![Vec3::ZERO, Vec3::new(1.0, 2.0, 0.0), Vec3::new(3.0, 1.0, 1.0), Vec3::X];
        let c = catmull_rom(&p, 4);
        assert_eq!(c.len(), 3 * 4 + 1);
        for (i, q) in p.iter().enumerate() {
            assert_relative_eq!(c[i * 4].x, q.x, epsilon = 1e-5);
            assert_relative_eq!(c[i * 4].y, q.y, epsilon = 1e-5);
        }
    }

    #[test]
    fn short_inputs_degrade_gracefully() {
        assert_eq!(catmull_rom(&[Vec3::ONE], 4), vec![Vec3::ONE]);
        let two = catmull_rom(&line(2), 2);
        assert_eq!(two.len(), 3);
        assert_relative_eq!(two[1].x, 0.5);
    }
}
