//! Quantized normals ("normixes").
//!
//! A normix is the index of the geodesic vertex (level 3, 642 directions)
//! nearest to a normal vector. Shading backends precompute one intensity per
//! normix instead of lighting each vertex.

use std::sync::OnceLock;

use glam::Vec3;

use super::geodesic::Geodesic;

/// Geodesic level used for normal quantization.
pub const NORMIX_LEVEL: usize = 3;

/// Quantized unit normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Normix(u16);

impl Normix {
    /// No normal: the vertex belongs to no valid face.
    pub const NULL: Self = Self(u16::MAX);

    /// Quantize a vector. Zero or non-finite vectors map to [`Self::NULL`].
    #[must_use]
    pub fn from_vector(v: Vec3) -> Self {
        let len2 = v.length_squared();
        if !len2.is_finite() || len2 < 1e-12 {
            return Self::NULL;
        }
        let dirs = Geodesic::get().vertices(NORMIX_LEVEL);
        let mut best = 0;
        let mut best_dot = f32::NEG_INFINITY;
        for (i, d) in dirs.iter().enumerate() {
            let dot = d.dot(v);
            if dot > best_dot {
                best_dot = dot;
                best = i;
            }
        }
        Self(best as u16)
    }

    /// The raw palette index.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        (self != Self::NULL).then_some(self.0 as usize)
    }

    /// The unit direction this normix stands for.
    #[must_use]
    pub fn vector(self) -> Option<Vec3> {
        let dirs = Geodesic::get().vertices(NORMIX_LEVEL);
        self.index().and_then(|i| dirs.get(i).copied())
    }

    /// The antipodal normix. `NULL` stays `NULL`.
    #[must_use]
    pub fn inverse(self) -> Self {
        static INVERSE: OnceLock<Vec<u16>> = OnceLock::new();
        let table = INVERSE.get_or_init(|| {
            Geodesic::get()
                .vertices(NORMIX_LEVEL)
                .iter()
                .map(|&d| Self::from_vector(-d).0)
                .collect()
        });
        self.index()
            .and_then(|i| table.get(i))
            .map_or(Self::NULL, |&i| Self(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geodesic_direction_quantizes_to_itself() {
        let dirs = Geodesic::get().vertices(NORMIX_LEVEL);
        for i in [0usize, 17, 300, 641] {
            assert_eq!(Normix::from_vector(dirs[i] * 3.0).index(), Some(i));
        }
    }

    #[test]
    fn degenerate_vectors_are_null() {
        assert_eq!(Normix::from_vector(Vec3::ZERO), Normix::NULL);
        assert_eq!(Normix::from_vector(Vec3::NAN), Normix::NULL);
        assert_eq!(Normix::NULL.vector(), None);
        assert_eq!(Normix::NULL.inverse(), Normix::NULL);
    }

    #[test]
    fn inverse_points_the_other_way() {
        let n = Normix::from_vector(Vec3::new(0.3, -0.2, 0.9));
        let v = n.vector().unwrap();
        let w = n.inverse().vector().unwrap();
        assert!(v.dot(w) < -0.99);
        assert_eq!(n.inverse().inverse(), n);
    }
}
