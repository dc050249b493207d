//! Polygon mesh container.
//!
//! A [`Mesh`] owns a vertex list, a polygon index list (triangles and quads)
//! and per-vertex quantized normals. Normals are derived: they are produced
//! only by [`Mesh::initialize`] and are invalidated by every geometry edit.

pub mod collection;

use glam::Vec3;

pub use collection::{MeshCollection, MeshProperty};

use crate::error::ShapeError;
use crate::g3d::{Colix, Normix};

/// Faces with any edge shorter than this (squared, Å²) contribute no normal.
const MIN_EDGE_LENGTH2: f32 = 1e-6;

/// How a mesh responds to the light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshLighting {
    /// Normals as computed.
    #[default]
    FrontLit,
    /// Normals inverted.
    BackLit,
    /// Lit from both sides.
    FullyLit,
}

/// A triangle or quad. Lines are stored as triangles whose last two indices
/// are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Polygon {
    indices: [usize; 4],
    arity: u8,
}

impl Polygon {
    /// Triangle `a, b, c`.
    #[must_use]
    pub const fn triangle(a: usize, b: usize, c: usize) -> Self {
        Self {
            indices: [a, b, c, c],
            arity: 3,
        }
    }

    /// Quad `a, b, c, d`.
    #[must_use]
    pub const fn quad(a: usize, b: usize, c: usize, d: usize) -> Self {
        Self {
            indices: [a, b, c, d],
            arity: 4,
        }
    }

    /// From 2, 3 or 4 indices.
    pub fn from_slice(indices: &[usize]) -> Result<Self, ShapeError> {
        match *indices {
            [a, b] => Ok(Self::triangle(a, b, b)),
            [a, b, c] => Ok(Self::triangle(a, b, c)),
            [a, b, c, d] => Ok(Self::quad(a, b, c, d)),
            _ => Err(ShapeError::UnsupportedArity(indices.len())),
        }
    }

    /// Vertex indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices[..self.arity as usize]
    }

    /// A line stored as a degenerate triangle.
    #[must_use]
    pub fn is_line(&self) -> bool {
        self.arity == 3 && self.indices[1] == self.indices[2]
    }

    fn max_index(&self) -> usize {
        self.indices().iter().copied().max().unwrap_or(0)
    }
}

/// An indexed polygon mesh with display flags.
#[derive(Debug, Clone)]
pub struct Mesh {
    id: String,
    /// Displayed at all.
    pub visible: bool,
    /// Surface color; translucency rides on the colix flag.
    pub colix: Colix,
    /// Render vertices as dots.
    pub show_points: bool,
    /// Render polygon edges.
    pub draw_triangles: bool,
    /// Fill polygons.
    pub fill_triangles: bool,
    /// Skip back-facing vertices and faces.
    pub front_only: bool,
    /// Line polygons drawn as cylinders this wide (milliangstroms); 0 draws
    /// one-pixel lines.
    pub width_mad: i16,
    lighting: MeshLighting,
    inside_out: bool,
    vertices: Vec<Vec3>,
    polygons: Vec<Polygon>,
    normixes: Vec<Normix>,
    normal_sums: Vec<Vec3>,
    polygon_colixes: Vec<Colix>,
    vertex_colixes: Vec<Colix>,
}

impl Mesh {
    /// Empty visible mesh.
    #[must_use]
    pub fn new(id: &str, colix: Colix) -> Self {
        Self {
            id: id.to_owned(),
            visible: true,
            colix,
            show_points: false,
            draw_triangles: false,
            fill_triangles: true,
            front_only: false,
            width_mad: 0,
            lighting: MeshLighting::FrontLit,
            inside_out: false,
            vertices: Vec::new(),
            polygons: Vec::new(),
            normixes: Vec::new(),
            normal_sums: Vec::new(),
            polygon_colixes: Vec::new(),
            vertex_colixes: Vec::new(),
        }
    }

    /// Identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Vertex positions.
    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Polygons in insertion order.
    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Number of polygons.
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Per-vertex normals; empty until [`Self::initialize`] succeeds.
    #[must_use]
    pub fn normixes(&self) -> &[Normix] {
        &self.normixes
    }

    /// Whether normals match the current geometry.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        !self.vertices.is_empty() && self.normixes.len() == self.vertices.len()
    }

    /// Unquantized unit normal of vertex `i`, if it touched a valid face.
    #[must_use]
    pub fn vertex_normal(&self, i: usize) -> Option<Vec3> {
        let sum = *self.normal_sums.get(i)?;
        let n = sum.try_normalize()?;
        Some(if self.inside_out { -n } else { n })
    }

    /// Current lighting mode.
    #[must_use]
    pub fn lighting(&self) -> MeshLighting {
        self.lighting
    }

    /// Surfaces lit from both sides.
    #[must_use]
    pub fn is_two_sided(&self) -> bool {
        self.lighting == MeshLighting::FullyLit
    }

    /// Change lighting; takes effect at the next [`Self::initialize`].
    pub fn set_lighting(&mut self, lighting: MeshLighting) {
        self.lighting = lighting;
        self.invalidate();
    }

    /// Invert normals; takes effect at the next [`Self::initialize`].
    pub fn set_inside_out(&mut self, inside_out: bool) {
        self.inside_out = inside_out;
        self.invalidate();
    }

    /// Set or clear translucency.
    pub fn set_translucent(&mut self, translucent: bool) {
        self.colix = self.colix.with_translucency(translucent);
    }

    /// Allocate exactly `n` vertices at the origin, discarding the old ones
    /// along with every polygon and per-element color.
    pub fn set_vertex_count(&mut self, n: usize) {
        self.vertices.clear();
        self.vertices.resize(n, Vec3::ZERO);
        self.vertices.shrink_to(n);
        self.discard_polygons();
    }

    /// Replace the vertex list; like [`Self::set_vertex_count`], polygons
    /// and per-element colors are discarded.
    pub fn set_vertices(&mut self, vertices: Vec<Vec3>) {
        self.vertices = vertices;
        self.discard_polygons();
    }

    /// Color of polygon `i` when one was assigned.
    #[must_use]
    pub fn polygon_colix(&self, i: usize) -> Option<Colix> {
        self.polygon_colixes.get(i).copied()
    }

    /// Color of vertex `i` when one was assigned.
    #[must_use]
    pub fn vertex_colix(&self, i: usize) -> Option<Colix> {
        self.vertex_colixes.get(i).copied()
    }

    /// Per-polygon colors, in polygon order. An empty list removes them.
    pub fn set_polygon_colixes(&mut self, colixes: Vec<Colix>) -> Result<(), ShapeError> {
        check_color_count(&self.id, "polygon", colixes.len(), self.polygons.len())?;
        self.polygon_colixes = colixes;
        Ok(())
    }

    /// Per-vertex colors, in vertex order. An empty list removes them.
    pub fn set_vertex_colixes(&mut self, colixes: Vec<Colix>) -> Result<(), ShapeError> {
        check_color_count(&self.id, "vertex", colixes.len(), self.vertices.len())?;
        self.vertex_colixes = colixes;
        Ok(())
    }

    /// Move vertex `i`.
    pub fn set_vertex(&mut self, i: usize, p: Vec3) -> Result<(), ShapeError> {
        let count = self.vertices.len();
        let Some(v) = self.vertices.get_mut(i) else {
            return Err(ShapeError::malformed(
                &self.id,
                format!("vertex {i} past vertex count {count}"),
            ));
        };
        *v = p;
        self.invalidate();
        Ok(())
    }

    /// Append a copy of `p`; returns its index.
    pub fn add_vertex_copy(&mut self, p: Vec3) -> usize {
        if self.vertices.len() == self.vertices.capacity() {
            // double on overflow
            self.vertices.reserve(self.vertices.len().max(8));
        }
        self.vertices.push(p);
        self.invalidate();
        self.vertices.len() - 1
    }

    /// Discard polygons and reserve storage for `n`.
    pub fn set_polygon_count(&mut self, n: usize) {
        self.polygons.clear();
        self.polygons.shrink_to(n);
        self.polygons.reserve_exact(n);
        self.polygon_colixes.clear();
        self.invalidate();
    }

    /// Append a checked polygon; returns its index. Nothing is inserted when
    /// an index is out of range.
    pub fn add_polygon_checked(&mut self, polygon: Polygon) -> Result<usize, ShapeError> {
        let count = self.vertices.len();
        if polygon.max_index() >= count {
            return Err(ShapeError::malformed(
                &self.id,
                format!(
                    "polygon {:?} indexes past vertex count {count}",
                    polygon.indices()
                ),
            ));
        }
        if self.polygons.len() == self.polygons.capacity() {
            self.polygons.reserve(self.polygons.len().max(8));
        }
        self.polygons.push(polygon);
        self.invalidate();
        Ok(self.polygons.len() - 1)
    }

    /// Append triangle `a, b, c`.
    pub fn add_triangle(&mut self, a: usize, b: usize, c: usize) -> Result<usize, ShapeError> {
        self.add_polygon_checked(Polygon::triangle(a, b, c))
    }

    /// Append quad `a, b, c, d`.
    pub fn add_quad(
        &mut self,
        a: usize,
        b: usize,
        c: usize,
        d: usize,
    ) -> Result<usize, ShapeError> {
        self.add_polygon_checked(Polygon::quad(a, b, c, d))
    }

    /// Append a 2-, 3- or 4-index polygon.
    pub fn add_polygon(&mut self, indices: &[usize]) -> Result<usize, ShapeError> {
        self.add_polygon_checked(Polygon::from_slice(indices)?)
    }

    /// Compute per-vertex normals from the faces touching each vertex.
    ///
    /// Each face contributes the unit normal of its first three vertices;
    /// degenerate faces and lines contribute nothing. Fails, leaving the
    /// normals empty, if any polygon indexes past the vertex list.
    pub fn initialize(&mut self) -> Result<(), ShapeError> {
        self.invalidate();
        let count = self.vertices.len();
        if let Some(bad) = self.polygons.iter().find(|p| p.max_index() >= count) {
            return Err(ShapeError::malformed(
                &self.id,
                format!("polygon {:?} past vertex count {count}", bad.indices()),
            ));
        }
        let mut sums = vec![Vec3::ZERO; count];
        for polygon in &self.polygons {
            if polygon.is_line() {
                continue;
            }
            let Some(normal) = face_normal(&self.vertices, polygon) else {
                continue;
            };
            for &i in polygon.indices() {
                sums[i] += normal;
            }
        }
        let flip = self.inside_out != (self.lighting == MeshLighting::BackLit);
        self.normixes = sums
            .iter()
            .map(|&s| Normix::from_vector(if flip { -s } else { s }))
            .collect();
        self.normal_sums = sums;
        Ok(())
    }

    /// Reset geometry to empty, releasing storage. Id, color and display
    /// flags are kept.
    pub fn clear(&mut self) {
        self.vertices = Vec::new();
        self.polygons = Vec::new();
        self.normixes = Vec::new();
        self.normal_sums = Vec::new();
        self.polygon_colixes = Vec::new();
        self.vertex_colixes = Vec::new();
    }

    /// [`Self::clear`] plus default display flags and color.
    pub fn reset(&mut self, colix: Colix) {
        let id = std::mem::take(&mut self.id);
        *self = Self::new(&id, colix);
    }

    fn discard_polygons(&mut self) {
        self.polygons.clear();
        self.polygon_colixes.clear();
        self.vertex_colixes.clear();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.normixes.clear();
        self.normal_sums.clear();
    }
}

fn check_color_count(id: &str, what: &str, got: usize, want: usize) -> Result<(), ShapeError> {
    if got == 0 || got == want {
        return Ok(());
    }
    Err(ShapeError::malformed(
        id,
        format!("{got} {what} colors for {want} elements"),
    ))
}

/// Unit normal of the plane through the polygon's first three vertices.
fn face_normal(vertices: &[Vec3], polygon: &Polygon) -> Option<Vec3> {
    let idx = polygon.indices();
    let (a, b, c) = (vertices[idx[0]], vertices[idx[1]], vertices[idx[2]]);
    if a.distance_squared(b) < MIN_EDGE_LENGTH2
        || b.distance_squared(c) < MIN_EDGE_LENGTH2
        || c.distance_squared(a) < MIN_EDGE_LENGTH2
    {
        return None;
    }
    let n = (b - a).cross(c - a).try_normalize()?;
    let len = n.length();
    (len > 0.9 && len < 1.1).then_some(n)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn pyramid() -> Mesh {
        let mut m = Mesh::new("pyr", Colix::GOLD);
        for p in [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.5),
        ] {
            let _ = m.add_vertex_copy(p);
        }
        m
    }

    const PYRAMID_FACES: [[usize; 3]; 4] = [[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];

    #[test]
    fn normals_match_vertex_count_after_initialize() {
        let mut m = pyramid();
        for f in PYRAMID_FACES {
            let _ = m.add_triangle(f[0], f[1], f[2]).unwrap();
        }
        let _ = m.add_quad(3, 2, 1, 0).unwrap();
        m.initialize().unwrap();
        assert_eq!(m.normixes().len(), m.vertex_count());
        assert!(m.is_initialized());
        // apex normal points straight up by symmetry
        let apex = m.vertex_normal(4).unwrap();
        assert_relative_eq!(apex.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn normals_are_insertion_order_independent() {
        let mut forward = pyramid();
        let mut backward = pyramid();
        for f in PYRAMID_FACES {
            let _ = forward.add_triangle(f[0], f[1], f[2]).unwrap();
        }
        for f in PYRAMID_FACES.iter().rev() {
            let _ = backward.add_triangle(f[0], f[1], f[2]).unwrap();
        }
        forward.initialize().unwrap();
        backward.initialize().unwrap();
        for i in 0..forward.vertex_count() {
            let a = forward.vertex_normal(i).unwrap();
            let b = backward.vertex_normal(i).unwrap();
            assert!((a - b).length() < 1e-5, "vertex {i}: {a} vs {b}");
        }
    }

    #[test]
    fn untouched_vertex_gets_null_normix() {
        let mut m = pyramid();
        let _ = m.add_triangle(0, 1, 2).unwrap();
        m.initialize().unwrap();
        assert_eq!(m.normixes()[4], Normix::NULL);
        assert_ne!(m.normixes()[0], Normix::NULL);
    }

    #[test]
    fn degenerate_face_contributes_nothing() {
        let mut m = Mesh::new("flat", Colix::GOLD);
        let a = m.add_vertex_copy(Vec3::ZERO);
        let b = m.add_vertex_copy(Vec3::ZERO);
        let c = m.add_vertex_copy(Vec3::X);
        let _ = m.add_triangle(a, b, c).unwrap();
        m.initialize().unwrap();
        assert!(m.normixes().iter().all(|&n| n == Normix::NULL));
    }

    #[test]
    fn back_lit_inverts_normals() {
        let mut m = pyramid();
        let _ = m.add_quad(0, 1, 2, 3).unwrap();
        m.initialize().unwrap();
        let front = m.normixes()[0];
        m.set_lighting(MeshLighting::BackLit);
        assert!(!m.is_initialized());
        m.initialize().unwrap();
        assert_eq!(m.normixes()[0], front.inverse());
    }

    #[test]
    fn out_of_range_index_is_rejected_without_insertion() {
        let mut m = pyramid();
        let err = m.add_triangle(0, 1, 5).unwrap_err();
        assert!(matches!(err, ShapeError::MalformedGeometry { .. }));
        assert_eq!(m.polygon_count(), 0);
        assert!(matches!(
            m.add_polygon(&[0, 1, 2, 3, 4]),
            Err(ShapeError::UnsupportedArity(5))
        ));
    }

    #[test]
    fn shrinking_vertices_discards_polygons() {
        let mut m = pyramid();
        let _ = m.add_triangle(2, 3, 4).unwrap();
        let _ = m.add_triangle(0, 1, 2).unwrap();
        m.initialize().unwrap();
        m.set_vertex_count(3);
        assert_eq!(m.polygon_count(), 0);
        assert!(!m.is_initialized());
        m.initialize().unwrap();
        assert!(m.normixes().iter().all(|&n| n == Normix::NULL));
    }

    #[test]
    fn fuzzed_indices_never_leave_an_invalid_polygon() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut m = Mesh::new("fuzz", Colix::GOLD);
        for _ in 0..20 {
            let _ = m.add_vertex_copy(Vec3::new(rng.random(), rng.random(), rng.random()));
        }
        for _ in 0..500 {
            let arity = rng.random_range(2..=5);
            let idx: Vec<usize> = (0..arity).map(|_| rng.random_range(0..25)).collect();
            let accepted = m.add_polygon(&idx).is_ok();
            let valid = arity <= 4 && idx.iter().all(|&i| i < 20);
            assert_eq!(accepted, valid, "{idx:?}");
        }
        assert!(m.polygons().iter().all(|p| p.indices().iter().all(|&i| i < 20)));
        m.initialize().unwrap();
    }

    #[test]
    fn element_colors_follow_their_geometry() {
        let mut m = pyramid();
        let _ = m.add_triangle(0, 1, 4).unwrap();
        m.set_polygon_colixes(vec![Colix::RED]).unwrap();
        assert!(m.set_polygon_colixes(vec![Colix::RED; 2]).is_err());
        m.set_vertex_colixes(vec![Colix::GOLD; 5]).unwrap();
        assert_eq!(m.polygon_colix(0), Some(Colix::RED));
        assert_eq!(m.vertex_colix(4), Some(Colix::GOLD));

        m.set_polygon_count(1);
        assert_eq!(m.polygon_colix(0), None);
        assert_eq!(m.vertex_colix(4), Some(Colix::GOLD));
        m.set_vertices(vec![Vec3::ZERO, Vec3::X]);
        assert_eq!(m.vertex_colix(0), None);
    }

    #[test]
    fn clear_and_rebuild_is_identical() {
        let build = |m: &mut Mesh| {
            for p in [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE] {
                let _ = m.add_vertex_copy(p);
            }
            let _ = m.add_triangle(0, 1, 2).unwrap();
            let _ = m.add_quad(0, 1, 3, 2).unwrap();
        };
        let mut m = Mesh::new("rt", Colix::GOLD);
        build(&mut m);
        let (v, p) = (m.vertices().to_vec(), m.polygons().to_vec());
        m.clear();
        assert_eq!(m.vertex_count(), 0);
        assert_eq!(m.id(), "rt");
        build(&mut m);
        assert_eq!(m.vertices(), &v[..]);
        assert_eq!(m.polygons(), &p[..]);
    }

    #[test]
    fn lines_are_stored_as_degenerate_triangles() {
        let mut m = pyramid();
        let i = m.add_polygon(&[0, 4]).unwrap();
        assert!(m.polygons()[i].is_line());
        assert_eq!(m.polygons()[i].indices(), &[0, 4, 4]);
    }
}
