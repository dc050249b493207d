//! Geodesic sphere tessellations.
//!
//! Level 0 is the unit icosahedron (12 vertices, 20 faces). Each further
//! level splits every face into four, projecting the new edge midpoints onto
//! the unit sphere. Midpoints are appended in first-seen order, so the vertex
//! list of level `k` is a prefix of the vertex list of level `k + 1`.

use std::sync::OnceLock;

use glam::Vec3;
use rustc_hash::FxHashMap;

/// Highest precomputed level.
pub const MAX_LEVEL: usize = 4;

/// Vertex count per level.
pub const VERTEX_COUNTS: [usize; MAX_LEVEL + 1] = [12, 42, 162, 642, 2562];

const ICOSAHEDRON_FACES: [[u16; 3]; 20] = [
    [0, 1, 2],
    [0, 2, 3],
    [0, 3, 4],
    [0, 4, 5],
    [0, 5, 1],
    [1, 6, 2],
    [2, 7, 3],
    [3, 8, 4],
    [4, 9, 5],
    [5, 10, 1],
    [6, 1, 10],
    [7, 2, 6],
    [8, 3, 7],
    [9, 4, 8],
    [10, 5, 9],
    [11, 6, 10],
    [11, 7, 6],
    [11, 8, 7],
    [11, 9, 8],
    [11, 10, 9],
];

/// One tessellation level.
#[derive(Debug)]
pub struct GeodesicLevel {
    /// Faces as vertex index triples (indices into the shared vertex list).
    pub faces: Vec<[u16; 3]>,
    /// Number of vertices used at this level.
    pub vertex_count: usize,
}

/// All levels `0..=MAX_LEVEL`, sharing one vertex list.
#[derive(Debug)]
pub struct Geodesic {
    vertices: Vec<Vec3>,
    levels: Vec<GeodesicLevel>,
}

impl Geodesic {
    /// The process-wide tessellation table, built on first use.
    pub fn get() -> &'static Self {
        static GEODESIC: OnceLock<Geodesic> = OnceLock::new();
        GEODESIC.get_or_init(Self::new)
    }

    /// Build a fresh table. Callers normally want [`Self::get`].
    #[must_use]
    pub fn new() -> Self {
        let mut vertices = icosahedron_vertices();
        let mut levels = vec![GeodesicLevel {
            faces: ICOSAHEDRON_FACES.to_vec(),
            vertex_count: vertices.len(),
        }];
        for _ in 0..MAX_LEVEL {
            let prev = &levels[levels.len() - 1].faces;
            let faces = quadruple(&mut vertices, prev);
            levels.push(GeodesicLevel {
                faces,
                vertex_count: vertices.len(),
            });
        }
        Self { vertices, levels }
    }

    /// Level data, clamped to `MAX_LEVEL`.
    #[must_use]
    pub fn level(&self, level: usize) -> &GeodesicLevel {
        &self.levels[level.min(MAX_LEVEL)]
    }

    /// Unit vertices visible at `level`.
    #[must_use]
    pub fn vertices(&self, level: usize) -> &[Vec3] {
        &self.vertices[..self.level(level).vertex_count]
    }

    /// Vertex count at `level`.
    #[must_use]
    pub fn vertex_count(&self, level: usize) -> usize {
        self.level(level).vertex_count
    }

    /// Face count at `level`.
    #[must_use]
    pub fn face_count(&self, level: usize) -> usize {
        self.level(level).faces.len()
    }

    /// Edge count at `level` (Euler: V - E + F = 2).
    #[must_use]
    pub fn edge_count(&self, level: usize) -> usize {
        self.vertex_count(level) + self.face_count(level) - 2
    }
}

impl Default for Geodesic {
    fn default() -> Self {
        Self::new()
    }
}

fn icosahedron_vertices() -> Vec<Vec3> {
    let z = 5.0f32.sqrt() / 2.0;
    let mut v = Vec::with_capacity(VERTEX_COUNTS[MAX_LEVEL]);
    v.push(Vec3::new(0.0, 0.0, z));
    let step = std::f32::consts::TAU / 5.0;
    for i in 0..5 {
        let a = i as f32 * step;
        v.push(Vec3::new(a.cos(), a.sin(), 0.5));
    }
    for i in 0..5 {
        let a = i as f32 * step + step / 2.0;
        v.push(Vec3::new(a.cos(), a.sin(), -0.5));
    }
    v.push(Vec3::new(0.0, 0.0, -z));
    v.iter_mut().for_each(|p| *p = p.normalize());
    v
}

/// Split each face into four. Edge midpoints are shared between the two
/// faces touching the edge.
fn quadruple(vertices: &mut Vec<Vec3>, faces: &[[u16; 3]]) -> Vec<[u16; 3]> {
    let mut midpoints: FxHashMap<(u16, u16), u16> = FxHashMap::default();
    let mut mid = |a: u16, b: u16, vertices: &mut Vec<Vec3>| -> u16 {
        let key = (a.min(b), a.max(b));
        *midpoints.entry(key).or_insert_with(|| {
            let p = (vertices[a as usize] + vertices[b as usize]).normalize();
            vertices.push(p);
            (vertices.len() - 1) as u16
        })
    };
    let mut out = Vec::with_capacity(faces.len() * 4);
    for &[a, b, c] in faces {
        let ab = mid(a, b, vertices);
        let bc = mid(b, c, vertices);
        let ca = mid(c, a, vertices);
        out.push([a, ab, ca]);
        out.push([b, bc, ab]);
        out.push([c, ca, bc]);
        out.push([ca, ab, bc]);
    }
    out
}
