//! Coordination polyhedra around central atoms.
//!
//! A face is any triple of vertex atoms that are pairwise within
//! `distance factor × mean central distance`. The factor grows by 5% until
//! every vertex belongs to some face. "Collapsed" polyhedra split each face
//! into three facets meeting at a point just off the center.

use glam::Vec3;

use super::{Colorable, ShapeContext};
use crate::error::ShapeError;
use crate::g3d::{Colix, ColorValue, Normix};
use crate::model::{BondOrder, MolecularModel};
use crate::util::BitSet;

/// Distance factor for up to seven vertices.
pub const DEFAULT_DISTANCE_FACTOR: f32 = 1.85;
/// Distance factor for larger polyhedra.
pub const DEFAULT_MANY_VERTEX_DISTANCE_FACTOR: f32 = 1.5;
/// Offset of the collapsed apex from the center, in angstroms.
pub const DEFAULT_FACE_CENTER_OFFSET: f32 = 0.25;
/// Most vertex atoms considered.
pub const MAX_VERTICES: usize = 250;
/// Most faces per polyhedron.
pub const FACE_COUNT_MAX: usize = MAX_VERTICES - 3;

const MAX_DISTANCE_FACTOR: f32 = 10.0;

/// Which polyhedron edges are outlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// No outlines.
    #[default]
    None,
    /// Every face.
    All,
    /// Faces turned toward the viewer.
    Front,
}

/// Property writes accepted by [`Polyhedra`].
#[derive(Debug, Clone, PartialEq)]
pub enum PolyhedraProperty {
    /// Reset build parameters.
    Init,
    /// Vertex search radius in angstroms; 0 uses bonded atoms.
    Radius(f32),
    /// Only build polyhedra with this many vertices (repeatable).
    VertexCount(usize),
    /// Central atoms for the next operations.
    Centers(BitSet),
    /// Restrict vertex atoms.
    To(BitSet),
    /// Collapsed apex offset.
    FaceCenterOffset(f32),
    /// Starting distance factor.
    DistanceFactor(f32),
    /// Build collapsed polyhedra.
    Collapsed(bool),
    /// Replace polyhedra at the centers with freshly built ones.
    Generate,
    /// Remove polyhedra at the centers.
    Delete,
    /// Show polyhedra at the centers.
    On,
    /// Hide polyhedra at the centers.
    Off,
    /// Edge outline mode.
    Edges(EdgeMode),
}

impl PolyhedraProperty {
    /// Property name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Radius(_) => "radius",
            Self::VertexCount(_) => "nVertices",
            Self::Centers(_) => "centers",
            Self::To(_) => "to",
            Self::FaceCenterOffset(_) => "faceCenterOffset",
            Self::DistanceFactor(_) => "distanceFactor",
            Self::Collapsed(_) => "collapsed",
            Self::Generate => "generate",
            Self::Delete => "delete",
            Self::On => "on",
            Self::Off => "off",
            Self::Edges(_) => "edges",
        }
    }
}

/// One built polyhedron.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    /// Central atom.
    pub central_atom: usize,
    /// Model of the central atom.
    pub model_index: usize,
    /// Shown.
    pub visible: bool,
    /// Face color; INHERIT takes the central atom's.
    pub colix: Colix,
    /// Built collapsed.
    pub collapsed: bool,
    /// Distance factor that made every vertex part of a face.
    pub distance_factor: f32,
    vertices: Vec<Vec3>,
    faces: Vec<[usize; 3]>,
    normixes: Vec<Normix>,
}

impl Polyhedron {
    /// Vertex atoms, then the center, then collapsed apexes.
    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Faces, wound counter-clockwise around their outward normal.
    #[must_use]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Outward face normals.
    #[must_use]
    pub fn normixes(&self) -> &[Normix] {
        &self.normixes
    }
}

#[derive(Debug, Clone)]
struct BuildParams {
    radius: f32,
    vertex_counts: BitSet,
    centers: Option<BitSet>,
    to: Option<BitSet>,
    face_center_offset: f32,
    distance_factor: Option<f32>,
    collapsed: bool,
}

impl Default for BuildParams {
    fn default() -> Self {
        Self {
            radius: 0.0,
            vertex_counts: BitSet::new(),
            centers: None,
            to: None,
            face_center_offset: DEFAULT_FACE_CENTER_OFFSET,
            distance_factor: None,
            collapsed: false,
        }
    }
}

/// All polyhedra of the model.
#[derive(Debug, Clone, Default)]
pub struct Polyhedra {
    polyhedra: Vec<Polyhedron>,
    edges: EdgeMode,
    params: BuildParams,
}

impl Polyhedra {
    /// No polyhedra.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Built polyhedra.
    #[must_use]
    pub fn polyhedra(&self) -> &[Polyhedron] {
        &self.polyhedra
    }

    /// Edge outline mode.
    #[must_use]
    pub fn edges(&self) -> EdgeMode {
        self.edges
    }

    fn centers<'s>(&'s self, selection: &'s BitSet) -> &'s BitSet {
        self.params.centers.as_ref().unwrap_or(selection)
    }

    /// Apply a property write.
    pub fn set_property(
        &mut self,
        property: PolyhedraProperty,
        selection: &BitSet,
        ctx: &mut ShapeContext<'_>,
    ) -> Result<(), ShapeError> {
        match property {
            PolyhedraProperty::Init => self.params = BuildParams::default(),
            PolyhedraProperty::Radius(r) => self.params.radius = r.max(0.0),
            PolyhedraProperty::VertexCount(n) => self.params.vertex_counts.set(n),
            PolyhedraProperty::Centers(c) => self.params.centers = Some(c),
            PolyhedraProperty::To(t) => self.params.to = Some(t),
            PolyhedraProperty::FaceCenterOffset(o) => self.params.face_center_offset = o,
            PolyhedraProperty::DistanceFactor(f) => {
                self.params.distance_factor = (f > 0.0).then_some(f);
            }
            PolyhedraProperty::Collapsed(c) => self.params.collapsed = c,
            PolyhedraProperty::Generate => {
                let centers = self.centers(selection).clone();
                if let Some(bad) = centers.iter().find(|&i| i >= ctx.model.atom_count()) {
                    return Err(ShapeError::InvalidModel(format!(
                        "polyhedron center {bad} past atom count {}",
                        ctx.model.atom_count()
                    )));
                }
                self.delete(&centers);
                self.build(ctx.model, &centers);
            }
            PolyhedraProperty::Delete => {
                let centers = self.centers(selection).clone();
                self.delete(&centers);
            }
            PolyhedraProperty::On | PolyhedraProperty::Off => {
                let visible = property == PolyhedraProperty::On;
                let centers = self.centers(selection).clone();
                for p in &mut self.polyhedra {
                    if centers.get(p.central_atom) {
                        p.visible = visible;
                    }
                }
            }
            PolyhedraProperty::Edges(mode) => self.edges = mode,
        }
        Ok(())
    }

    fn delete(&mut self, centers: &BitSet) {
        self.polyhedra.retain(|p| !centers.get(p.central_atom));
    }

    fn build(&mut self, model: &MolecularModel, centers: &BitSet) {
        let use_bonds = self.params.radius == 0.0;
        for i in centers.iter() {
            let others = if use_bonds {
                self.bonded_vertices(model, i)
            } else {
                self.radius_vertices(model, i)
            };
            let counts = &self.params.vertex_counts;
            if others.len() < 3 || !counts.is_empty() && !counts.get(others.len()) {
                continue;
            }
            if let Some(p) = self.validate(model, i, &others) {
                log::debug!(
                    "polyhedron at atom {i}: {} vertices, {} faces",
                    others.len(),
                    p.faces.len()
                );
                self.polyhedra.push(p);
            }
        }
    }

    fn allowed_vertex(&self, j: usize) -> bool {
        self.params.to.as_ref().is_none_or(|to| to.get(j))
    }

    fn bonded_vertices(&self, model: &MolecularModel, i: usize) -> Vec<usize> {
        model
            .bonds()
            .iter()
            .filter(|b| b.order != BondOrder::Hydrogen)
            .filter_map(|b| match (b.atom_a == i, b.atom_b == i) {
                (true, false) => Some(b.atom_b),
                (false, true) => Some(b.atom_a),
                _ => None,
            })
            .filter(|&j| self.allowed_vertex(j))
            .take(MAX_VERTICES)
            .collect()
    }

    fn radius_vertices(&self, model: &MolecularModel, i: usize) -> Vec<usize> {
        let atoms = model.atoms();
        let center = &atoms[i];
        let r2 = self.params.radius * self.params.radius;
        atoms
            .iter()
            .enumerate()
            .filter(|&(j, a)| {
                j != i
                    && a.model_index == center.model_index
                    && a.position.distance_squared(center.position) <= r2
                    && self.allowed_vertex(j)
            })
            .map(|(j, _)| j)
            .take(MAX_VERTICES)
            .collect()
    }

    fn validate(&self, model: &MolecularModel, center: usize, others: &[usize]) -> Option<Polyhedron> {
        let atoms = model.atoms();
        let n = others.len();
        let mut points: Vec<Vec3> = others.iter().map(|&j| atoms[j].position).collect();
        let c = atoms[center].position;
        points.push(c);
        let mean = points[..n].iter().map(|p| p.distance(c)).sum::<f32>() / n as f32;

        let mut factor = self.params.distance_factor.unwrap_or(if n <= 7 {
            DEFAULT_DISTANCE_FACTOR
        } else {
            DEFAULT_MANY_VERTEX_DISTANCE_FACTOR
        });
        let mut dist_max = mean * factor;
        while mean > 0.0 && factor < MAX_DISTANCE_FACTOR {
            dist_max = mean * factor;
            let mut uncovered = BitSet::all(n);
            for [i, j, k] in triples(&points[..n], dist_max) {
                uncovered.clear(i);
                uncovered.clear(j);
                uncovered.clear(k);
            }
            if uncovered.is_empty() {
                break;
            }
            factor *= 1.05;
        }

        let collapsed = self.params.collapsed;
        let mut faces = Vec::new();
        let mut normixes = Vec::new();
        for [i, j, k] in triples(&points[..n], dist_max) {
            if faces.len() + if collapsed { 3 } else { 1 } > FACE_COUNT_MAX {
                log::error!("polyhedron at atom {center}: more than {FACE_COUNT_MAX} faces");
                return None;
            }
            let (a, b, cc) = (points[i], points[j], points[k]);
            let normal = normal_from_center(c, a, b, cc, true);
            if collapsed {
                let apex_index = points.len();
                let apex = c + normal * self.params.face_center_offset;
                points.push(apex);
                for (face, opposite) in [
                    ([apex_index, j, k], a),
                    ([i, apex_index, k], b),
                    ([i, j, apex_index], cc),
                ] {
                    let [p, q, r] = face.map(|v| points[v]);
                    let facet = normal_from_center(opposite, p, q, r, false);
                    faces.push(wound(face, &points, facet));
                    normixes.push(Normix::from_vector(facet));
                }
            } else {
                faces.push(wound([i, j, k], &points, normal));
                normixes.push(Normix::from_vector(normal));
            }
        }
        Some(Polyhedron {
            central_atom: center,
            model_index: atoms[center].model_index,
            visible: true,
            colix: Colix::INHERIT,
            collapsed,
            distance_factor: factor,
            vertices: points,
            faces,
            normixes,
        })
    }
}

/// Index triples `i < j < k` whose pairwise distances are all within
/// `dist_max`.
fn triples(points: &[Vec3], dist_max: f32) -> Vec<[usize; 3]> {
    let n = points.len();
    let near = |a: usize, b: usize| points[a].distance(points[b]) <= dist_max;
    let mut out = Vec::new();
    for i in 0..n.saturating_sub(2) {
        for j in i + 1..n - 1 {
            if !near(i, j) {
                continue;
            }
            for k in j + 1..n {
                if near(i, k) && near(j, k) {
                    out.push([i, j, k]);
                }
            }
        }
    }
    out
}

/// Unit normal of triangle `abc`, turned away from `center` when `solid`,
/// toward it otherwise.
fn normal_from_center(center: Vec3, a: Vec3, b: Vec3, c: Vec3, solid: bool) -> Vec3 {
    let normal = (b - a).cross(c - a).normalize_or_zero();
    let centroid = (a + b + c) / 3.0;
    let probe = centroid + normal * 0.1;
    let toward = center.distance(probe) < center.distance(centroid);
    if toward == solid { -normal } else { normal }
}

/// Reorder `face` so its winding agrees with `normal`.
fn wound(face: [usize; 3], points: &[Vec3], normal: Vec3) -> [usize; 3] {
    let [a, b, c] = face.map(|v| points[v]);
    if (b - a).cross(c - a).dot(normal) < 0.0 {
        [face[0], face[2], face[1]]
    } else {
        face
    }
}

impl Colorable for Polyhedra {
    fn set_color(&mut self, color: ColorValue, selection: &BitSet, ctx: &mut ShapeContext<'_>) {
        let (colix, palette) = ctx.resolve_color(color);
        let centers = self.centers(selection).clone();
        for p in &mut self.polyhedra {
            if centers.get(p.central_atom) {
                p.colix = ctx.colix_or_palette(colix, palette, p.central_atom, None);
            }
        }
    }

    fn set_translucent(
        &mut self,
        translucent: bool,
        selection: &BitSet,
        _ctx: &mut ShapeContext<'_>,
    ) {
        let centers = self.centers(selection).clone();
        for p in &mut self.polyhedra {
            if centers.get(p.central_atom) {
                p.colix = p.colix.with_translucency(translucent);
            }
        }
    }
}
