//! Per-atom exposure bitmaps over a geodesic sphere.
//!
//! Bit `k` of an atom's map is set when geodesic vertex `k`, pushed out to
//! the atom's probe-inflated radius, lies outside every neighbour. Maps are
//! stored compacted: trailing zero words are dropped.

use glam::Vec3;

use crate::g3d::geodesic::Geodesic;
use crate::model::MolecularModel;

const WORD_BITS: usize = 32;

/// Exposure bits of one atom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotMap {
    words: Vec<u32>,
}

impl DotMap {
    /// Map with bits `0..count` set.
    #[must_use]
    pub fn all(count: usize) -> Self {
        let mut words = vec![u32::MAX; count.div_ceil(WORD_BITS)];
        let rem = count % WORD_BITS;
        if rem != 0 {
            if let Some(last) = words.last_mut() {
                *last = (1u32 << rem) - 1;
            }
        }
        Self { words }
    }

    /// Map with room for `count` bits, all clear.
    #[must_use]
    pub fn empty(count: usize) -> Self {
        Self {
            words: vec![0; count.div_ceil(WORD_BITS)],
        }
    }

    /// Whether bit `i` is set.
    #[must_use]
    pub fn get(&self, i: usize) -> bool {
        self.words
            .get(i / WORD_BITS)
            .is_some_and(|w| w & (1 << (i % WORD_BITS)) != 0)
    }

    /// Set bit `i`; bits past the storage are ignored.
    pub fn set(&mut self, i: usize) {
        if let Some(w) = self.words.get_mut(i / WORD_BITS) {
            *w |= 1 << (i % WORD_BITS);
        }
    }

    /// Clear bit `i`.
    pub fn clear(&mut self, i: usize) {
        if let Some(w) = self.words.get_mut(i / WORD_BITS) {
            *w &= !(1 << (i % WORD_BITS));
        }
    }

    /// Backing words.
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Stored word count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// No stored words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Indices of the set bits, ascending.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &w)| {
            (0..WORD_BITS)
                .filter(move |b| w & (1 << b) != 0)
                .map(move |b| wi * WORD_BITS + b)
        })
    }
}

/// Index of the last non-zero word, plus one.
#[must_use]
pub fn map_storage_count(map: &DotMap) -> usize {
    map.words
        .iter()
        .rposition(|&w| w != 0)
        .map_or(0, |i| i + 1)
}

/// Drop trailing zero words. An all-clear map compacts to length 0.
#[must_use]
pub fn compact(mut map: DotMap) -> DotMap {
    map.words.truncate(map_storage_count(&map));
    map.words.shrink_to_fit();
    map
}

/// Number of set bits.
#[must_use]
pub fn point_count(map: &DotMap) -> usize {
    map.words.iter().map(|w| w.count_ones() as usize).sum()
}

/// Dot positions of `map` on the sphere at `center` with `radius`.
pub fn get_points<'a>(
    map: &'a DotMap,
    center: Vec3,
    radius: f32,
    level: usize,
) -> impl Iterator<Item = Vec3> + 'a {
    let vertices = Geodesic::get().vertices(level);
    map.iter()
        .filter_map(move |k| vertices.get(k))
        .map(move |&v| center + v * radius)
}

/// A neighbour sphere, radius already inflated by the probe and squared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Center.
    pub center: Vec3,
    /// `(r + probe)²`.
    pub radius2: f32,
}

/// Atoms whose probe-inflated spheres overlap atom `i`'s.
#[must_use]
pub fn find_neighbors(model: &MolecularModel, i: usize, probe: f32) -> Vec<Neighbor> {
    let atoms = model.atoms();
    let Some(me) = atoms.get(i) else {
        return Vec::new();
    };
    let ri = me.vdw_radius() + probe;
    atoms
        .iter()
        .enumerate()
        .filter(|&(j, a)| j != i && a.model_index == me.model_index)
        .filter_map(|(_, a)| {
            let rj = a.vdw_radius() + probe;
            let reach = ri + rj;
            (me.position.distance_squared(a.position) < reach * reach).then_some(Neighbor {
                center: a.position,
                radius2: rj * rj,
            })
        })
        .collect()
}

/// Exposure bits of the sphere at `center` with `radius + probe`.
///
/// Starts from all set and clears the vertices buried in a neighbour. The
/// neighbour scan resumes at the last one that buried a vertex.
#[must_use]
pub fn calc_convex_bits(
    center: Vec3,
    radius: f32,
    probe: f32,
    neighbors: &[Neighbor],
    level: usize,
) -> DotMap {
    let vertices = Geodesic::get().vertices(level);
    let mut map = DotMap::all(vertices.len());
    if neighbors.is_empty() {
        return map;
    }
    let combined = radius + probe;
    let mut last_used = 0;
    for (k, &v) in vertices.iter().enumerate().rev() {
        let point = center + v * combined;
        let start = last_used;
        loop {
            let n = neighbors[last_used];
            if point.distance_squared(n.center) < n.radius2 {
                map.clear(k);
                break;
            }
            last_used = (last_used + 1) % neighbors.len();
            if last_used == start {
                break;
            }
        }
    }
    map
}

/// One face-completion pass: every face of `base` with some but not all
/// vertices set gets its missing vertices set in `map`. Faces are always
/// tested against `base`, never against bits an earlier pass added.
/// Returns whether any bit of `map` changed.
pub fn add_incomplete_faces(map: &mut DotMap, base: &DotMap, level: usize) -> bool {
    let geodesic = Geodesic::get();
    let mut added = DotMap::empty(geodesic.vertex_count(level));
    for face in &geodesic.level(level).faces {
        let [a, b, c] = face.map(usize::from);
        let ok = [base.get(a), base.get(b), base.get(c)];
        if ok.iter().all(|&s| s) || !ok.iter().any(|&s| s) {
            continue;
        }
        for (v, set) in [a, b, c].into_iter().zip(ok) {
            if !set {
                added.set(v);
            }
        }
    }
    if map.words.len() < added.words.len() {
        map.words.resize(added.words.len(), 0);
    }
    let mut changed = false;
    for (w, a) in map.words.iter_mut().zip(&added.words) {
        changed |= *a & !*w != 0;
        *w |= a;
    }
    changed
}

/// Outcome of [`complete_faces`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Passes that changed the map.
    pub passes: usize,
    /// Whether another pass would leave the map unchanged.
    pub converged: bool,
}

/// Run up to `max_passes` completion passes seeded from the map as it was on
/// entry, stopping at the first pass that changes nothing.
pub fn complete_faces(map: &mut DotMap, level: usize, max_passes: usize) -> Completion {
    let base = map.clone();
    let mut passes = 0;
    for _ in 0..max_passes {
        if !add_incomplete_faces(map, &base, level) {
            return Completion {
                passes,
                converged: true,
            };
        }
        passes += 1;
    }
    let converged = !add_incomplete_faces(&mut map.clone(), &base, level);
    Completion { passes, converged }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Atom, Element};

    #[test]
    fn all_sets_exactly_count_bits() {
        let map = DotMap::all(42);
        assert_eq!(point_count(&map), 42);
        assert!(map.get(41));
        assert!(!map.get(42));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn storage_count_ignores_trailing_zero_words() {
        let mut map = DotMap::empty(162);
        assert_eq!(map_storage_count(&map), 0);
        map.set(40);
        assert_eq!(map_storage_count(&map), 2);
        let compacted = compact(map.clone());
        assert_eq!(compacted.len(), 2);
        assert_eq!(point_count(&compacted), 1);
        assert!(compact(DotMap::empty(162)).is_empty());
    }

    #[test]
    fn all_clear_map_stays_empty_after_completion() {
        let mut map = DotMap::empty(642);
        let done = complete_faces(&mut map, 3, 8);
        assert_eq!(done.passes, 0);
        assert!(done.converged);
        assert_eq!(compact(map).len(), 0);
    }

    #[test]
    fn full_map_is_a_fixpoint() {
        let mut map = DotMap::all(162);
        let base = map.clone();
        assert!(!add_incomplete_faces(&mut map, &base, 2));
        assert_eq!(point_count(&map), 162);
    }

    #[test]
    fn completion_fills_faces_around_a_single_dot() {
        let mut map = DotMap::empty(162);
        map.set(0);
        let base = map.clone();
        assert!(add_incomplete_faces(&mut map, &base, 2));
        // vertex 0 keeps its five or six face neighbours
        let n = point_count(&map);
        assert!((6..=7).contains(&n), "{n}");
        assert!(!add_incomplete_faces(&mut map, &base, 2));
        assert_eq!(point_count(&map), n);
    }

    #[test]
    fn completion_caps_at_zero_passes_without_converging() {
        let mut map = DotMap::empty(162);
        map.set(0);
        let done = complete_faces(&mut map, 2, 0);
        assert_eq!(done.passes, 0);
        assert!(!done.converged);
        assert_eq!(point_count(&map), 1);
    }

    #[test]
    fn completion_does_not_grow_on_later_passes() {
        let atoms = vec![
            Atom::new(Element::O, "O1", Vec3::ZERO),
            Atom::new(Element::O, "O2", Vec3::new(1.2, 0.0, 0.0)),
        ];
        let model = MolecularModel::new(atoms, Vec::new()).unwrap();
        let neighbors = find_neighbors(&model, 0, 1.2);
        assert_eq!(neighbors.len(), 1);
        let radius = model.atoms()[0].vdw_radius();
        let mut map = calc_convex_bits(Vec3::ZERO, radius, 1.2, &neighbors, 3);
        let base = map.clone();
        let before = point_count(&map);
        assert!(before > 0 && before < 642);

        let done = complete_faces(&mut map, 3, 2);
        assert_eq!(done.passes, 1);
        assert!(done.converged);
        let after = point_count(&map);
        assert!(after > before);

        assert!(!add_incomplete_faces(&mut map, &base, 3));
        assert_eq!(point_count(&map), after);
    }

    #[test]
    fn isolated_atom_is_fully_exposed() {
        let map = calc_convex_bits(Vec3::ZERO, 1.7, 1.2, &[], 3);
        assert_eq!(point_count(&map), 642);
    }

    #[test]
    fn neighbour_buries_the_facing_cap() {
        let atoms = vec![
            Atom::new(Element::C, "C1", Vec3::ZERO),
            Atom::new(Element::C, "C2", Vec3::new(1.5, 0.0, 0.0)),
            Atom::new(Element::C, "C3", Vec3::new(40.0, 0.0, 0.0)),
        ];
        let model = MolecularModel::new(atoms, Vec::new()).unwrap();
        let neighbors = find_neighbors(&model, 0, 0.0);
        assert_eq!(neighbors.len(), 1);
        let map = calc_convex_bits(Vec3::ZERO, 1.7, 0.0, &neighbors, 2);
        let vertices = Geodesic::get().vertices(2);
        let exposed = point_count(&map);
        assert!(exposed > 0 && exposed < 162);
        for k in map.iter() {
            let p = vertices[k] * 1.7;
            assert!(p.distance_squared(Vec3::new(1.5, 0.0, 0.0)) >= 1.7 * 1.7);
        }
        let dots: Vec<Vec3> = get_points(&map, Vec3::ZERO, 1.7, 2).collect();
        assert_eq!(dots.len(), exposed);
        assert!(dots.iter().all(|d| d.x < 0.8));
    }

    #[test]
    fn buried_atom_compacts_to_nothing() {
        let neighbors = [Neighbor {
            center: Vec3::ZERO,
            radius2: 100.0,
        }];
        let mut map = calc_convex_bits(Vec3::ZERO, 1.0, 0.0, &neighbors, 1);
        let _ = complete_faces(&mut map, 1, 2);
        assert!(compact(map).is_empty());
    }
}
