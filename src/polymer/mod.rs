//! Backbone-derived shapes: trace, backbone, ribbons, strands, cartoon and
//! rockets.
//!
//! Every polymer of the model gets an [`MpsPolymer`] holding its per-segment
//! style arrays and lazily built segment meshes. Segment `i` runs from
//! residue `i` to residue `i + 1`, so a chain of `n` residues has `n - 1`
//! styled segments.
//!
//! # Width codes
//!
//! A negative `mad` is resolved per segment by [`MpsPolymer::special_mad`]:
//!
//! | code | meaning |
//! |------|---------|
//! | -1 | the family's "on" width |
//! | -2 | structure-dependent width |
//! | -3 | B-factor scaled, 250..2000 |
//! | -4 | twice the mean positional displacement |

pub mod frame;
pub mod mesh_cylinder;
pub mod spline;

use std::f32::consts::PI;

use self::frame::PolymerFrame;
use self::mesh_cylinder::{create_mesh_cylinder, SegmentMads};
use crate::camera::Projection;
use crate::g3d::{Colix, ColorValue, Palette, ScreenPool};
use crate::mesh::Mesh;
use crate::model::{MolecularModel, Polymer, PolymerKind};
use crate::options::{GeometryOptions, Options};
use crate::shape::{
    ClosestAtom, Clickable, Colorable, ShapeContext, ShapeKind, Sizable,
    StyleRecord,
};
use crate::util::BitSet;

/// The six polymer shape families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MpsFamily {
    /// Cylinders between lead atoms.
    Backbone,
    /// Hermite tube.
    Trace,
    /// Flat ribbons.
    Ribbons,
    /// Parallel hermite strands.
    Strands,
    /// Sheet arrows, helix ribbons, coil ropes.
    Cartoon,
    /// Cartoon with helices drawn as cylinders.
    Rockets,
}

/// Widths substituted for the negative codes -1 and -2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MadDefaults {
    /// Width for -1; -2 means "use the structure width".
    pub mad_on: i16,
    /// Helix or sheet width for -2.
    pub mad_helix_sheet: i16,
    /// Turn or coil width for -2.
    pub mad_turn_random: i16,
    /// Nucleic acid width for -2.
    pub mad_dna_rna: i16,
}

impl MpsFamily {
    /// Width defaults of this family.
    #[must_use]
    pub fn defaults(self) -> MadDefaults {
        let (mad_on, mad_helix_sheet, mad_turn_random, mad_dna_rna) = match self {
            Self::Trace => (600, 1500, 500, 1500),
            Self::Backbone => (1, 1500, 500, 1500),
            Self::Ribbons => (-2, 3000, 500, 1300),
            Self::Strands | Self::Cartoon | Self::Rockets => (-2, 3000, 800, 5000),
        };
        MadDefaults {
            mad_on,
            mad_helix_sheet,
            mad_turn_random,
            mad_dna_rna,
        }
    }

    /// Matching shape kind.
    #[must_use]
    pub fn kind(self) -> ShapeKind {
        match self {
            Self::Backbone => ShapeKind::Backbone,
            Self::Trace => ShapeKind::Trace,
            Self::Ribbons => ShapeKind::Ribbons,
            Self::Strands => ShapeKind::Strands,
            Self::Cartoon => ShapeKind::Cartoon,
            Self::Rockets => ShapeKind::Rockets,
        }
    }

    /// How segment `i` of `frame` is drawn by this family.
    #[must_use]
    pub fn segment_style(self, frame: &PolymerFrame<'_>, i: usize, rockets: bool) -> SegmentStyle {
        match self {
            Self::Backbone => SegmentStyle::Cylinder,
            Self::Trace => SegmentStyle::Conic { special: false },
            Self::Ribbons => SegmentStyle::Ribbon,
            Self::Strands => SegmentStyle::Strand,
            Self::Cartoon | Self::Rockets => {
                let rockets = rockets || self == Self::Rockets;
                if rockets && frame.is_helix(i) {
                    return SegmentStyle::Rocket;
                }
                if !frame.is_special(i) {
                    return SegmentStyle::Conic { special: true };
                }
                let next = i + 1;
                let continues = next < frame.count()
                    && frame.visible().get(next)
                    && frame.structure(next) == frame.structure(i);
                if continues {
                    SegmentStyle::Ribbon
                } else {
                    SegmentStyle::Arrowhead
                }
            }
        }
    }
}

/// Drawing style of one polymer segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStyle {
    /// Straight cylinder, or a line for `mad == 1`.
    Cylinder,
    /// Variable-width hermite tube.
    Conic {
        /// Blend widths toward non-special neighbours.
        special: bool,
    },
    /// Filled hermite ribbon.
    Ribbon,
    /// Sheet or helix end.
    Arrowhead,
    /// Offset hermite lines.
    Strand,
    /// Part of a helix cylinder.
    Rocket,
}

impl SegmentStyle {
    /// Widths and aspect ratio of the mesh for this segment, when it is
    /// drawn as one this frame.
    #[must_use]
    pub fn mesh_request(
        self,
        frame: &PolymerFrame<'_>,
        projection: &dyn Projection,
        i: usize,
    ) -> Option<(SegmentMads, f32)> {
        let (mads, aspect) = match self {
            Self::Conic { special } => (frame.segment_mads(i, special), 1.0),
            Self::Ribbon => (frame.segment_mads(i, true), frame.aspect_ratio()),
            _ => return None,
        };
        let [_, mid, _] = frame.diameters(projection, i, mads);
        frame.wants_mesh(mid).then_some((mads, aspect))
    }
}

/// Per-polymer style arrays and segment meshes.
#[derive(Debug, Clone)]
pub struct MpsPolymer {
    polymer_index: usize,
    mads: Vec<i16>,
    colixes: Vec<Colix>,
    palettes: Vec<Palette>,
    size_set: BitSet,
    colix_set: BitSet,
    meshes: Vec<Option<Mesh>>,
    mesh_ready: Vec<bool>,
}

impl MpsPolymer {
    /// Unstyled arrays for polymer `polymer_index` with `count` residues.
    #[must_use]
    pub fn new(polymer_index: usize, count: usize) -> Self {
        Self {
            polymer_index,
            mads: vec![0; count + 1],
            colixes: vec![Colix::INHERIT; count],
            palettes: vec![Palette::Cpk; count],
            size_set: BitSet::new(),
            colix_set: BitSet::new(),
            meshes: vec![None; count],
            mesh_ready: vec![false; count],
        }
    }

    /// Index of the polymer in the model.
    #[must_use]
    pub fn polymer_index(&self) -> usize {
        self.polymer_index
    }

    /// Residue count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colixes.len()
    }

    /// True for an empty chain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colixes.is_empty()
    }

    /// Segment widths, length `n + 1`.
    #[must_use]
    pub fn mads(&self) -> &[i16] {
        &self.mads
    }

    /// Segment colors, length `n`.
    #[must_use]
    pub fn colixes(&self) -> &[Colix] {
        &self.colixes
    }

    /// Palette each segment color was last taken from.
    #[must_use]
    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    /// Segments with a positive width.
    #[must_use]
    pub fn size_set(&self) -> &BitSet {
        &self.size_set
    }

    /// Segments with an explicit color.
    #[must_use]
    pub fn colix_set(&self) -> &BitSet {
        &self.colix_set
    }

    /// Mesh of segment `i`, when one was built.
    #[must_use]
    pub fn mesh(&self, i: usize) -> Option<&Mesh> {
        self.meshes.get(i).and_then(Option::as_ref)
    }

    /// Whether segment `i` has an up-to-date mesh (or a settled failure).
    #[must_use]
    pub fn is_mesh_ready(&self, i: usize) -> bool {
        self.mesh_ready.get(i).copied().unwrap_or(false)
    }

    /// Styled segments under the selection rule: both lead atoms selected,
    /// or either one in OR mode.
    fn styled_segments<'s>(
        selection: &'s BitSet,
        or_mode: bool,
        polymer: &'s Polymer,
    ) -> impl Iterator<Item = usize> + 's {
        let leads = polymer.monomers();
        (0..leads.len().saturating_sub(1)).filter(move |&i| {
            let a = selection.get(leads[i].lead_atom);
            let b = selection.get(leads[i + 1].lead_atom);
            if or_mode { a || b } else { a && b }
        })
    }

    /// Set the width of every styled segment. Unstyled segments keep their
    /// previous width.
    pub fn set_mad(
        &mut self,
        mad: i16,
        selection: &BitSet,
        or_mode: bool,
        polymer: &Polymer,
        model: &MolecularModel,
        defaults: MadDefaults,
    ) {
        let n = self.len();
        let styled: Vec<usize> =
            Self::styled_segments(selection, or_mode, polymer).collect();
        for i in styled {
            self.mads[i] = if mad >= 0 {
                mad
            } else {
                Self::special_mad(mad, i, polymer, model, defaults)
            };
            self.size_set.set_to(i, self.mads[i] > 0);
            self.falsify_mesh(i, true);
        }
        if n > 0 {
            self.mads[n] = self.mads[n - 1];
        }
    }

    /// Resolve a negative width code for residue `i`.
    #[must_use]
    pub fn special_mad(
        mad: i16,
        i: usize,
        polymer: &Polymer,
        model: &MolecularModel,
        defaults: MadDefaults,
    ) -> i16 {
        let Some(monomer) = polymer.monomers().get(i) else {
            return 0;
        };
        let bfactor = model
            .atoms()
            .get(monomer.lead_atom)
            .map_or(0.0, |a| a.bfactor);
        match mad {
            -1 if defaults.mad_on >= 0 => defaults.mad_on,
            -1 if defaults.mad_on != -2 => {
                log::error!("width code -1 has no default ({})", defaults.mad_on);
                0
            }
            -1 | -2 => {
                if monomer.structure.is_helix_or_sheet() {
                    defaults.mad_helix_sheet
                } else if polymer.kind().is_nucleic() {
                    defaults.mad_dna_rna
                } else {
                    defaults.mad_turn_random
                }
            }
            -3 => {
                let (lo, hi) = polymer.bfactor_range();
                let range = hi - lo;
                if range <= 0.0 {
                    return 0;
                }
                let percentile = (bfactor - lo) / range;
                (1750.0 * percentile + 250.0) as i16
            }
            -4 => {
                let displacement = (bfactor.max(0.0) / (8.0 * PI * PI)).sqrt();
                (2.0 * (displacement * 1000.0).trunc()).min(f32::from(i16::MAX)) as i16
            }
            _ => {
                log::error!("unrecognized width code {mad}");
                0
            }
        }
    }

    /// Set the color of every styled segment. UNRECOGNIZED takes the palette
    /// color of the segment's lead atom.
    pub fn set_colix(
        &mut self,
        colix: Colix,
        palette: Palette,
        selection: &BitSet,
        polymer: &Polymer,
        ctx: &mut ShapeContext<'_>,
    ) {
        let or_mode = ctx.bond_mode_or();
        let styled: Vec<usize> =
            Self::styled_segments(selection, or_mode, polymer).collect();
        let kind = Some(polymer.kind());
        for i in styled {
            let lead = polymer.monomers()[i].lead_atom;
            self.colixes[i] = ctx.colix_or_palette(colix, palette, lead, kind);
            self.palettes[i] = palette;
            self.colix_set.set_to(i, !self.colixes[i].is_inherit());
        }
    }

    /// Set or clear translucency on every styled segment.
    pub fn set_translucent(
        &mut self,
        translucent: bool,
        selection: &BitSet,
        or_mode: bool,
        polymer: &Polymer,
    ) {
        let styled: Vec<usize> =
            Self::styled_segments(selection, or_mode, polymer).collect();
        for i in styled {
            self.colixes[i] = self.colixes[i].with_translucency(translucent);
            self.colix_set.set_to(i, !self.colixes[i].is_inherit());
        }
    }

    /// Mark the mesh of segment `i` stale; with `and_nearby` also its
    /// neighbours, whose ends blend into it.
    pub fn falsify_mesh(&mut self, i: usize, and_nearby: bool) {
        let n = self.mesh_ready.len();
        if i >= n {
            return;
        }
        self.mesh_ready[i] = false;
        if !and_nearby {
            return;
        }
        if i > 0 {
            self.mesh_ready[i - 1] = false;
        }
        if i + 1 < n {
            self.mesh_ready[i + 1] = false;
        }
    }

    /// Mark every mesh stale.
    pub fn falsify_all(&mut self) {
        self.mesh_ready.fill(false);
    }

    /// Effective color of residue `i`.
    #[must_use]
    pub fn lead_colix(&self, i: usize, polymer: &Polymer, model: &MolecularModel) -> Colix {
        let owner = polymer
            .monomers()
            .get(i)
            .and_then(|m| model.atoms().get(m.lead_atom))
            .map_or(Colix::INHERIT, |a| a.colix);
        Colix::inherit(self.colixes.get(i).copied().unwrap_or_default(), owner)
    }

    fn store_mesh(&mut self, i: usize, mesh: Option<Mesh>) {
        if let Some(slot) = self.meshes.get_mut(i) {
            *slot = mesh;
            self.mesh_ready[i] = true;
        }
    }
}

/// Options whose change invalidates every segment mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MeshKey {
    high_res: bool,
    trace_alpha: bool,
    hermite_level: usize,
    aspect_ratio: f32,
    sheet_smoothing: f32,
}

impl MeshKey {
    fn new(g: &GeometryOptions) -> Self {
        Self {
            high_res: g.high_resolution,
            trace_alpha: g.trace_alpha,
            hermite_level: g.clamped_hermite_level(),
            aspect_ratio: g.effective_aspect_ratio(),
            sheet_smoothing: g.sheet_smoothing,
        }
    }
}

/// One polymer shape family over every polymer of the model.
#[derive(Debug, Clone)]
pub struct Mps {
    family: MpsFamily,
    style: StyleRecord,
    polymers: Vec<MpsPolymer>,
    mesh_key: Option<MeshKey>,
}

impl Mps {
    /// Unstyled shape for every polymer in `model`.
    #[must_use]
    pub fn new(family: MpsFamily, model: &MolecularModel) -> Self {
        let polymers = model
            .polymers()
            .iter()
            .enumerate()
            .map(|(i, p)| MpsPolymer::new(i, p.len()))
            .collect();
        Self {
            family,
            style: StyleRecord::default(),
            polymers,
            mesh_key: None,
        }
    }

    /// Family.
    #[must_use]
    pub fn family(&self) -> MpsFamily {
        self.family
    }

    /// Last width and color written to the whole shape.
    #[must_use]
    pub fn style(&self) -> &StyleRecord {
        &self.style
    }

    /// Per-polymer state.
    #[must_use]
    pub fn polymers(&self) -> &[MpsPolymer] {
        &self.polymers
    }

    /// Build the segment meshes this frame will draw. Runs before the render
    /// pass because meshes depend on the projected widths.
    pub fn prepare(
        &mut self,
        model: &MolecularModel,
        options: &Options,
        projection: &dyn Projection,
        pool: &ScreenPool,
    ) {
        let key = MeshKey::new(&options.geometry);
        if self.mesh_key != Some(key) {
            if self.mesh_key.is_some() {
                log::debug!("{}: mesh options changed, invalidating", self.family.kind());
            }
            for p in &mut self.polymers {
                p.falsify_all();
            }
            self.mesh_key = Some(key);
        }
        if key.aspect_ratio <= 0.0 {
            return;
        }
        let family = self.family;
        let rockets = options.geometry.cartoon_rockets;
        for style in &mut self.polymers {
            let built = {
                let Some(frame) =
                    PolymerFrame::new(model, style, &options.geometry, projection, pool)
                else {
                    continue;
                };
                if frame.polymer().kind() == PolymerKind::Carbohydrate {
                    continue;
                }
                build_meshes(family, &frame, projection, rockets)
            };
            for (i, mesh) in built {
                style.store_mesh(i, mesh);
            }
        }
    }
}

fn build_meshes(
    family: MpsFamily,
    frame: &PolymerFrame<'_>,
    projection: &dyn Projection,
    rockets: bool,
) -> Vec<(usize, Option<Mesh>)> {
    let mut built = Vec::new();
    let source = frame.segment_source();
    let shape = family.kind();
    for i in frame.visible().iter() {
        if frame.style().is_mesh_ready(i) {
            continue;
        }
        let Some((mads, aspect)) = family
            .segment_style(frame, i, rockets)
            .mesh_request(frame, projection, i)
        else {
            continue;
        };
        let id = format!("mesh_{shape}_{}_{i}", frame.style().polymer_index());
        let mesh = match create_mesh_cylinder(&id, frame.lead_colix(i), &source, i, mads, aspect) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::error!("segment mesh {id}: {e}");
                None
            }
        };
        built.push((i, mesh));
    }
    built
}

impl Sizable for Mps {
    fn set_size(&mut self, mad: i16, selection: &BitSet, ctx: &mut ShapeContext<'_>) {
        self.style.mad = mad;
        let defaults = self.family.defaults();
        let or_mode = ctx.bond_mode_or();
        for style in &mut self.polymers {
            if let Some(polymer) = ctx.model.polymers().get(style.polymer_index) {
                style.set_mad(mad, selection, or_mode, polymer, ctx.model, defaults);
            }
        }
    }
}

impl Colorable for Mps {
    fn set_color(&mut self, color: ColorValue, selection: &BitSet, ctx: &mut ShapeContext<'_>) {
        let (colix, palette) = ctx.resolve_color(color);
        self.style.colix = colix;
        let model = ctx.model;
        for style in &mut self.polymers {
            if let Some(polymer) = model.polymers().get(style.polymer_index) {
                style.set_colix(colix, palette, selection, polymer, ctx);
            }
        }
    }

    fn set_translucent(
        &mut self,
        translucent: bool,
        selection: &BitSet,
        ctx: &mut ShapeContext<'_>,
    ) {
        let or_mode = ctx.bond_mode_or();
        for style in &mut self.polymers {
            if let Some(polymer) = ctx.model.polymers().get(style.polymer_index) {
                style.set_translucent(translucent, selection, or_mode, polymer);
            }
        }
    }
}

impl Clickable for Mps {
    fn find_nearest_atom(
        &self,
        x: i32,
        y: i32,
        model: &MolecularModel,
        projection: &dyn Projection,
    ) -> Option<ClosestAtom> {
        let mut best = None;
        for style in &self.polymers {
            let Some(polymer) = model.polymers().get(style.polymer_index) else {
                continue;
            };
            for (i, m) in polymer.monomers().iter().enumerate() {
                let mad = i32::from(style.mads[i]);
                if mad <= 0 || !model.is_atom_displayed(m.lead_atom) {
                    continue;
                }
                let s = projection.transform_point(polymer.lead_points()[i]);
                let r = (projection.scale_to_screen(s.z, mad) / 2).max(2);
                let (dx, dy) = (s.x - x, s.y - y);
                let d2 = dx * dx + dy * dy;
                if d2 <= r * r {
                    best = ClosestAtom::nearer(best, Some(ClosestAtom { atom: m.lead_atom, distance2: d2 }));
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::camera::{Camera, Viewport};
    use crate::g3d::ColorTable;
    use crate::model::{ideal_helix, Atom, Element, Monomer, StructureKind};
    use crate::options::CameraOptions;

    fn chain(n: usize) -> MolecularModel {
        let points: Vec<Vec3> = (0..n).map(|i| Vec3::new(i as f32 * 3.8, 0.0, 0.0)).collect();
        MolecularModel::from_ca_trace('A', &points).unwrap()
    }

    fn styled_count(style: &MpsPolymer, mad: i16) -> usize {
        style.mads()[..style.len()].iter().filter(|&&m| m == mad).count()
    }

    #[test]
    fn four_residues_give_three_segments() {
        let model = chain(4);
        let polymer = &model.polymers()[0];
        let mut style = MpsPolymer::new(0, 4);
        style.set_mad(200, &model.all_atoms(), false, polymer, &model, MpsFamily::Trace.defaults());
        assert_eq!(&style.mads()[..3], &[200, 200, 200]);
        assert_eq!(style.mads()[3], 0);
        assert_eq!(style.mads()[4], style.mads()[3]);
        assert_eq!(style.size_set().cardinality(), 3);
        assert!(!style.size_set().get(3));
    }

    #[test]
    fn or_mode_styles_at_least_as_many_segments() {
        let model = chain(30);
        let polymer = &model.polymers()[0];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let selection: BitSet = (0..30).filter(|_| rng.random_bool(0.4)).collect();
            let mut and = MpsPolymer::new(0, 30);
            let mut or = MpsPolymer::new(0, 30);
            let d = MpsFamily::Trace.defaults();
            and.set_mad(300, &selection, false, polymer, &model, d);
            or.set_mad(300, &selection, true, polymer, &model, d);
            assert!(styled_count(&or, 300) >= styled_count(&and, 300));
        }
    }

    #[test]
    fn unselected_segments_keep_their_width() {
        let model = chain(6);
        let polymer = &model.polymers()[0];
        let mut style = MpsPolymer::new(0, 6);
        let d = MpsFamily::Trace.defaults();
        style.set_mad(400, &model.all_atoms(), false, polymer, &model, d);
        let part: BitSet = [0, 1].into_iter().collect();
        style.set_mad(900, &part, false, polymer, &model, d);
        assert_eq!(&style.mads()[..5], &[900, 400, 400, 400, 400]);
    }

    #[test]
    fn special_width_codes() {
        let mut atoms: Vec<Atom> = (0..4)
            .map(|i| Atom {
                bfactor: 10.0 * i as f32,
                ..Atom::new(Element::C, "CA", Vec3::new(i as f32 * 3.8, 0.0, 0.0))
            })
            .collect();
        atoms[0].bfactor = 0.0;
        let mut model = MolecularModel::new(atoms, Vec::new()).unwrap();
        let monomers = vec![
            Monomer::new(0, StructureKind::Helix),
            Monomer::new(1, StructureKind::Coil),
            Monomer::new(2, StructureKind::Coil),
            Monomer::new(3, StructureKind::Coil),
        ];
        let _ = model.add_polymer(PolymerKind::Protein, monomers).unwrap();
        let polymer = &model.polymers()[0];
        let trace = MpsFamily::Trace.defaults();
        let cartoon = MpsFamily::Cartoon.defaults();
        let mad = |code, i, d| MpsPolymer::special_mad(code, i, polymer, &model, d);

        assert_eq!(mad(-1, 1, trace), 600);
        assert_eq!(mad(-1, 0, cartoon), 3000);
        assert_eq!(mad(-2, 0, cartoon), 3000);
        assert_eq!(mad(-2, 1, cartoon), 800);
        assert_eq!(mad(-3, 0, trace), 250);
        assert_eq!(mad(-3, 3, trace), 2000);
        // b = 10: sqrt(10 / 8pi^2) = 0.3559
        assert_eq!(mad(-4, 1, trace), 710);
        assert_eq!(mad(-9, 1, trace), 0);
        let bad = MadDefaults { mad_on: -5, ..trace };
        assert_eq!(mad(-1, 1, bad), 0);
    }

    #[test]
    fn huge_bfactor_width_saturates() {
        let atoms: Vec<Atom> = [0.0, 2.0e6]
            .into_iter()
            .enumerate()
            .map(|(i, b)| Atom {
                bfactor: b,
                ..Atom::new(Element::C, "CA", Vec3::new(i as f32 * 3.8, 0.0, 0.0))
            })
            .collect();
        let mut model = MolecularModel::new(atoms, Vec::new()).unwrap();
        let monomers = vec![
            Monomer::new(0, StructureKind::Coil),
            Monomer::new(1, StructureKind::Coil),
        ];
        let _ = model.add_polymer(PolymerKind::Protein, monomers).unwrap();
        let d = MpsFamily::Trace.defaults();
        let mad = MpsPolymer::special_mad(-4, 1, &model.polymers()[0], &model, d);
        assert_eq!(mad, i16::MAX);
    }

    #[test]
    fn nucleic_structure_width() {
        let atoms: Vec<Atom> = (0..3)
            .map(|i| Atom::new(Element::P, "P", Vec3::new(i as f32 * 6.0, 0.0, 0.0)))
            .collect();
        let mut model = MolecularModel::new(atoms, Vec::new()).unwrap();
        let monomers = (0..3).map(|i| Monomer::new(i, StructureKind::Coil)).collect();
        let _ = model.add_polymer(PolymerKind::Dna, monomers).unwrap();
        let d = MpsFamily::Ribbons.defaults();
        assert_eq!(MpsPolymer::special_mad(-2, 0, &model.polymers()[0], &model, d), 1300);
    }

    #[test]
    fn unrecognized_color_falls_back_to_palette() {
        let model = chain(4);
        let options = Options::default();
        let mut colors = ColorTable::new();
        let mut ctx = ShapeContext {
            model: &model,
            colors: &mut colors,
            options: &options,
        };
        let mut mps = Mps::new(MpsFamily::Cartoon, &model);
        mps.set_color(ColorValue::Palette(Palette::Chain), &model.all_atoms(), &mut ctx);
        let style = &mps.polymers()[0];
        let expected = ctx.colors.colix_f(options.colors.chain_color('A'));
        assert_eq!(style.colixes()[0], expected);
        assert!(!style.colixes()[0].is_unrecognized());
        assert_eq!(style.palettes()[0], Palette::Chain);
        assert_eq!(style.colix_set().cardinality(), 3);

        mps.set_color(ColorValue::None, &model.all_atoms(), &mut ctx);
        let style = &mps.polymers()[0];
        assert_eq!(style.lead_colix(0, &model.polymers()[0], &model), model.atoms()[0].colix);
        assert!(style.colix_set().is_empty());
    }

    #[test]
    fn translucency_rides_on_inherited_color() {
        let model = chain(4);
        let polymer = &model.polymers()[0];
        let mut style = MpsPolymer::new(0, 4);
        style.set_translucent(true, &model.all_atoms(), false, polymer);
        let c = style.lead_colix(1, polymer, &model);
        assert!(c.is_translucent());
        assert_eq!(c.index(), model.atoms()[1].colix.index());
    }

    #[test]
    fn falsify_marks_neighbours() {
        let mut style = MpsPolymer::new(0, 5);
        style.mesh_ready.fill(true);
        style.falsify_mesh(2, true);
        assert_eq!(style.mesh_ready, vec![true, false, false, false, true]);
        style.mesh_ready.fill(true);
        style.falsify_mesh(4, false);
        assert_eq!(style.mesh_ready, vec![true, true, true, true, false]);
    }

    fn viewport(model: &MolecularModel) -> Viewport {
        let (center, radius) = model.bounds();
        let camera = Camera::framing(center, radius, 1.0, &CameraOptions::default());
        Viewport::new(camera, 800, 800)
    }

    #[test]
    fn prepare_builds_meshes_once() {
        let model = MolecularModel::from_ca_trace('A', &ideal_helix(12, Vec3::ZERO)).unwrap();
        let mut options = Options::default();
        options.geometry.hermite_level = 2;
        options.geometry.high_resolution = true;
        let mut colors = ColorTable::new();
        let mut mps = Mps::new(MpsFamily::Trace, &model);
        {
            let mut ctx = ShapeContext {
                model: &model,
                colors: &mut colors,
                options: &options,
            };
            mps.set_size(3000, &model.all_atoms(), &mut ctx);
        }
        let vp = viewport(&model);
        let pool = ScreenPool::new();
        mps.prepare(&model, &options, &vp, &pool);
        assert_eq!(pool.outstanding(), 0);
        let style = &mps.polymers()[0];
        let built = (0..11).filter(|&i| style.mesh(i).is_some()).count();
        assert!(built > 0);
        assert!(style.is_mesh_ready(0));

        // changing an option that shapes meshes invalidates them
        options.geometry.hermite_level = 3;
        mps.prepare(&model, &options, &vp, &pool);
        let np = (3 + 1) * 2 * 2 - 2;
        let mesh = (0..11).find_map(|i| mps.polymers()[0].mesh(i)).unwrap();
        assert_eq!(mesh.vertex_count() % np, 0);
    }

    #[test]
    fn pick_finds_lead_atom() {
        let model = chain(5);
        let mut options = Options::default();
        options.display.bond_selection_mode_or = true;
        let mut colors = ColorTable::new();
        let mut ctx = ShapeContext {
            model: &model,
            colors: &mut colors,
            options: &options,
        };
        let mut mps = Mps::new(MpsFamily::Trace, &model);
        mps.set_size(2000, &model.all_atoms(), &mut ctx);
        let vp = viewport(&model);
        let s = vp.transform_point(model.atoms()[2].position);
        let hit = mps.find_nearest_atom(s.x + 1, s.y, &model, &vp).unwrap();
        assert_eq!(hit.atom, 2);
        assert!(mps.find_nearest_atom(-500, -500, &model, &vp).is_none());
    }
}
