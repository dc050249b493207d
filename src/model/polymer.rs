//! Polymers: ordered monomers plus the derived geometry every polymer shape
//! shares (lead points, lead midpoints, wing vectors).
//!
//! All derived arrays have length `n + 1` for `n` monomers. Entry `n` repeats
//! the terminal lead point so segment `i` can always read `i + 1`.

use glam::Vec3;

use super::{Atom, StructureKind};
use crate::error::ShapeError;

/// Polymer chemistry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolymerKind {
    /// Amino acid chain; lead atom is Cα, wing atom is the carbonyl O.
    Protein,
    /// Deoxyribonucleic acid; lead atom is P.
    Dna,
    /// Ribonucleic acid; lead atom is P.
    Rna,
    /// Sugar chain. Polymer shapes skip these.
    Carbohydrate,
}

impl PolymerKind {
    /// DNA or RNA.
    #[must_use]
    pub fn is_nucleic(self) -> bool {
        matches!(self, Self::Dna | Self::Rna)
    }
}

/// One residue as seen by polymer shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monomer {
    /// Index of the lead atom in the model.
    pub lead_atom: usize,
    /// Atom that orients the ribbon plane, if present.
    pub wing_atom: Option<usize>,
    /// Secondary structure.
    pub structure: StructureKind,
}

impl Monomer {
    /// Monomer with a lead atom only.
    #[must_use]
    pub fn new(lead_atom: usize, structure: StructureKind) -> Self {
        Self {
            lead_atom,
            wing_atom: None,
            structure,
        }
    }
}

/// An ordered chain of monomers with derived geometry.
#[derive(Debug, Clone)]
pub struct Polymer {
    kind: PolymerKind,
    monomers: Vec<Monomer>,
    lead_points: Vec<Vec3>,
    lead_midpoints: Vec<Vec3>,
    wing_vectors: Vec<Vec3>,
    bfactor_range: (f32, f32),
}

impl Polymer {
    /// Build a polymer over `atoms`. Fails when a monomer references an atom
    /// outside the slice.
    pub fn new(
        kind: PolymerKind,
        monomers: Vec<Monomer>,
        atoms: &[Atom],
    ) -> Result<Self, ShapeError> {
        for (i, m) in monomers.iter().enumerate() {
            let bad = m.lead_atom >= atoms.len()
                || m.wing_atom.is_some_and(|w| w >= atoms.len());
            if bad {
                return Err(ShapeError::InvalidModel(format!(
                    "monomer {i} references an atom past {}",
                    atoms.len()
                )));
            }
        }
        let lead_points = lead_points(&monomers, atoms);
        let lead_midpoints = lead_midpoints(&lead_points);
        let wing_vectors = if monomers.iter().all(|m| m.wing_atom.is_some()) {
            wings_from_atoms(&monomers, atoms, &lead_points)
        } else {
            wings_from_midpoints(&lead_midpoints)
        };
        let bfactor_range = monomers.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), m| {
                let b = atoms[m.lead_atom].bfactor;
                (lo.min(b), hi.max(b))
            },
        );
        Ok(Self {
            kind,
            monomers,
            lead_points,
            lead_midpoints,
            wing_vectors,
            bfactor_range,
        })
    }

    /// Chemistry of the chain.
    #[must_use]
    pub fn kind(&self) -> PolymerKind {
        self.kind
    }

    /// Residues in order.
    #[must_use]
    pub fn monomers(&self) -> &[Monomer] {
        &self.monomers
    }

    /// Residue count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.monomers.len()
    }

    /// True for a chain without residues.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monomers.is_empty()
    }

    /// Lead atom positions, length `n + 1`.
    #[must_use]
    pub fn lead_points(&self) -> &[Vec3] {
        &self.lead_points
    }

    /// Midpoints between consecutive lead atoms, length `n + 1`.
    #[must_use]
    pub fn lead_midpoints(&self) -> &[Vec3] {
        &self.lead_midpoints
    }

    /// Ribbon-plane orientation per residue, length `n + 1`.
    #[must_use]
    pub fn wing_vectors(&self) -> &[Vec3] {
        &self.wing_vectors
    }

    /// Lowest and highest lead-atom B-factor.
    #[must_use]
    pub fn bfactor_range(&self) -> (f32, f32) {
        self.bfactor_range
    }

    /// Spline control points. Midpoints unless `trace_alpha`; with
    /// `trace_alpha`, sheet residues are pulled `sheet_smoothing` of the way
    /// toward their midpoint.
    #[must_use]
    pub fn control_points(
        &self,
        trace_alpha: bool,
        sheet_smoothing: f32,
    ) -> Vec<Vec3> {
        if !trace_alpha {
            return self.lead_midpoints.clone();
        }
        let s = sheet_smoothing.clamp(0.0, 1.0);
        let mut points = self.lead_points.clone();
        if s == 0.0 {
            return points;
        }
        for (i, m) in self.monomers.iter().enumerate() {
            let next_is_sheet = self
                .monomers
                .get(i + 1)
                .is_some_and(|n| n.structure == StructureKind::Sheet);
            if m.structure == StructureKind::Sheet && next_is_sheet {
                let mid = self.lead_midpoints[i + 1];
                points[i] = points[i].lerp(mid, s);
            }
        }
        points
    }
}

fn lead_points(monomers: &[Monomer], atoms: &[Atom]) -> Vec<Vec3> {
    let mut points: Vec<Vec3> =
        monomers.iter().map(|m| atoms[m.lead_atom].position).collect();
    if let Some(&last) = points.last() {
        points.push(last);
    }
    points
}

fn lead_midpoints(lead: &[Vec3]) -> Vec<Vec3> {
    if lead.is_empty() {
        return Vec::new();
    }
    let n = lead.len() - 1;
    let mut mids = Vec::with_capacity(n + 1);
    mids.push(lead[0]);
    for i in 1..n {
        mids.push((lead[i - 1] + lead[i]) * 0.5);
    }
    mids.push(lead[n]);
    mids
}

/// Flip `v` when it turns more than 90° from `prev`.
fn keep_sense(v: Vec3, prev: Option<Vec3>) -> Vec3 {
    match prev {
        Some(p) if v.dot(p) < 0.0 => -v,
        _ => v,
    }
}

fn wings_from_atoms(monomers: &[Monomer], atoms: &[Atom], lead: &[Vec3]) -> Vec<Vec3> {
    let n = monomers.len();
    let mut wings = vec![Vec3::X; n + 1];
    let mut prev: Option<Vec3> = None;
    for i in 1..n {
        let wing_prev = monomers[i - 1]
            .wing_atom
            .map_or(lead[i - 1], |w| atoms[w].position);
        let a = lead[i] - lead[i - 1];
        let b = lead[i - 1] - wing_prev;
        let Some(d) = a.cross(a.cross(b)).try_normalize() else {
            wings[i] = prev.unwrap_or(Vec3::X);
            continue;
        };
        let d = keep_sense(d, prev);
        wings[i] = d;
        prev = Some(d);
    }
    finish_wings(&mut wings);
    wings
}

fn wings_from_midpoints(mids: &[Vec3]) -> Vec<Vec3> {
    let n = mids.len().saturating_sub(1);
    let mut wings = vec![Vec3::X; n + 1];
    if n < 3 {
        return wings;
    }
    let mut prev: Option<Vec3> = None;
    for i in 1..n {
        let c = (mids[i - 1] - mids[i]).cross(mids[i + 1] - mids[i]);
        let Some(c) = c.try_normalize() else {
            wings[i] = prev.unwrap_or(Vec3::X);
            continue;
        };
        let c = keep_sense(c, prev);
        wings[i] = c;
        prev = Some(c);
    }
    finish_wings(&mut wings);
    wings
}

fn finish_wings(wings: &mut [Vec3]) {
    let n = wings.len() - 1;
    if n >= 2 {
        wings[0] = wings[1];
        wings[n] = wings[n - 1];
    }
}
