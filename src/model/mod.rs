//! Read-only molecular model consumed by shapes and renderers.
//!
//! Holds atoms, bonds and polymers along with the viewer-level visibility
//! state (hidden atoms, displayed model). Shapes never mutate it.

mod polymer;
mod secondary_structure;

use glam::Vec3;
pub use polymer::{Monomer, Polymer, PolymerKind};
pub use secondary_structure::{
    detect_secondary_structure, ideal_helix, ideal_strand, StructureKind,
};

use crate::error::ShapeError;
use crate::g3d::Colix;
use crate::util::BitSet;

/// Chemical element, limited to the ones that get distinct styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// Hydrogen.
    H,
    /// Carbon.
    C,
    /// Nitrogen.
    N,
    /// Oxygen.
    O,
    /// Phosphorus.
    P,
    /// Sulfur.
    S,
    /// Iron.
    Fe,
    /// Anything else.
    Other,
}

impl Element {
    /// Every variant, in colix order.
    pub const ALL: [Self; 8] = [
        Self::H,
        Self::C,
        Self::N,
        Self::O,
        Self::P,
        Self::S,
        Self::Fe,
        Self::Other,
    ];

    /// Parse an element symbol, case-insensitively.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol.trim().to_ascii_uppercase().as_str() {
            "H" | "D" => Self::H,
            "C" => Self::C,
            "N" => Self::N,
            "O" => Self::O,
            "P" => Self::P,
            "S" => Self::S,
            "FE" => Self::Fe,
            _ => Self::Other,
        }
    }

    /// Element symbol; `Xx` for [`Self::Other`].
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::H => "H",
            Self::C => "C",
            Self::N => "N",
            Self::O => "O",
            Self::P => "P",
            Self::S => "S",
            Self::Fe => "Fe",
            Self::Other => "Xx",
        }
    }

    /// Van der Waals radius in angstroms.
    #[must_use]
    pub fn vdw_radius(self) -> f32 {
        match self {
            Self::H => 1.2,
            Self::C => 1.7,
            Self::N => 1.55,
            Self::O => 1.52,
            Self::P => 1.8,
            Self::S => 1.8,
            Self::Fe => 1.95,
            Self::Other => 2.0,
        }
    }

    /// CPK color as `0xRRGGBB`.
    #[must_use]
    pub fn cpk_rgb(self) -> u32 {
        match self {
            Self::H => 0xFF_FFFF,
            Self::C => 0x90_9090,
            Self::N => 0x30_50F8,
            Self::O => 0xFF_0D0D,
            Self::P => 0xFF_8000,
            Self::S => 0xFF_FF30,
            Self::Fe => 0xE0_6633,
            Self::Other => 0xFF_1493,
        }
    }

    /// Pre-registered CPK colix.
    #[must_use]
    pub fn colix(self) -> Colix {
        let ordinal = Self::ALL.iter().position(|&e| e == self).unwrap_or(0);
        Colix::element(ordinal)
    }
}

/// One atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Position in angstroms.
    pub position: Vec3,
    /// Element.
    pub element: Element,
    /// Atom name (e.g. "CA").
    pub name: String,
    /// Residue name (e.g. "ALA").
    pub group: String,
    /// Residue sequence number.
    pub residue: i32,
    /// Chain identifier.
    pub chain: char,
    /// Temperature factor.
    pub bfactor: f32,
    /// Model (frame) this atom belongs to.
    pub model_index: usize,
    /// Secondary structure of the owning residue.
    pub structure: StructureKind,
    /// Default color, CPK unless overridden.
    pub colix: Colix,
}

impl Atom {
    /// Atom with default residue metadata.
    #[must_use]
    pub fn new(element: Element, name: &str, position: Vec3) -> Self {
        Self {
            position,
            element,
            name: name.to_owned(),
            group: "UNK".to_owned(),
            residue: 0,
            chain: 'A',
            bfactor: 0.0,
            model_index: 0,
            structure: StructureKind::Coil,
            colix: element.colix(),
        }
    }

    /// Van der Waals radius.
    #[must_use]
    pub fn vdw_radius(&self) -> f32 {
        self.element.vdw_radius()
    }
}

/// Bond order and style class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    /// Single covalent.
    Single,
    /// Double covalent.
    Double,
    /// Triple covalent.
    Triple,
    /// Quadruple covalent.
    Quadruple,
    /// Aromatic: one solid and one dashed stripe.
    Aromatic,
    /// Partial bond, drawn dashed.
    Partial,
    /// Hydrogen bond.
    Hydrogen,
    /// Stereo wedge toward the viewer.
    StereoNear,
    /// Stereo hash away from the viewer.
    StereoFar,
}

impl BondOrder {
    /// Number of parallel stripes drawn.
    #[must_use]
    pub fn stripe_count(self) -> usize {
        match self {
            Self::Double | Self::Aromatic => 2,
            Self::Triple => 3,
            Self::Quadruple => 4,
            _ => 1,
        }
    }
}

/// A bond between two atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    /// First atom.
    pub atom_a: usize,
    /// Second atom.
    pub atom_b: usize,
    /// Order.
    pub order: BondOrder,
}

impl Bond {
    /// Construct a bond.
    #[must_use]
    pub const fn new(atom_a: usize, atom_b: usize, order: BondOrder) -> Self {
        Self {
            atom_a,
            atom_b,
            order,
        }
    }
}

/// Atoms, bonds and polymers plus display filtering.
#[derive(Debug, Clone, Default)]
pub struct MolecularModel {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    polymers: Vec<Polymer>,
    hidden: BitSet,
    display_model: Option<usize>,
}

impl MolecularModel {
    /// Build a model; bonds must reference existing atoms.
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Result<Self, ShapeError> {
        if let Some(b) = bonds
            .iter()
            .find(|b| b.atom_a >= atoms.len() || b.atom_b >= atoms.len())
        {
            return Err(ShapeError::InvalidModel(format!(
                "bond {}-{} past atom count {}",
                b.atom_a,
                b.atom_b,
                atoms.len()
            )));
        }
        Ok(Self {
            atoms,
            bonds,
            ..Self::default()
        })
    }

    /// Register a polymer over existing atoms; lead and wing atoms inherit
    /// their monomer's secondary structure.
    pub fn add_polymer(
        &mut self,
        kind: PolymerKind,
        monomers: Vec<Monomer>,
    ) -> Result<usize, ShapeError> {
        let polymer = Polymer::new(kind, monomers, &self.atoms)?;
        for m in polymer.monomers() {
            self.atoms[m.lead_atom].structure = m.structure;
            if let Some(w) = m.wing_atom {
                self.atoms[w].structure = m.structure;
            }
        }
        self.polymers.push(polymer);
        Ok(self.polymers.len() - 1)
    }

    /// A protein chain of Cα atoms only, bonded in sequence, with secondary
    /// structure detected from the trace.
    pub fn from_ca_trace(chain: char, positions: &[Vec3]) -> Result<Self, ShapeError> {
        let structure = detect_secondary_structure(positions);
        let atoms = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| Atom {
                residue: i as i32 + 1,
                chain,
                group: "ALA".to_owned(),
                bfactor: 10.0 + i as f32,
                ..Atom::new(Element::C, "CA", p)
            })
            .collect();
        let bonds = (1..positions.len())
            .map(|i| Bond::new(i - 1, i, BondOrder::Single))
            .collect();
        let mut model = Self::new(atoms, bonds)?;
        let monomers = structure
            .iter()
            .enumerate()
            .map(|(i, &s)| Monomer::new(i, s))
            .collect();
        let _ = model.add_polymer(PolymerKind::Protein, monomers)?;
        Ok(model)
    }

    /// All atoms.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Atom count.
    #[must_use]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// All bonds.
    #[must_use]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// All polymers.
    #[must_use]
    pub fn polymers(&self) -> &[Polymer] {
        &self.polymers
    }

    /// Replace the hidden-atom set.
    pub fn set_hidden(&mut self, hidden: BitSet) {
        self.hidden = hidden;
    }

    /// Restrict display to one model index, or show all.
    pub fn set_display_model(&mut self, model: Option<usize>) {
        self.display_model = model;
    }

    /// Atom is not hidden and belongs to the displayed model.
    #[must_use]
    pub fn is_atom_displayed(&self, i: usize) -> bool {
        let Some(atom) = self.atoms.get(i) else {
            return false;
        };
        !self.hidden.get(i)
            && self.display_model.is_none_or(|m| m == atom.model_index)
    }

    /// Every atom index.
    #[must_use]
    pub fn all_atoms(&self) -> BitSet {
        BitSet::all(self.atoms.len())
    }

    /// Lowest and highest B-factor over all atoms; `(0, 0)` when empty.
    #[must_use]
    pub fn bfactor_range(&self) -> (f32, f32) {
        if self.atoms.is_empty() {
            return (0.0, 0.0);
        }
        self.atoms.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), a| (lo.min(a.bfactor), hi.max(a.bfactor)),
        )
    }

    /// Center and radius of the atom bounding sphere.
    #[must_use]
    pub fn bounds(&self) -> (Vec3, f32) {
        if self.atoms.is_empty() {
            return (Vec3::ZERO, 1.0);
        }
        let (lo, hi) = self.atoms.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), a| (lo.min(a.position), hi.max(a.position)),
        );
        let center = (lo + hi) * 0.5;
        let radius = self
            .atoms
            .iter()
            .map(|a| a.position.distance(center) + a.vdw_radius())
            .fold(0.0f32, f32::max);
        (center, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bond_past_atoms_is_rejected() {
        let atoms = vec![Atom::new(Element::C, "C1", Vec3::ZERO)];
        let bonds = vec![Bond::new(0, 1, BondOrder::Single)];
        assert!(MolecularModel::new(atoms, bonds).is_err());
    }

    #[test]
    fn ca_trace_builds_one_polymer() {
        let model = MolecularModel::from_ca_trace('A', &ideal_helix(10, Vec3::ZERO)).unwrap();
        assert_eq!(model.polymers().len(), 1);
        assert_eq!(model.polymers()[0].len(), 10);
        assert_eq!(model.bonds().len(), 9);
        assert_eq!(model.atoms()[0].structure, StructureKind::Helix);
    }

    #[test]
    fn hidden_and_display_model_filter_atoms() {
        let mut model = MolecularModel::from_ca_trace('A', &ideal_helix(4, Vec3::ZERO)).unwrap();
        model.set_hidden([1].into_iter().collect());
        assert!(model.is_atom_displayed(0));
        assert!(!model.is_atom_displayed(1));
        model.set_display_model(Some(2));
        assert!(!model.is_atom_displayed(0));
        assert!(!model.is_atom_displayed(99));
    }

    #[test]
    fn element_symbols_and_colixes_are_distinct() {
        assert_eq!(Element::from_symbol(" fe"), Element::Fe);
        assert_eq!(Element::from_symbol("Xx"), Element::Other);
        assert_ne!(Element::C.colix(), Element::N.colix());
    }
}
