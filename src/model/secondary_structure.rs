//! Secondary structure detection using Cα geometry
//!
//! Detects alpha helices and beta sheets based on Cα-Cα distances
//! and assigns per-residue classifications.

use glam::Vec3;

/// Secondary structure type for a residue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StructureKind {
    /// Alpha helix.
    Helix,
    /// Beta strand.
    Sheet,
    /// Turn or random coil.
    #[default]
    Coil,
}

impl StructureKind {
    /// Helix or sheet.
    #[must_use]
    pub fn is_helix_or_sheet(self) -> bool {
        matches!(self, Self::Helix | Self::Sheet)
    }
}

const MIN_HELIX_RUN: usize = 4;
const MIN_SHEET_RUN: usize = 3;

/// Detect secondary structure from Cα positions
///
/// Uses distance-based heuristics:
/// - Helix: Cα(i)-Cα(i+3) ≈ 5.0-5.5Å, Cα(i)-Cα(i+4) ≈ 5.5-6.5Å
/// - Sheet: Extended conformation with Cα(i)-Cα(i+2) ≈ 6.0-7.5Å
///
/// Returns one kind per residue (same length as `ca_positions`).
#[must_use]
pub fn detect_secondary_structure(ca_positions: &[Vec3]) -> Vec<StructureKind> {
    let n = ca_positions.len();
    if n < 4 {
        return vec![StructureKind::Coil; n];
    }
    let dist = |i: usize, j: usize| (ca_positions[i] - ca_positions[j]).length();

    let raw: Vec<StructureKind> = (0..n)
        .map(|i| {
            if i + 4 < n
                && (4.5..=6.0).contains(&dist(i, i + 3))
                && (5.0..=7.0).contains(&dist(i, i + 4))
            {
                StructureKind::Helix
            } else if i + 2 < n
                && (3.5..=4.1).contains(&dist(i, i + 1))
                && (6.0..=8.0).contains(&dist(i, i + 2))
            {
                StructureKind::Sheet
            } else {
                StructureKind::Coil
            }
        })
        .collect();

    let mut smoothed = vec![StructureKind::Coil; n];
    // helix runs extend three residues to cover the final turn
    for (start, end) in runs(&raw, StructureKind::Helix) {
        if end - start >= MIN_HELIX_RUN {
            let stop = (end + 3).min(n);
            smoothed[start..stop].fill(StructureKind::Helix);
        }
    }
    for (start, end) in runs(&raw, StructureKind::Sheet) {
        if end - start < MIN_SHEET_RUN {
            continue;
        }
        for kind in &mut smoothed[start..end] {
            if *kind != StructureKind::Helix {
                *kind = StructureKind::Sheet;
            }
        }
    }
    smoothed
}

/// Half-open index ranges of consecutive `kind` entries.
fn runs(kinds: &[StructureKind], kind: StructureKind) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < kinds.len() {
        if kinds[i] == kind {
            let start = i;
            while i < kinds.len() && kinds[i] == kind {
                i += 1;
            }
            out.push((start, i));
        } else {
            i += 1;
        }
    }
    out
}

/// Ideal alpha-helix Cα trace: 1.5 Å rise, 100° per residue, 2.3 Å radius.
#[must_use]
pub fn ideal_helix(n: usize, origin: Vec3) -> Vec<Vec3> {
    (0..n)
        .map(|i| {
            let a = (i as f32 * 100.0).to_radians();
            origin + Vec3::new(2.3 * a.cos(), 2.3 * a.sin(), 1.5 * i as f32)
        })
        .collect()
}

/// Ideal extended strand: 3.8 Å steps zig-zagging ±0.9 Å.
#[must_use]
pub fn ideal_strand(n: usize, origin: Vec3, direction: Vec3) -> Vec<Vec3> {
    let dir = direction.normalize_or(Vec3::X);
    let side = dir.any_orthonormal_vector();
    (0..n)
        .map(|i| {
            let zig = if i % 2 == 0 { 0.9 } else { -0.9 };
            origin + dir * (3.3 * i as f32) + side * zig
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chain() {
        let result = detect_secondary_structure(&[]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_short_chain() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)];
        let result = detect_secondary_structure(&positions);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|&s| s == StructureKind::Coil));
    }

    #[test]
    fn test_ideal_helix_is_detected() {
        let ca = ideal_helix(12, Vec3::ZERO);
        let ss = detect_secondary_structure(&ca);
        assert_eq!(ss.len(), 12);
        assert!(ss[..8].iter().all(|&s| s == StructureKind::Helix), "{ss:?}");
    }

    #[test]
    fn test_extended_strand_is_sheet() {
        let ca = ideal_strand(8, Vec3::ZERO, Vec3::X);
        let ss = detect_secondary_structure(&ca);
        assert!(ss[..6].iter().all(|&s| s == StructureKind::Sheet), "{ss:?}");
    }
}
