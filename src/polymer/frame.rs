//! Per-frame view of one styled polymer: projected control points, segment
//! visibility and the width rules shared by every polymer renderer.

use glam::Vec3;

use super::mesh_cylinder::{SegmentMads, SegmentSource};
use super::MpsPolymer;
use crate::camera::Projection;
use crate::g3d::{Colix, PoolGuard, ScreenPoint, ScreenPool};
use crate::model::{MolecularModel, Polymer, StructureKind};
use crate::options::GeometryOptions;
use crate::util::BitSet;

/// Below this diameter (pixels) meshes are never used.
pub const ABSOLUTE_MIN_MESH_SIZE: i32 = 3;
/// At or above this diameter (pixels) meshes are always used.
pub const MIN_MESH_RENDER_SIZE: i32 = 8;

/// Projection-dependent state of one polymer for one frame.
///
/// Screen buffers are borrowed from the pool and go back when the frame
/// drops.
pub struct PolymerFrame<'a> {
    model: &'a MolecularModel,
    polymer: &'a Polymer,
    style: &'a MpsPolymer,
    control_points: Vec<Vec3>,
    control_screens: PoolGuard<'a, ScreenPoint>,
    lead_screens: PoolGuard<'a, ScreenPoint>,
    visible: BitSet,
    is_special: Vec<bool>,
    is_helix: Vec<bool>,
    tension: i32,
    trace_alpha: bool,
    high_res: bool,
    aspect_ratio: f32,
    hermite_level: usize,
}

impl<'a> PolymerFrame<'a> {
    /// Project `style`'s polymer. `None` for chains shorter than two residues
    /// or style arrays that no longer match the model.
    pub fn new(
        model: &'a MolecularModel,
        style: &'a MpsPolymer,
        geometry: &GeometryOptions,
        projection: &dyn Projection,
        pool: &'a ScreenPool,
    ) -> Option<Self> {
        let polymer = model.polymers().get(style.polymer_index())?;
        let n = polymer.len();
        if n < 2 || style.len() != n {
            return None;
        }
        let trace_alpha = geometry.trace_alpha;
        let control_points =
            polymer.control_points(trace_alpha, geometry.sheet_smoothing);
        let mut control_screens = pool.acquire(n + 1);
        for (s, &p) in control_screens.iter_mut().zip(&control_points) {
            *s = projection.transform_point(p);
        }
        let mut lead_screens = pool.acquire(n);
        for (s, &p) in lead_screens.iter_mut().zip(polymer.lead_points()) {
            *s = projection.transform_point(p);
        }

        let monomers = polymer.monomers();
        let mut is_special: Vec<bool> = monomers
            .iter()
            .map(|m| m.structure.is_helix_or_sheet())
            .collect();
        is_special.push(is_special[n - 1]);
        let mut is_helix: Vec<bool> = monomers
            .iter()
            .map(|m| m.structure == StructureKind::Helix)
            .collect();
        is_helix.push(is_helix[n - 1]);

        let mut visible = BitSet::new();
        for (i, m) in monomers.iter().enumerate() {
            let s = lead_screens[i];
            if style.mads()[i] != 0
                && model.is_atom_displayed(m.lead_atom)
                && projection.is_in_display_range(s.x, s.y)
            {
                visible.set(i);
            }
        }

        Some(Self {
            model,
            polymer,
            style,
            control_points,
            control_screens,
            lead_screens,
            visible,
            is_special,
            is_helix,
            tension: if polymer.kind().is_nucleic() { 4 } else { 7 },
            trace_alpha,
            high_res: geometry.high_resolution,
            aspect_ratio: geometry.effective_aspect_ratio(),
            hermite_level: geometry.clamped_hermite_level(),
        })
    }

    /// Monomer count `n`.
    #[must_use]
    pub fn count(&self) -> usize {
        self.polymer.len()
    }

    /// The polymer being drawn.
    #[must_use]
    pub fn polymer(&self) -> &'a Polymer {
        self.polymer
    }

    /// Its style arrays.
    #[must_use]
    pub fn style(&self) -> &'a MpsPolymer {
        self.style
    }

    /// Control points, length `n + 1`.
    #[must_use]
    pub fn control_points(&self) -> &[Vec3] {
        &self.control_points
    }

    /// Projected control points, length `n + 1`.
    #[must_use]
    pub fn control_screens(&self) -> &[ScreenPoint] {
        &self.control_screens
    }

    /// Projected lead atoms, length `n`.
    #[must_use]
    pub fn lead_screens(&self) -> &[ScreenPoint] {
        &self.lead_screens
    }

    /// Segments drawn this frame.
    #[must_use]
    pub fn visible(&self) -> &BitSet {
        &self.visible
    }

    /// Helix or sheet at `i`; index `n` repeats `n - 1`.
    #[must_use]
    pub fn is_special(&self, i: usize) -> bool {
        self.is_special[i.min(self.count())]
    }

    /// Helix at `i`; index `n` repeats `n - 1`.
    #[must_use]
    pub fn is_helix(&self, i: usize) -> bool {
        self.is_helix[i.min(self.count())]
    }

    /// Secondary structure of residue `i`.
    #[must_use]
    pub fn structure(&self, i: usize) -> StructureKind {
        self.polymer.monomers()[i].structure
    }

    /// Hermite tension: 4 for nucleic acids, 7 otherwise.
    #[must_use]
    pub fn tension(&self) -> i32 {
        self.tension
    }

    /// Effective ribbon aspect ratio; 0 disables meshes.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// `max(i - 1, 0)`.
    #[must_use]
    pub fn prev(&self, i: usize) -> usize {
        i.saturating_sub(1)
    }

    /// `min(i + k, n)`.
    #[must_use]
    pub fn next(&self, i: usize, k: usize) -> usize {
        (i + k).min(self.count())
    }

    /// Width of segment `i`.
    #[must_use]
    pub fn mad(&self, i: usize) -> i32 {
        i32::from(self.style.mads()[i.min(self.count())])
    }

    /// Color of residue `i`, inheriting from its lead atom.
    #[must_use]
    pub fn lead_colix(&self, i: usize) -> Colix {
        self.style.lead_colix(i, self.polymer, self.model)
    }

    /// Start, middle and end widths of segment `i`. Special segments blend
    /// toward non-special neighbours.
    #[must_use]
    pub fn segment_mads(&self, i: usize, special: bool) -> SegmentMads {
        let mad = self.mad(i);
        let mut m = SegmentMads {
            beg: mad,
            mid: mad,
            end: mad,
        };
        if !special {
            return m;
        }
        let prev = self.prev(i);
        let next = self.next(i, 1);
        if self.trace_alpha {
            if !self.is_special(next) {
                m.end = self.mad(next);
                m.mid = (m.beg + m.end) / 2;
            }
        } else {
            if !self.is_special(prev) {
                m.beg = (self.mad(prev) + m.mid) / 2;
            }
            if !self.is_special(next) {
                m.end = (self.mad(next) + m.mid) / 2;
            }
        }
        m
    }

    /// Pixel diameters `[beg, mid, end]` of segment `i`.
    #[must_use]
    pub fn diameters(&self, projection: &dyn Projection, i: usize, mads: SegmentMads) -> [i32; 3] {
        let next = self.next(i, 1);
        [
            projection.scale_to_screen(self.control_screens[i].z, mads.beg),
            projection.scale_to_screen(self.lead_screens[i].z, mads.mid),
            projection.scale_to_screen(self.control_screens[next].z, mads.end),
        ]
    }

    /// Whether a segment this wide on screen is drawn as a mesh.
    #[must_use]
    pub fn wants_mesh(&self, diameter_mid: i32) -> bool {
        self.aspect_ratio > 0.0
            && (self.high_res && diameter_mid > ABSOLUTE_MIN_MESH_SIZE
                || diameter_mid >= MIN_MESH_RENDER_SIZE)
    }

    /// Control points pushed along the wing by `offset` half-widths, then
    /// projected.
    #[must_use]
    pub fn offset_screens(
        &self,
        projection: &dyn Projection,
        pool: &'a ScreenPool,
        offset: f32,
    ) -> PoolGuard<'a, ScreenPoint> {
        let mut screens = pool.acquire(self.count() + 1);
        for (i, s) in screens.iter_mut().enumerate() {
            *s = self.offset_screen(projection, i, offset);
        }
        screens
    }

    /// One control point pushed along its wing, projected.
    #[must_use]
    pub fn offset_screen(&self, projection: &dyn Projection, i: usize, offset: f32) -> ScreenPoint {
        let wing = self.polymer.wing_vectors()[i];
        let scale = self.mad(i) as f32 * offset / 1000.0;
        projection.transform_point(self.control_points[i] + wing * scale)
    }

    /// Geometry for building segment meshes.
    #[must_use]
    pub fn segment_source(&self) -> SegmentSource<'_> {
        SegmentSource {
            control_points: &self.control_points,
            wing_vectors: Some(self.polymer.wing_vectors()),
            tension: self.tension as f32,
            hermite_level: self.hermite_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, Viewport};
    use crate::model::{ideal_helix, ideal_strand};
    use crate::options::CameraOptions;
    use crate::polymer::MpsFamily;

    fn setup() -> (MolecularModel, Viewport) {
        let mut points = ideal_helix(8, Vec3::ZERO);
        let start = points[7] + Vec3::new(3.8, 0.0, 0.0);
        points.extend(ideal_strand(6, start, Vec3::X));
        let model = MolecularModel::from_ca_trace('A', &points).unwrap();
        let (center, radius) = model.bounds();
        let camera = Camera::framing(center, radius, 1.0, &CameraOptions::default());
        (model, Viewport::new(camera, 400, 400))
    }

    fn styled(model: &MolecularModel, mad: i16) -> MpsPolymer {
        let mut style = MpsPolymer::new(0, model.polymers()[0].len());
        style.set_mad(
            mad,
            &model.all_atoms(),
            false,
            &model.polymers()[0],
            model,
            MpsFamily::Trace.defaults(),
        );
        style
    }

    #[test]
    fn frame_returns_screens_to_the_pool() {
        let (model, viewport) = setup();
        let style = styled(&model, 500);
        let pool = ScreenPool::new();
        {
            let frame = PolymerFrame::new(&model, &style, &GeometryOptions::default(), &viewport, &pool)
                .unwrap();
            let _top = frame.offset_screens(&viewport, &pool, 0.5);
            assert_eq!(pool.outstanding(), 3);
            assert_eq!(frame.control_screens().len(), frame.count() + 1);
        }
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn last_residue_is_not_visible() {
        let (model, viewport) = setup();
        let style = styled(&model, 500);
        let pool = ScreenPool::new();
        let frame = PolymerFrame::new(&model, &style, &GeometryOptions::default(), &viewport, &pool)
            .unwrap();
        let n = frame.count();
        assert_eq!(frame.visible().cardinality(), n - 1);
        assert!(!frame.visible().get(n - 1));
    }

    #[test]
    fn special_segments_blend_into_coil() {
        let (model, viewport) = setup();
        let mut style = styled(&model, 1000);
        let sel: BitSet = (0..8).collect();
        style.set_mad(2000, &sel, false, &model.polymers()[0], &model, MpsFamily::Trace.defaults());
        let pool = ScreenPool::new();
        let geometry = GeometryOptions {
            trace_alpha: false,
            ..GeometryOptions::default()
        };
        let frame = PolymerFrame::new(&model, &style, &geometry, &viewport, &pool).unwrap();
        let flat = frame.segment_mads(3, false);
        assert_eq!((flat.beg, flat.mid, flat.end), (2000, 2000, 2000));
        // residue 7 is the last helix residue; its successor is not special
        if frame.is_special(7) && !frame.is_special(8) {
            let m = frame.segment_mads(7, true);
            assert_eq!(m.end, (frame.mad(8) + frame.mad(7)) / 2);
        }
    }

    #[test]
    fn mesh_threshold() {
        let (model, viewport) = setup();
        let style = styled(&model, 500);
        let pool = ScreenPool::new();
        let mut geometry = GeometryOptions {
            hermite_level: 2,
            ..GeometryOptions::default()
        };
        let frame = PolymerFrame::new(&model, &style, &geometry, &viewport, &pool).unwrap();
        assert!(!frame.wants_mesh(4));
        assert!(frame.wants_mesh(8));
        drop(frame);
        geometry.high_resolution = true;
        let frame = PolymerFrame::new(&model, &style, &geometry, &viewport, &pool).unwrap();
        assert!(frame.wants_mesh(4));
        assert!(!frame.wants_mesh(3));
    }
}
