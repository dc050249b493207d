//! Dot and geodesic surfaces.
//!
//! [`Dots`] keeps one compacted exposure map per atom that has dots on. The
//! geo-surface variant shares the builder, also runs face completion, and is
//! drawn as filled faces when detail allows.

pub mod convex;

use self::convex::{calc_convex_bits, compact, complete_faces, find_neighbors, point_count, DotMap};
use crate::g3d::geodesic::MAX_LEVEL;
use crate::g3d::{Colix, ColorValue};
use crate::model::MolecularModel;
use crate::options::Options;
use crate::shape::{Colorable, ShapeContext, ShapeKind, Sizable, StyleRecord};
use crate::util::BitSet;

/// Property writes accepted by [`Dots`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DotsProperty {
    /// Build maps for the selected atoms.
    On,
    /// Hide the selected atoms' dots.
    Off,
    /// Probe radius in angstroms; discards every map.
    ProbeRadius(f32),
    /// Geodesic level; discards every map.
    Level(u8),
}

impl DotsProperty {
    /// Property name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::ProbeRadius(_) => "radius",
            Self::Level(_) => "level",
        }
    }
}

/// Per-atom surface dots.
#[derive(Debug, Clone)]
pub struct Dots {
    geo: bool,
    style: StyleRecord,
    maps: Vec<Option<DotMap>>,
    dots_on: BitSet,
    colixes: Vec<Colix>,
    probe_radius: f32,
    level: usize,
    completion_passes: usize,
}

impl Dots {
    /// No dots on yet. `geo` selects the geo-surface variant.
    #[must_use]
    pub fn new(model: &MolecularModel, options: &Options, geo: bool) -> Self {
        let n = model.atom_count();
        Self {
            geo,
            style: StyleRecord::default(),
            maps: vec![None; n],
            dots_on: BitSet::new(),
            colixes: vec![Colix::INHERIT; n],
            probe_radius: options.surface.probe_radius.max(0.0),
            level: usize::from(options.surface.geodesic_level).min(MAX_LEVEL),
            completion_passes: options.surface.max_completion_passes,
        }
    }

    /// Dots or geo-surface.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        if self.geo {
            ShapeKind::GeoSurface
        } else {
            ShapeKind::Dots
        }
    }

    /// Geo-surface variant.
    #[must_use]
    pub fn is_geo(&self) -> bool {
        self.geo
    }

    /// Shape-wide style.
    #[must_use]
    pub fn style(&self) -> &StyleRecord {
        &self.style
    }

    /// Exposure map of atom `i`, if built and on.
    #[must_use]
    pub fn map(&self, i: usize) -> Option<&DotMap> {
        if !self.dots_on.get(i) {
            return None;
        }
        self.maps.get(i).and_then(Option::as_ref)
    }

    /// Atoms with dots on.
    #[must_use]
    pub fn dots_on(&self) -> &BitSet {
        &self.dots_on
    }

    /// Per-atom colors.
    #[must_use]
    pub fn colixes(&self) -> &[Colix] {
        &self.colixes
    }

    /// Probe radius; 0 gives van der Waals dots.
    #[must_use]
    pub fn probe_radius(&self) -> f32 {
        self.probe_radius
    }

    /// Geodesic level.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    /// Dots drawn over all visible maps.
    #[must_use]
    pub fn dot_count(&self) -> usize {
        self.dots_on
            .iter()
            .filter_map(|i| self.maps.get(i).and_then(Option::as_ref))
            .map(point_count)
            .sum()
    }

    /// Apply a property write.
    pub fn set_property(
        &mut self,
        property: DotsProperty,
        selection: &BitSet,
        ctx: &mut ShapeContext<'_>,
    ) {
        match property {
            DotsProperty::On => {
                self.dots_on.or_with(selection);
                self.build_missing(ctx.model);
            }
            DotsProperty::Off => {
                for i in selection.iter() {
                    self.dots_on.clear(i);
                }
            }
            DotsProperty::ProbeRadius(r) => {
                let r = r.max(0.0);
                if (r - self.probe_radius).abs() > f32::EPSILON {
                    self.probe_radius = r;
                    self.discard_and_rebuild(ctx.model);
                }
            }
            DotsProperty::Level(level) => {
                let level = usize::from(level).min(MAX_LEVEL);
                if level != self.level {
                    self.level = level;
                    self.discard_and_rebuild(ctx.model);
                }
            }
        }
    }

    fn discard_and_rebuild(&mut self, model: &MolecularModel) {
        self.maps.fill(None);
        self.build_missing(model);
    }

    fn build_missing(&mut self, model: &MolecularModel) {
        let n = model.atom_count();
        if self.maps.len() < n {
            self.maps.resize(n, None);
            self.colixes.resize(n, Colix::INHERIT);
        }
        let mut built = 0;
        for i in self.dots_on.iter() {
            if i >= n || self.maps[i].is_some() {
                continue;
            }
            self.maps[i] = Some(self.build_map(model, i));
            built += 1;
        }
        if built > 0 {
            log::debug!(
                "{}: built {built} surface maps at level {} (probe {})",
                self.kind(),
                self.level,
                self.probe_radius
            );
        }
    }

    fn build_map(&self, model: &MolecularModel, i: usize) -> DotMap {
        let atom = &model.atoms()[i];
        let neighbors = find_neighbors(model, i, self.probe_radius);
        let mut map = calc_convex_bits(
            atom.position,
            atom.vdw_radius(),
            self.probe_radius,
            &neighbors,
            self.level,
        );
        if self.geo {
            let done = complete_faces(&mut map, self.level, self.completion_passes);
            log::debug!("atom {i}: face completion took {} passes", done.passes);
            if !done.converged {
                log::warn!(
                    "atom {i}: face completion stopped at the {}-pass cap before converging",
                    self.completion_passes
                );
            }
        }
        compact(map)
    }
}

impl Sizable for Dots {
    fn set_size(&mut self, mad: i16, selection: &BitSet, ctx: &mut ShapeContext<'_>) {
        self.style.mad = mad;
        let property = if mad == 0 { DotsProperty::Off } else { DotsProperty::On };
        self.set_property(property, selection, ctx);
    }
}

impl Colorable for Dots {
    fn set_color(&mut self, color: ColorValue, selection: &BitSet, ctx: &mut ShapeContext<'_>) {
        let (colix, palette) = ctx.resolve_color(color);
        self.style.colix = colix;
        for i in selection.iter() {
            if let Some(slot) = self.colixes.get_mut(i) {
                *slot = ctx.colix_or_palette(colix, palette, i, None);
            }
        }
    }

    fn set_translucent(
        &mut self,
        translucent: bool,
        selection: &BitSet,
        _ctx: &mut ShapeContext<'_>,
    ) {
        for i in selection.iter() {
            if let Some(slot) = self.colixes.get_mut(i) {
                *slot = slot.with_translucency(translucent);
            }
        }
    }
}
