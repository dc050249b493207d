//! Shape families, their shared style record and the property protocol.
//!
//! A shape owns the derived geometry and style arrays of one family. Writes
//! arrive as a typed [`ShapeProperty`] or through the capability traits
//! ([`Sizable`], [`Colorable`], [`Clickable`]); renderers only read.

pub mod axes;
pub mod balls;
pub mod echo;
pub mod labels;
pub mod polyhedra;
pub mod sticks;

use std::fmt;

use crate::camera::Projection;
use crate::error::ShapeError;
use crate::g3d::{Colix, ColorTable, ColorValue, Font, Palette, ScreenPool};
use crate::mesh::{MeshCollection, MeshProperty};
use crate::model::{MolecularModel, PolymerKind, StructureKind};
use crate::options::Options;
use crate::polymer::{Mps, MpsFamily};
use crate::surface::{Dots, DotsProperty};
use crate::util::{BitSet, ColorRamp};

use self::axes::{Axes, AxesProperty};
use self::balls::Balls;
use self::echo::{Echo, EchoProperty};
use self::labels::{LabelProperty, Labels};
use self::polyhedra::{Polyhedra, PolyhedraProperty};
use self::sticks::Sticks;

/// Shape families in painter's order: later kinds draw over earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    /// Atom spheres.
    Balls,
    /// Bond cylinders.
    Sticks,
    /// Solvent-accessible dot surface.
    Dots,
    /// Filled geodesic surface.
    GeoSurface,
    /// Lead-atom cylinders.
    Backbone,
    /// Smooth tube through the backbone.
    Trace,
    /// Helix/sheet cartoon.
    Cartoon,
    /// Parallel hermite strands.
    Strands,
    /// Flat ribbons.
    Ribbons,
    /// Cartoon with helices as cylinders.
    Rockets,
    /// User polygon meshes.
    Mesh,
    /// Coordination polyhedra.
    Polyhedra,
    /// Coordinate axes.
    Axes,
    /// Atom labels.
    Labels,
    /// Screen-anchored text.
    Echo,
}

impl ShapeKind {
    /// Number of kinds.
    pub const COUNT: usize = 15;

    /// Every kind, in painter's order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Balls,
        Self::Sticks,
        Self::Dots,
        Self::GeoSurface,
        Self::Backbone,
        Self::Trace,
        Self::Cartoon,
        Self::Strands,
        Self::Ribbons,
        Self::Rockets,
        Self::Mesh,
        Self::Polyhedra,
        Self::Axes,
        Self::Labels,
        Self::Echo,
    ];

    /// Position in painter's order.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Balls => "balls",
            Self::Sticks => "sticks",
            Self::Dots => "dots",
            Self::GeoSurface => "geosurface",
            Self::Backbone => "backbone",
            Self::Trace => "trace",
            Self::Cartoon => "cartoon",
            Self::Strands => "strands",
            Self::Ribbons => "ribbons",
            Self::Rockets => "rockets",
            Self::Mesh => "mesh",
            Self::Polyhedra => "polyhedra",
            Self::Axes => "axes",
            Self::Labels => "labels",
            Self::Echo => "echo",
        }
    }

    /// Polymer family for the backbone-derived kinds.
    #[must_use]
    pub fn mps_family(self) -> Option<MpsFamily> {
        Some(match self {
            Self::Backbone => MpsFamily::Backbone,
            Self::Trace => MpsFamily::Trace,
            Self::Cartoon => MpsFamily::Cartoon,
            Self::Strands => MpsFamily::Strands,
            Self::Ribbons => MpsFamily::Ribbons,
            Self::Rockets => MpsFamily::Rockets,
            _ => return None,
        })
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Default style embedded by value in every shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRecord {
    /// Width in milliangstroms.
    pub mad: i16,
    /// Foreground color.
    pub colix: Colix,
    /// Text font.
    pub font: Font,
    /// Background color; INHERIT for none.
    pub bg_colix: Colix,
}

impl Default for StyleRecord {
    fn default() -> Self {
        Self {
            mad: 0,
            colix: Colix::INHERIT,
            font: Font::default(),
            bg_colix: Colix::INHERIT,
        }
    }
}

/// What a property write may read or intern.
pub struct ShapeContext<'a> {
    /// The molecule.
    pub model: &'a MolecularModel,
    /// Color table for interning explicit colors.
    pub colors: &'a mut ColorTable,
    /// Current options.
    pub options: &'a Options,
}

impl ShapeContext<'_> {
    /// Bond selection mode from the display options.
    #[must_use]
    pub fn bond_mode_or(&self) -> bool {
        self.options.display.bond_selection_mode_or
    }

    /// Split a color write into a colix and the palette it falls back to.
    /// Palette writes yield UNRECOGNIZED so each element resolves its own.
    pub fn resolve_color(&mut self, color: ColorValue) -> (Colix, Palette) {
        match color {
            ColorValue::Rgb(rgb) => (self.colors.colix(rgb), Palette::Cpk),
            ColorValue::Palette(p) => (Colix::UNRECOGNIZED, p),
            ColorValue::None => (Colix::INHERIT, Palette::Cpk),
        }
    }

    /// Explicit `colix`, or the palette color of `atom` when it is
    /// UNRECOGNIZED.
    pub fn colix_or_palette(
        &mut self,
        colix: Colix,
        palette: Palette,
        atom: usize,
        polymer: Option<PolymerKind>,
    ) -> Colix {
        if colix.is_unrecognized() {
            let c = palette_colix(self, atom, palette, polymer);
            c.with_translucency(colix.is_translucent())
        } else {
            colix
        }
    }
}

/// Palette color of one atom. `polymer` selects nucleic structure colors.
pub fn palette_colix(
    ctx: &mut ShapeContext<'_>,
    atom: usize,
    palette: Palette,
    polymer: Option<PolymerKind>,
) -> Colix {
    let Some(a) = ctx.model.atoms().get(atom) else {
        return Colix::INHERIT;
    };
    let colors = &ctx.options.colors;
    match palette {
        Palette::Cpk => a.colix,
        Palette::Structure => {
            let rgb = match (polymer, a.structure) {
                (Some(PolymerKind::Dna), _) => colors.dna,
                (Some(PolymerKind::Rna), _) => colors.rna,
                (_, StructureKind::Helix) => colors.helix,
                (_, StructureKind::Sheet) => colors.sheet,
                (_, StructureKind::Coil) => colors.turn,
            };
            ctx.colors.colix_f(rgb)
        }
        Palette::Temperature => {
            let (lo, hi) = ctx.model.bfactor_range();
            let t = if hi > lo { (a.bfactor - lo) / (hi - lo) } else { 0.5 };
            let ramp = ColorRamp::new(colors.temperature_ramp.clone());
            ctx.colors.colix(ramp.sample_rgb(t))
        }
        Palette::Chain => ctx.colors.colix_f(colors.chain_color(a.chain)),
    }
}

/// Nearest-atom hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosestAtom {
    /// Atom index.
    pub atom: usize,
    /// Squared screen distance in pixels.
    pub distance2: i32,
}

impl ClosestAtom {
    /// Keep whichever of `a` and `b` is nearer.
    #[must_use]
    pub fn nearer(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(x), Some(y)) => Some(if y.distance2 < x.distance2 { y } else { x }),
            (x, None) => x,
            (None, y) => y,
        }
    }
}

/// Shapes whose elements take a width.
pub trait Sizable {
    /// Set `mad` on the selected elements.
    fn set_size(&mut self, mad: i16, selection: &BitSet, ctx: &mut ShapeContext<'_>);
}

/// Shapes whose elements take a color.
pub trait Colorable {
    /// Set the color of the selected elements.
    fn set_color(&mut self, color: ColorValue, selection: &BitSet, ctx: &mut ShapeContext<'_>);

    /// Set or clear translucency on the selected elements.
    fn set_translucent(
        &mut self,
        translucent: bool,
        selection: &BitSet,
        ctx: &mut ShapeContext<'_>,
    );
}

/// Shapes that can be picked.
pub trait Clickable {
    /// Closest displayed atom within its drawn radius of `(x, y)`.
    fn find_nearest_atom(
        &self,
        x: i32,
        y: i32,
        model: &MolecularModel,
        projection: &dyn Projection,
    ) -> Option<ClosestAtom>;
}

/// A typed property write.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeProperty {
    /// Color of the selected elements.
    Color(ColorValue),
    /// Translucency of the selected elements.
    Translucent(bool),
    /// Mesh collection command.
    Mesh(MeshProperty),
    /// Polyhedra command.
    Polyhedra(PolyhedraProperty),
    /// Dot surface command.
    Dots(DotsProperty),
    /// Label command.
    Label(LabelProperty),
    /// Echo command.
    Echo(EchoProperty),
    /// Axes command.
    Axes(AxesProperty),
}

impl ShapeProperty {
    /// Property name used in error reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Color(_) => "color",
            Self::Translucent(_) => "translucent",
            Self::Mesh(p) => p.name(),
            Self::Polyhedra(p) => p.name(),
            Self::Dots(p) => p.name(),
            Self::Label(p) => p.name(),
            Self::Echo(p) => p.name(),
            Self::Axes(p) => p.name(),
        }
    }
}

/// One loaded shape.
#[derive(Debug)]
pub enum AnyShape {
    /// Atom spheres.
    Balls(Balls),
    /// Bonds.
    Sticks(Sticks),
    /// Dots or geo-surface.
    Dots(Dots),
    /// Any polymer family.
    Mps(Mps),
    /// Named meshes.
    Mesh(MeshCollection),
    /// Polyhedra.
    Polyhedra(Polyhedra),
    /// Axes.
    Axes(Axes),
    /// Labels.
    Labels(Labels),
    /// Echo texts.
    Echo(Echo),
}

impl AnyShape {
    /// Fresh shape of `kind` sized for `model`.
    #[must_use]
    pub fn new(kind: ShapeKind, model: &MolecularModel, options: &Options) -> Self {
        if let Some(family) = kind.mps_family() {
            return Self::Mps(Mps::new(family, model));
        }
        match kind {
            ShapeKind::Balls => Self::Balls(Balls::new(model)),
            ShapeKind::Sticks => Self::Sticks(Sticks::new(model)),
            ShapeKind::Dots => Self::Dots(Dots::new(model, options, false)),
            ShapeKind::GeoSurface => Self::Dots(Dots::new(model, options, true)),
            ShapeKind::Polyhedra => Self::Polyhedra(Polyhedra::new()),
            ShapeKind::Axes => Self::Axes(Axes::new()),
            ShapeKind::Labels => Self::Labels(Labels::new(model)),
            ShapeKind::Echo => Self::Echo(Echo::new()),
            _ => Self::Mesh(MeshCollection::new("mesh", Colix::GOLD)),
        }
    }

    /// Kind this shape was created for.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Balls(_) => ShapeKind::Balls,
            Self::Sticks(_) => ShapeKind::Sticks,
            Self::Dots(d) => d.kind(),
            Self::Mps(m) => m.family().kind(),
            Self::Mesh(_) => ShapeKind::Mesh,
            Self::Polyhedra(_) => ShapeKind::Polyhedra,
            Self::Axes(_) => ShapeKind::Axes,
            Self::Labels(_) => ShapeKind::Labels,
            Self::Echo(_) => ShapeKind::Echo,
        }
    }

    fn sizable(&mut self) -> Option<&mut dyn Sizable> {
        let shape: &mut dyn Sizable = match self {
            Self::Balls(s) => s,
            Self::Sticks(s) => s,
            Self::Dots(s) => s,
            Self::Mps(s) => s,
            Self::Axes(s) => s,
            _ => return None,
        };
        Some(shape)
    }

    fn colorable(&mut self) -> Option<&mut dyn Colorable> {
        let shape: &mut dyn Colorable = match self {
            Self::Balls(s) => s,
            Self::Sticks(s) => s,
            Self::Dots(s) => s,
            Self::Mps(s) => s,
            Self::Labels(s) => s,
            Self::Polyhedra(s) => s,
            Self::Axes(s) => s,
            _ => return None,
        };
        Some(shape)
    }

    /// Set the width of the selected elements.
    pub fn set_size(
        &mut self,
        mad: i16,
        selection: &BitSet,
        ctx: &mut ShapeContext<'_>,
    ) -> Result<(), ShapeError> {
        let kind = self.kind();
        let shape = self.sizable().ok_or(ShapeError::UnsupportedProperty {
            kind,
            property: "size",
        })?;
        shape.set_size(mad, selection, ctx);
        Ok(())
    }

    /// Apply a typed property write.
    pub fn set_property(
        &mut self,
        property: ShapeProperty,
        selection: &BitSet,
        ctx: &mut ShapeContext<'_>,
    ) -> Result<(), ShapeError> {
        let kind = self.kind();
        let unsupported = ShapeError::UnsupportedProperty {
            kind,
            property: property.name(),
        };
        match (self, property) {
            (Self::Mesh(m), ShapeProperty::Color(c)) => {
                let (colix, _) = ctx.resolve_color(c);
                m.set_colix(if colix.is_unrecognized() { Colix::GOLD } else { colix });
                Ok(())
            }
            (Self::Mesh(m), ShapeProperty::Translucent(t)) => {
                m.set_translucent(t);
                Ok(())
            }
            (Self::Echo(e), ShapeProperty::Color(c)) => {
                let (colix, _) = ctx.resolve_color(c);
                e.set_colix(colix);
                Ok(())
            }
            (shape, ShapeProperty::Color(c)) => {
                let target = shape.colorable().ok_or(unsupported)?;
                target.set_color(c, selection, ctx);
                Ok(())
            }
            (shape, ShapeProperty::Translucent(t)) => {
                let target = shape.colorable().ok_or(unsupported)?;
                target.set_translucent(t, selection, ctx);
                Ok(())
            }
            (Self::Mesh(m), ShapeProperty::Mesh(p)) => m.set_property(p),
            (Self::Polyhedra(s), ShapeProperty::Polyhedra(p)) => s.set_property(p, selection, ctx),
            (Self::Dots(s), ShapeProperty::Dots(p)) => {
                s.set_property(p, selection, ctx);
                Ok(())
            }
            (Self::Labels(s), ShapeProperty::Label(p)) => {
                s.set_property(p, selection, ctx);
                Ok(())
            }
            (Self::Echo(s), ShapeProperty::Echo(p)) => {
                s.set_property(p, ctx);
                Ok(())
            }
            (Self::Axes(s), ShapeProperty::Axes(p)) => {
                s.set_property(p);
                Ok(())
            }
            _ => Err(unsupported),
        }
    }

    /// Build projection-dependent derived geometry before a render pass.
    pub fn prepare(
        &mut self,
        model: &MolecularModel,
        options: &Options,
        projection: &dyn Projection,
        pool: &ScreenPool,
    ) {
        if let Self::Mps(m) = self {
            m.prepare(model, options, projection, pool);
        }
    }

    /// Nearest displayed atom under `(x, y)`, for pickable shapes.
    #[must_use]
    pub fn find_nearest_atom(
        &self,
        x: i32,
        y: i32,
        model: &MolecularModel,
        projection: &dyn Projection,
    ) -> Option<ClosestAtom> {
        let shape: &dyn Clickable = match self {
            Self::Balls(s) => s,
            Self::Sticks(s) => s,
            Self::Mps(s) => s,
            _ => return None,
        };
        shape.find_nearest_atom(x, y, model, projection)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::model::ideal_helix;

    #[test]
    fn painter_order_matches_indices() {
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert!(ShapeKind::Balls < ShapeKind::Echo);
        assert_eq!(ShapeKind::Rockets.mps_family(), Some(MpsFamily::Rockets));
        assert_eq!(ShapeKind::Mesh.mps_family(), None);
    }

    #[test]
    fn palette_fallbacks() {
        let model = MolecularModel::from_ca_trace('B', &ideal_helix(6, Vec3::ZERO)).unwrap();
        let options = Options::default();
        let mut colors = ColorTable::new();
        let mut ctx = ShapeContext {
            model: &model,
            colors: &mut colors,
            options: &options,
        };
        assert_eq!(palette_colix(&mut ctx, 0, Palette::Cpk, None), model.atoms()[0].colix);
        let helix = palette_colix(&mut ctx, 0, Palette::Structure, None);
        let dna = palette_colix(&mut ctx, 0, Palette::Structure, Some(PolymerKind::Dna));
        assert_ne!(helix, dna);
        let cold = palette_colix(&mut ctx, 0, Palette::Temperature, None);
        let hot = palette_colix(&mut ctx, 5, Palette::Temperature, None);
        assert_ne!(cold, hot);
        assert_eq!(palette_colix(&mut ctx, 99, Palette::Chain, None), Colix::INHERIT);
        let c = ctx.colix_or_palette(Colix::UNRECOGNIZED, Palette::Chain, 1, None);
        assert!(!c.is_unrecognized());
        assert_eq!(ctx.colix_or_palette(Colix::RED, Palette::Chain, 1, None), Colix::RED);
    }

    #[test]
    fn mismatched_property_is_rejected() {
        let model = MolecularModel::default();
        let options = Options::default();
        let mut colors = ColorTable::new();
        let mut ctx = ShapeContext {
            model: &model,
            colors: &mut colors,
            options: &options,
        };
        let mut shape = AnyShape::new(ShapeKind::Echo, &model, &options);
        let err = shape
            .set_property(ShapeProperty::Mesh(MeshProperty::Delete), &BitSet::new(), &mut ctx)
            .unwrap_err();
        assert!(matches!(
            err,
            ShapeError::UnsupportedProperty { kind: ShapeKind::Echo, .. }
        ));
        assert!(shape.set_size(100, &BitSet::new(), &mut ctx).is_err());
    }

    #[test]
    fn closest_keeps_the_nearer_hit() {
        let a = Some(ClosestAtom { atom: 1, distance2: 9 });
        let b = Some(ClosestAtom { atom: 2, distance2: 4 });
        assert_eq!(ClosestAtom::nearer(a, b).map(|c| c.atom), Some(2));
        assert_eq!(ClosestAtom::nearer(a, None).map(|c| c.atom), Some(1));
    }
}
