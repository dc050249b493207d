//! Coordinate axes.

use glam::Vec3;

use super::{Colorable, ShapeContext, Sizable, StyleRecord};
use crate::g3d::{Colix, ColorValue, Font};
use crate::util::BitSet;

/// Default axis length in angstroms.
pub const DEFAULT_AXIS_SCALE: f32 = 2.0;

/// Property writes accepted by [`Axes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxesProperty {
    /// Axis length in angstroms.
    Scale(f32),
    /// Where the axes meet.
    Origin(Vec3),
    /// Tip label font.
    Font(Font),
    /// Draw the "X", "Y", "Z" tip labels.
    Labels(bool),
}

impl AxesProperty {
    /// Property name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scale(_) => "scale",
            Self::Origin(_) => "origin",
            Self::Font(_) => "font",
            Self::Labels(_) => "labels",
        }
    }
}

/// Three axes from a common origin. Off while `mad` is 0.
#[derive(Debug, Clone)]
pub struct Axes {
    style: StyleRecord,
    scale: f32,
    origin: Vec3,
    labels: bool,
}

impl Axes {
    /// Off, 2 Å long, at the world origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            style: StyleRecord {
                colix: Colix::GRAY,
                ..StyleRecord::default()
            },
            scale: DEFAULT_AXIS_SCALE,
            origin: Vec3::ZERO,
            labels: true,
        }
    }

    /// Shape-wide style; `mad` is the axis width.
    #[must_use]
    pub fn style(&self) -> &StyleRecord {
        &self.style
    }

    /// Whether any axis is drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.style.mad != 0
    }

    /// Origin and the three tip points.
    #[must_use]
    pub fn points(&self) -> (Vec3, [Vec3; 3]) {
        let o = self.origin;
        (o, [Vec3::X, Vec3::Y, Vec3::Z].map(|d| o + d * self.scale))
    }

    /// Whether the tip labels are drawn.
    #[must_use]
    pub fn labels(&self) -> bool {
        self.labels
    }

    /// Apply a property write.
    pub fn set_property(&mut self, property: AxesProperty) {
        match property {
            AxesProperty::Scale(s) => self.scale = s.max(0.0),
            AxesProperty::Origin(o) => self.origin = o,
            AxesProperty::Font(f) => self.style.font = f,
            AxesProperty::Labels(on) => self.labels = on,
        }
    }
}

impl Default for Axes {
    fn default() -> Self {
        Self::new()
    }
}

impl Sizable for Axes {
    fn set_size(&mut self, mad: i16, _selection: &BitSet, _ctx: &mut ShapeContext<'_>) {
        self.style.mad = mad;
    }
}

impl Colorable for Axes {
    fn set_color(&mut self, color: ColorValue, _selection: &BitSet, ctx: &mut ShapeContext<'_>) {
        let (colix, _) = ctx.resolve_color(color);
        self.style.colix = if colix.is_unrecognized() || colix.is_inherit() {
            Colix::GRAY
        } else {
            colix
        };
    }

    fn set_translucent(
        &mut self,
        translucent: bool,
        _selection: &BitSet,
        _ctx: &mut ShapeContext<'_>,
    ) {
        self.style.colix = self.style.colix.with_translucency(translucent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tips_follow_scale_and_origin() {
        let mut axes = Axes::new();
        assert!(!axes.is_visible());
        axes.set_property(AxesProperty::Origin(Vec3::new(1.0, 1.0, 1.0)));
        axes.set_property(AxesProperty::Scale(3.0));
        let (o, tips) = axes.points();
        assert_eq!(o, Vec3::ONE);
        assert!((tips[0] - Vec3::new(4.0, 1.0, 1.0)).length() < 1e-6);
        assert!((tips[2] - Vec3::new(1.0, 1.0, 4.0)).length() < 1e-6);
        axes.set_property(AxesProperty::Scale(-1.0));
        assert_eq!(axes.points().1[1], Vec3::ONE);
    }
}
