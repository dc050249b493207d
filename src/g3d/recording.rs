//! A [`Graphics3D`] backend that records every call.
//!
//! Used by tests to assert on draw-call counts and by the demo binary to
//! summarize a frame without a real rasterizer.

use std::collections::BTreeMap;

use super::{
    Colix, Endcaps, Font, Graphics3D, HermiteRibbon, Normix, ScreenPoint,
    Shading,
};

/// Primitive family of a recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DrawKind {
    /// `fill_triangle`
    Triangle,
    /// `fill_quadrilateral`
    Quadrilateral,
    /// `draw_line`
    Line,
    /// `draw_dotted_line`
    DottedLine,
    /// `fill_cylinder`
    Cylinder,
    /// `fill_cone`
    Cone,
    /// `draw_circle`
    Circle,
    /// `fill_sphere`
    Sphere,
    /// `draw_pixel`
    Pixel,
    /// `draw_string`
    Text,
    /// `draw_hermite`
    Hermite,
    /// `fill_hermite`
    HermiteTube,
    /// `draw_hermite_ribbon`
    HermiteRibbon,
}

/// One recorded primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// Filled triangle.
    Triangle {
        /// Color.
        colix: Colix,
        /// Corners.
        points: [ScreenPoint; 3],
        /// Shading.
        shading: Shading,
    },
    /// Filled quadrilateral.
    Quadrilateral {
        /// Color.
        colix: Colix,
        /// Corners.
        points: [ScreenPoint; 4],
    },
    /// Line.
    Line {
        /// Endpoint colors.
        colixes: [Colix; 2],
        /// Endpoints.
        points: [ScreenPoint; 2],
    },
    /// Dotted line.
    DottedLine {
        /// Color.
        colix: Colix,
        /// Endpoints.
        points: [ScreenPoint; 2],
    },
    /// Cylinder.
    Cylinder {
        /// Endpoint colors.
        colixes: [Colix; 2],
        /// Caps.
        endcaps: Endcaps,
        /// Pixel diameter.
        diameter: i32,
        /// Endpoints.
        points: [ScreenPoint; 2],
    },
    /// Cone.
    Cone {
        /// Color.
        colix: Colix,
        /// Pixel diameter.
        diameter: i32,
        /// Base and tip.
        points: [ScreenPoint; 2],
    },
    /// Circle outline.
    Circle {
        /// Color.
        colix: Colix,
        /// Pixel diameter.
        diameter: i32,
        /// Center.
        center: ScreenPoint,
    },
    /// Sphere.
    Sphere {
        /// Color.
        colix: Colix,
        /// Pixel diameter.
        diameter: i32,
        /// Center.
        center: ScreenPoint,
    },
    /// Pixel.
    Pixel {
        /// Color.
        colix: Colix,
        /// Location.
        at: ScreenPoint,
    },
    /// Text.
    Text {
        /// Color.
        colix: Colix,
        /// Background color.
        bg_colix: Colix,
        /// The string.
        text: String,
        /// Baseline-left corner.
        at: ScreenPoint,
    },
    /// Hermite curve.
    Hermite {
        /// Color.
        colix: Colix,
        /// Control points.
        points: [ScreenPoint; 4],
    },
    /// Hermite tube.
    HermiteTube {
        /// Color.
        colix: Colix,
        /// Diameters at start, middle and end.
        diameters: [i32; 3],
        /// Control points.
        points: [ScreenPoint; 4],
    },
    /// Hermite ribbon.
    HermiteRibbon {
        /// Color.
        colix: Colix,
        /// Patch.
        ribbon: HermiteRibbon,
    },
}

impl DrawCall {
    /// Primitive family.
    #[must_use]
    pub fn kind(&self) -> DrawKind {
        match self {
            Self::Triangle { .. } => DrawKind::Triangle,
            Self::Quadrilateral { .. } => DrawKind::Quadrilateral,
            Self::Line { .. } => DrawKind::Line,
            Self::DottedLine { .. } => DrawKind::DottedLine,
            Self::Cylinder { .. } => DrawKind::Cylinder,
            Self::Cone { .. } => DrawKind::Cone,
            Self::Circle { .. } => DrawKind::Circle,
            Self::Sphere { .. } => DrawKind::Sphere,
            Self::Pixel { .. } => DrawKind::Pixel,
            Self::Text { .. } => DrawKind::Text,
            Self::Hermite { .. } => DrawKind::Hermite,
            Self::HermiteTube { .. } => DrawKind::HermiteTube,
            Self::HermiteRibbon { .. } => DrawKind::HermiteRibbon,
        }
    }
}

/// Records calls against a fixed-size canvas.
#[derive(Debug, Clone)]
pub struct RecordingGraphics {
    width: i32,
    height: i32,
    /// Everything drawn so far, in order.
    pub calls: Vec<DrawCall>,
}

impl RecordingGraphics {
    /// A canvas of the given size.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    /// Calls of one kind.
    #[must_use]
    pub fn count(&self, kind: DrawKind) -> usize {
        self.calls.iter().filter(|c| c.kind() == kind).count()
    }

    /// Per-kind call counts.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<DrawKind, usize> {
        let mut map = BTreeMap::new();
        for call in &self.calls {
            *map.entry(call.kind()).or_insert(0) += 1;
        }
        map
    }

    /// Forget recorded calls.
    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl Default for RecordingGraphics {
    fn default() -> Self {
        Self::new(500, 500)
    }
}

impl Graphics3D for RecordingGraphics {
    fn display_size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn fill_triangle(
        &mut self,
        colix: Colix,
        points: [ScreenPoint; 3],
        shading: Shading,
    ) {
        self.calls.push(DrawCall::Triangle {
            colix,
            points,
            shading,
        });
    }

    fn fill_quadrilateral(
        &mut self,
        colix: Colix,
        points: [ScreenPoint; 4],
        _normixes: Option<[Normix; 4]>,
    ) {
        self.calls.push(DrawCall::Quadrilateral { colix, points });
    }

    fn draw_line(
        &mut self,
        colix_a: Colix,
        colix_b: Colix,
        a: ScreenPoint,
        b: ScreenPoint,
    ) {
        self.calls.push(DrawCall::Line {
            colixes: [colix_a, colix_b],
            points: [a, b],
        });
    }

    fn draw_dotted_line(&mut self, colix: Colix, a: ScreenPoint, b: ScreenPoint) {
        self.calls.push(DrawCall::DottedLine {
            colix,
            points: [a, b],
        });
    }

    fn fill_cylinder(
        &mut self,
        colixes: [Colix; 2],
        endcaps: Endcaps,
        diameter: i32,
        a: ScreenPoint,
        b: ScreenPoint,
    ) {
        self.calls.push(DrawCall::Cylinder {
            colixes,
            endcaps,
            diameter,
            points: [a, b],
        });
    }

    fn fill_cone(
        &mut self,
        colix: Colix,
        _endcaps: Endcaps,
        diameter: i32,
        base: ScreenPoint,
        tip: ScreenPoint,
    ) {
        self.calls.push(DrawCall::Cone {
            colix,
            diameter,
            points: [base, tip],
        });
    }

    fn draw_circle(&mut self, colix: Colix, diameter: i32, center: ScreenPoint) {
        self.calls.push(DrawCall::Circle {
            colix,
            diameter,
            center,
        });
    }

    fn fill_sphere(&mut self, colix: Colix, diameter: i32, center: ScreenPoint) {
        self.calls.push(DrawCall::Sphere {
            colix,
            diameter,
            center,
        });
    }

    fn draw_pixel(&mut self, colix: Colix, at: ScreenPoint) {
        self.calls.push(DrawCall::Pixel { colix, at });
    }

    fn draw_string(
        &mut self,
        colix: Colix,
        bg_colix: Colix,
        _font: &Font,
        text: &str,
        at: ScreenPoint,
    ) {
        self.calls.push(DrawCall::Text {
            colix,
            bg_colix,
            text: text.to_owned(),
            at,
        });
    }

    fn string_width(&self, font: &Font, text: &str) -> i32 {
        // monospace approximation: 0.6 em per glyph
        (text.chars().count() as f32 * f32::from(font.size) * 0.6).round()
            as i32
    }

    fn font_ascent(&self, font: &Font) -> i32 {
        i32::from(font.size) * 3 / 4
    }

    fn draw_hermite(&mut self, colix: Colix, _tension: i32, points: [ScreenPoint; 4]) {
        self.calls.push(DrawCall::Hermite { colix, points });
    }

    fn fill_hermite(
        &mut self,
        colix: Colix,
        _tension: i32,
        diameters: [i32; 3],
        points: [ScreenPoint; 4],
    ) {
        self.calls.push(DrawCall::HermiteTube {
            colix,
            diameters,
            points,
        });
    }

    fn draw_hermite_ribbon(&mut self, colix: Colix, ribbon: &HermiteRibbon) {
        self.calls.push(DrawCall::HermiteRibbon {
            colix,
            ribbon: *ribbon,
        });
    }
}
