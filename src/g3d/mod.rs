//! Drawing-primitive contract consumed by every renderer.
//!
//! The rasterizer itself lives outside this crate; renderers talk to it
//! through [`Graphics3D`]. [`recording::RecordingGraphics`] is an in-crate
//! backend that records calls instead of filling pixels.

pub mod colix;
pub mod geodesic;
pub mod normix;
pub mod pool;
pub mod recording;
pub mod shade;

pub use colix::{Colix, ColorTable, ColorValue, Palette};
pub use normix::Normix;
pub use pool::{PoolGuard, ScratchPool, ScreenPool};
pub use shade::{Lighting, Shade};

/// A projected point: pixel coordinates plus depth (centi-angstroms from the
/// eye, larger is farther).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    /// Pixel column.
    pub x: i32,
    /// Pixel row (down is positive).
    pub y: i32,
    /// Depth.
    pub z: i32,
}

impl ScreenPoint {
    /// Construct from components.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise midpoint.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new(
            (self.x + other.x) / 2,
            (self.y + other.y) / 2,
            (self.z + other.z) / 2,
        )
    }

    /// Offset in x/y, keeping depth.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z)
    }
}

/// Cylinder/cone end style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endcaps {
    /// No caps, no interior.
    None,
    /// Open tube.
    Open,
    /// Flat disc caps.
    Flat,
    /// Hemisphere caps.
    Spherical,
}

/// How a filled triangle is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// One precomputed intensity for the whole face.
    Flat(Shade),
    /// One normal for the whole face.
    Normix(Normix),
    /// Gouraud from per-vertex normals.
    Vertex([Normix; 3]),
}

/// Typeface family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFace {
    /// Sans-serif.
    #[default]
    Sans,
    /// Serif.
    Serif,
    /// Monospace.
    Mono,
}

/// A font request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Font {
    /// Family.
    pub face: FontFace,
    /// Bold weight.
    pub bold: bool,
    /// Size in points.
    pub size: u8,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            face: FontFace::Sans,
            bold: false,
            size: 13,
        }
    }
}

/// Two-edge ribbon patch: `top` and `bottom` each hold the four hermite
/// control points (previous, start, end, next).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HermiteRibbon {
    /// Spline tension.
    pub tension: i32,
    /// Fill between the edges.
    pub fill: bool,
    /// Outline the edges.
    pub border: bool,
    /// Upper edge.
    pub top: [ScreenPoint; 4],
    /// Lower edge.
    pub bottom: [ScreenPoint; 4],
    /// Thickness factor; 0 draws a flat ribbon.
    pub aspect_ratio: i32,
}

/// Software rasterizer primitives.
///
/// All coordinates are screen space. Colors are colixes already resolved
/// through [`Colix::inherit`]; the backend owns the color table lookup.
pub trait Graphics3D {
    /// Canvas size in pixels.
    fn display_size(&self) -> (i32, i32);

    /// Filled triangle.
    fn fill_triangle(
        &mut self,
        colix: Colix,
        points: [ScreenPoint; 3],
        shading: Shading,
    );

    /// Filled quadrilateral, optionally with per-vertex normals.
    fn fill_quadrilateral(
        &mut self,
        colix: Colix,
        points: [ScreenPoint; 4],
        normixes: Option<[Normix; 4]>,
    );

    /// One-pixel line, colored half and half.
    fn draw_line(
        &mut self,
        colix_a: Colix,
        colix_b: Colix,
        a: ScreenPoint,
        b: ScreenPoint,
    );

    /// One-pixel dotted line.
    fn draw_dotted_line(&mut self, colix: Colix, a: ScreenPoint, b: ScreenPoint);

    /// Shaded cylinder, colored half and half.
    fn fill_cylinder(
        &mut self,
        colixes: [Colix; 2],
        endcaps: Endcaps,
        diameter: i32,
        a: ScreenPoint,
        b: ScreenPoint,
    );

    /// Shaded cone from `base` to `tip`.
    fn fill_cone(
        &mut self,
        colix: Colix,
        endcaps: Endcaps,
        diameter: i32,
        base: ScreenPoint,
        tip: ScreenPoint,
    );

    /// Circle outline.
    fn draw_circle(&mut self, colix: Colix, diameter: i32, center: ScreenPoint);

    /// Shaded sphere.
    fn fill_sphere(&mut self, colix: Colix, diameter: i32, center: ScreenPoint);

    /// Single pixel.
    fn draw_pixel(&mut self, colix: Colix, p: ScreenPoint);

    /// Text with its baseline-left corner at `at`. `bg_colix` INHERIT means no
    /// background.
    fn draw_string(
        &mut self,
        colix: Colix,
        bg_colix: Colix,
        font: &Font,
        text: &str,
        at: ScreenPoint,
    );

    /// Pixel width of `text`.
    fn string_width(&self, font: &Font, text: &str) -> i32;

    /// Pixel ascent of `font`.
    fn font_ascent(&self, font: &Font) -> i32;

    /// Hermite curve through `points[1]..points[2]`.
    fn draw_hermite(&mut self, colix: Colix, tension: i32, points: [ScreenPoint; 4]);

    /// Hermite tube with diameters at start, middle and end.
    fn fill_hermite(
        &mut self,
        colix: Colix,
        tension: i32,
        diameters: [i32; 3],
        points: [ScreenPoint; 4],
    );

    /// Two-edged hermite ribbon.
    fn draw_hermite_ribbon(&mut self, colix: Colix, ribbon: &HermiteRibbon);
}
